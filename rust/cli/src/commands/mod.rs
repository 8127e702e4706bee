//! Command handlers for the `holdex` CLI.
//!
//! Every subcommand lives in its own module and follows one pattern:
//!
//! - Public handler: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and stdin (`&mut dyn BufRead`) are passed in, so
//!   tests drive handlers with in-memory buffers
//! - Errors propagate as [`CliError`](crate::error::CliError); [`crate::run`] picks the
//!   exit code

pub mod bench;
pub mod cfg;
pub mod clock;
pub mod deal;
pub mod equity;
pub mod hand;
pub mod play;
pub mod replay;
pub mod rng;

pub use bench::handle_bench_command;
pub use cfg::handle_cfg_command;
pub use clock::handle_clock_command;
pub use deal::handle_deal_command;
pub use equity::{handle_equity_command, EquityOptions};
pub use hand::handle_hand_command;
pub use play::handle_play_command;
pub use replay::handle_replay_command;
pub use rng::handle_rng_command;
