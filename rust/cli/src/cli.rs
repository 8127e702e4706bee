//! Command-line definitions for `holdex`.

use clap::{Parser, Subcommand, ValueEnum};
use holdex_engine::equity::TieShare;

#[derive(Parser, Debug)]
#[command(
    name = "holdex",
    version,
    about = "Hold'em Exchange: bet on four seats at simulated fair odds"
)]
pub struct HoldexCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal one round (four hole pairs and a board) from a seed
    Deal {
        #[arg(long)]
        seed: Option<String>,
    },
    /// Print draws from the seeded round generator
    Rng {
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=1000))]
        count: u32,
    },
    /// Evaluate the best five-card hand from hole cards and a board
    Hand {
        /// Two hole cards, e.g. "As Ks" or "AsKs"
        #[arg(long)]
        hole: String,
        /// Three to five board cards, e.g. "Qs Js Ts"
        #[arg(long)]
        board: String,
    },
    /// Estimate win, tie and total equity for four hands
    Equity {
        /// Four packed hole pairs, e.g. "AsKs QdQh 7c7d 2h3h"
        #[arg(long)]
        hands: String,
        #[arg(long)]
        board: Option<String>,
        /// Defaults to the configured iteration count
        #[arg(long)]
        iterations: Option<u32>,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, value_enum)]
        tie_share: Option<TieShareArg>,
        #[arg(long)]
        json: bool,
    },
    /// Play rounds interactively, reading commands from stdin
    Play {
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        balance: Option<f64>,
    },
    /// Rebuild a round snapshot from its seed and print it as JSON
    Replay {
        #[arg(long)]
        seed: String,
        /// Phase index (0-5) or name
        #[arg(long, default_value = "SETTLE")]
        phase: String,
        #[arg(long, default_value_t = 1)]
        round: u64,
    },
    /// Show the shared round clock now or at a given RFC 3339 time
    Clock {
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Time hand evaluation and equity simulation
    Bench,
    /// Print the resolved configuration and where each value came from
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TieShareArg {
    Half,
    Exact,
}

impl From<TieShareArg> for TieShare {
    fn from(arg: TieShareArg) -> Self {
        match arg {
            TieShareArg::Half => TieShare::Half,
            TieShareArg::Exact => TieShare::Exact,
        }
    }
}
