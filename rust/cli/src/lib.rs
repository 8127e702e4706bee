//! # Hold'em Exchange CLI Library
//!
//! Command-line front end for the `holdex_engine` crate: deal and inspect rounds,
//! evaluate hands, estimate equities, play interactive exchange sessions and rebuild
//! shared-clock rounds from their seed.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments, dispatches to a subcommand and returns the exit code.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["holdex", "equity", "--hands", "AsKs QdQh 7c7d 2h3h"];
//! let code = holdex_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Deal one round from a seed
//! - `rng`: Sample the seeded shuffle generator
//! - `hand`: Evaluate hole cards on a board
//! - `equity`: Monte Carlo equity and fair odds for four hands
//! - `play`: Interactive session read from stdin
//! - `replay`: Snapshot of a round rebuilt from seed, phase and round number
//! - `clock`: Where the shared round clock stands
//! - `bench`: Evaluation and simulation timings
//! - `cfg`: Resolved configuration with value sources

use std::io::Write;

use clap::Parser;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
mod macros;
pub mod ui;
pub mod validation;

use cli::{Commands, HoldexCli};
use commands::{
    handle_bench_command, handle_cfg_command, handle_clock_command, handle_deal_command,
    handle_equity_command, handle_hand_command, handle_play_command, handle_replay_command,
    handle_rng_command, EquityOptions,
};

pub use error::CliError;

const COMMANDS: &[&str] = &[
    "deal", "rng", "hand", "equity", "play", "replay", "clock", "bench", "cfg",
];

/// Parses `args` and runs the selected subcommand.
///
/// Returns `0` on success and `2` on any error. Help and version text go to `out`
/// with exit code `0`.
///
/// ```
/// use std::io;
/// let args = vec!["holdex", "deal", "--seed", "42"];
/// let code = holdex_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldexCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Rng { seed, count } => handle_rng_command(seed, count, out),
        Commands::Hand { hole, board } => handle_hand_command(&hole, &board, out),
        Commands::Equity {
            hands,
            board,
            iterations,
            seed,
            tie_share,
            json,
        } => {
            let opts = EquityOptions {
                hands,
                board,
                iterations,
                seed,
                tie_share,
                json,
            };
            config::load()
                .map_err(CliError::from)
                .and_then(|cfg| handle_equity_command(&opts, &cfg, out, err))
        }
        Commands::Play { seed, balance } => {
            // real stdin works for both a TTY and a pipe
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            config::load().map_err(CliError::from).and_then(|cfg| {
                handle_play_command(seed, balance, &cfg, out, err, &mut stdin_lock)
            })
        }
        Commands::Replay { seed, phase, round } => config::load()
            .map_err(CliError::from)
            .and_then(|cfg| handle_replay_command(&seed, &phase, round, &cfg, out)),
        Commands::Clock { at, json } => handle_clock_command(at.as_deref(), json, out),
        Commands::Bench => handle_bench_command(out),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    write_or_exit!(err, "{}", e);
    write_or_exit!(err, "Hold'em Exchange CLI");
    write_or_exit!(err, "Usage: holdex <command> [options]\n");
    write_or_exit!(err, "Commands:");
    for c in COMMANDS {
        write_or_exit!(err, "  {}", c);
    }
    write_or_exit!(err, "\nFor full help, run: holdex --help");
    exit_code::ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args.iter().copied(), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, out, err) = run_args(&["holdex", "--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("equity"));
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_lists_commands() {
        let (code, _, err) = run_args(&["holdex", "sim"]);
        assert_eq!(code, 2);
        assert!(err.contains("Usage: holdex <command> [options]"));
        for c in COMMANDS {
            assert!(err.contains(&format!("  {}\n", c)), "missing {c}");
        }
    }

    #[test]
    fn rng_count_is_range_checked() {
        assert!(HoldexCli::try_parse_from(["holdex", "rng", "--count", "0"]).is_err());
        assert!(HoldexCli::try_parse_from(["holdex", "rng", "--count", "1000"]).is_ok());
    }

    #[test]
    fn tie_share_accepts_only_known_values() {
        assert!(HoldexCli::try_parse_from([
            "holdex", "equity", "--hands", "x", "--tie-share", "half"
        ])
        .is_ok());
        assert!(HoldexCli::try_parse_from([
            "holdex", "equity", "--hands", "x", "--tie-share", "third"
        ])
        .is_err());
    }

    #[test]
    fn handler_errors_print_and_exit_two() {
        let (code, out, err) = run_args(&["holdex", "hand", "--hole", "As", "--board", "Ks Qs Js"]);
        assert_eq!(code, 2);
        assert!(out.is_empty());
        assert!(err.starts_with("Error: Invalid input:"));
    }
}
