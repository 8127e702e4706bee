//! Equity command: Monte Carlo win, tie and fair-odds estimate for four hands.
//!
//! Iterations, seed and tie convention default to the loaded configuration. With a
//! complete board the result is exact and no trials run.

use std::io::Write;

use holdex_engine::equity::{estimate_equity_with, EquityConfig, EquityResult};

use crate::cli::TieShareArg;
use crate::config::Config;
use crate::error::CliError;
use crate::formatters::{format_equity, plain_cards};
use crate::ui;
use crate::validation::{parse_board, parse_hands};

const DEFAULT_SEED: &str = "holdex-equity";

#[derive(Debug, Clone, Default)]
pub struct EquityOptions {
    pub hands: String,
    pub board: Option<String>,
    pub iterations: Option<u32>,
    pub seed: Option<String>,
    pub tie_share: Option<TieShareArg>,
    pub json: bool,
}

pub fn handle_equity_command(
    opts: &EquityOptions,
    cfg: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let hands = parse_hands(&opts.hands).map_err(CliError::InvalidInput)?;
    let board = parse_board(opts.board.as_deref()).map_err(CliError::InvalidInput)?;

    let requested = opts.iterations.unwrap_or(cfg.iterations);
    let tie_share = opts.tie_share.map_or(cfg.tie_share, Into::into);
    let config = EquityConfig::new(requested, tie_share);
    if config.iterations != requested {
        ui::display_warning(
            err,
            &format!(
                "iterations {} out of range, using {}",
                requested, config.iterations
            ),
        )?;
    }
    let seed = opts
        .seed
        .clone()
        .or_else(|| cfg.seed.clone())
        .unwrap_or_else(|| DEFAULT_SEED.to_string());

    let result = estimate_equity_with(&hands, &board, &config, &seed)?;

    if opts.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write_report(out, &hands, &board, &result)?;
    }
    Ok(())
}

fn write_report(
    out: &mut dyn Write,
    hands: &[[holdex_engine::cards::Card; 2]],
    board: &[holdex_engine::cards::Card],
    result: &EquityResult,
) -> Result<(), CliError> {
    writeln!(out, "Board: [{}]", plain_cards(board))?;
    for (e, hole) in result.equities.iter().zip(hands) {
        writeln!(
            out,
            "Seat {} {}: {}",
            e.seat + 1,
            plain_cards(hole),
            format_equity(e)
        )?;
    }
    if result.remaining_cards == 0 {
        writeln!(out, "Exact result (board complete)")?;
    } else {
        writeln!(
            out,
            "Simulations: {} ({} cards to come)",
            result.total_simulations, result.remaining_cards
        )?;
    }
    Ok(())
}
