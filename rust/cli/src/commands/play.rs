//! # Play Command
//!
//! Interactive exchange session read from stdin.
//!
//! Each round walks PRE_DEAL → PRE_FLOP → FLOP → TURN → RIVER → SETTLE under the
//! player's control (`next`). Bets lock the odds shown at the moment they are placed and
//! move money through an in-memory balance service; equities for each new phase are
//! computed on the worker pool before the table is redrawn.
//!
//! With `--seed S` the session is reproducible: round `n` is dealt from `S` for the first
//! round and `S-n` afterwards.

use std::io::{BufRead, Write};
use std::time::Duration;

use holdex_engine::balance::{
    advance_phase_with, cancel_bets_with, place_bet_with, BalanceService, InMemoryBalance,
};
use holdex_engine::game::{create_initial_state_seeded, start_new_round, GameState, Phase};
use holdex_engine::worker::EquityWorker;

use crate::config::Config;
use crate::error::CliError;
use crate::formatters::{format_amount, format_odds, format_settlement, format_table};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{parse_play_command, ParseResult, PlayCommand, PLAY_HELP};

/// How long `next` waits for the phase's equities before showing blind odds.
const EQUITY_TIMEOUT: Duration = Duration::from_secs(120);

pub fn handle_play_command(
    seed: Option<String>,
    balance: Option<f64>,
    cfg: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let balance = balance.unwrap_or(cfg.starting_balance);
    if !(balance > 0.0) || !balance.is_finite() {
        ui::write_error(err, "balance must be > 0")?;
        return Err(CliError::InvalidInput("balance must be > 0".to_string()));
    }

    let base_seed = seed.or_else(|| cfg.seed.clone());
    let first_seed = base_seed
        .clone()
        .unwrap_or_else(holdex_engine::game::clock_seed);

    let worker = EquityWorker::new(cfg.worker_threads(), cfg.equity_config())?;
    let service = InMemoryBalance::new(balance);
    let mut state = create_initial_state_seeded(balance, &first_seed);

    writeln!(
        out,
        "play: seed={} balance={} iterations={}",
        state.seed,
        format_amount(balance),
        worker.config().iterations
    )?;
    writeln!(out, "{}", PLAY_HELP)?;
    write_table(out, &state)?;

    loop {
        ui::prompt(out, "> ")?;
        let Some(line) = read_stdin_line(stdin) else {
            break;
        };
        let command = match parse_play_command(&line) {
            ParseResult::Command(c) => c,
            ParseResult::Quit => break,
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };

        match command {
            PlayCommand::Bet { seat, stake } => {
                match place_bet_with(&service, &state, seat, stake) {
                    Ok(next) => {
                        state = next;
                        if let Some(bet) = state.bets.last() {
                            writeln!(
                                out,
                                "Bet placed: seat {} stake {} @ {}",
                                bet.seat + 1,
                                format_amount(bet.stake),
                                format_odds(bet.odds)
                            )?;
                        }
                    }
                    Err(e) => ui::write_error(err, &format!("Bet rejected: {}", e))?,
                }
            }
            PlayCommand::Cancel => {
                let refund = state.total_staked();
                state = cancel_bets_with(&service, &state)?;
                if state.phase == Phase::Settle {
                    ui::write_error(err, "Round already settled")?;
                } else {
                    writeln!(out, "Bets cancelled, refunded {}", format_amount(refund))?;
                }
            }
            PlayCommand::Next => {
                if state.phase == Phase::Settle {
                    ui::display_warning(err, "Round settled; type 'new' to deal again")?;
                    continue;
                }
                state = advance_phase_with(&service, &state)?;
                if state.is_calculating {
                    writeln!(out, "Calculating equities...")?;
                    state = worker.resolve(&state, EQUITY_TIMEOUT);
                }
                write_table(out, &state)?;
                if state.phase == Phase::Settle {
                    write_settlement(out, &state)?;
                }
            }
            PlayCommand::New => {
                if state.phase != Phase::Settle && !state.bets.is_empty() {
                    state = cancel_bets_with(&service, &state)?;
                    writeln!(out, "Open bets refunded")?;
                }
                let next_seed = base_seed
                    .as_ref()
                    .map(|s| format!("{}-{}", s, state.round_number + 1));
                worker.cancel();
                state = start_new_round(&state, next_seed.as_deref());
                write_table(out, &state)?;
            }
            PlayCommand::Status => write_table(out, &state)?,
            PlayCommand::Help => writeln!(out, "{}", PLAY_HELP)?,
        }
    }

    worker.cancel();
    writeln!(
        out,
        "Session over: rounds {} balance {} profit {:+.2}",
        state.round_number,
        format_amount(service.balance()?),
        state.total_profit
    )?;
    Ok(())
}

fn write_table(out: &mut dyn Write, state: &GameState) -> Result<(), CliError> {
    for line in format_table(state) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn write_settlement(out: &mut dyn Write, state: &GameState) -> Result<(), CliError> {
    if let (Some(evaluated), Some(winners)) = (&state.evaluated_hands, &state.winners) {
        for (seat, hand) in evaluated.iter().enumerate() {
            let mark = if winners.contains(&seat) { " *" } else { "" };
            writeln!(out, "Seat {}: {}{}", seat + 1, hand.name(), mark)?;
        }
        let names: Vec<String> = winners.iter().map(|w| (w + 1).to_string()).collect();
        writeln!(out, "Winner(s): seat {}", names.join(", "))?;
    }
    for s in state.settlements.iter().flatten() {
        writeln!(out, "{}", format_settlement(s))?;
    }
    Ok(())
}
