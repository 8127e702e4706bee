//! Deal command: one full round from a seed.
//!
//! Output is plain card text so it can be fed back into `hand` and `equity`.

use std::io::Write;

use holdex_engine::deck::deal_round;

use crate::error::CliError;
use crate::formatters::plain_cards;

/// Without `--seed` a random numeric seed is drawn and printed.
pub fn handle_deal_command(seed: Option<String>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(|| rand::random::<u32>().to_string());
    let round = deal_round(&seed);

    writeln!(out, "Seed: {}", round.seed)?;
    for (seat, hole) in round.hands.iter().enumerate() {
        writeln!(out, "Seat {}: {}", seat + 1, plain_cards(hole))?;
    }
    writeln!(out, "Board: {}", plain_cards(&round.board))?;
    Ok(())
}
