//! Hand command: best five of the hole cards plus board.

use std::collections::HashSet;
use std::io::Write;

use holdex_engine::cards::parse_cards;
use holdex_engine::deck::BOARD_SIZE;
use holdex_engine::errors::GameError;
use holdex_engine::hand::evaluate_hand;

use crate::error::CliError;
use crate::validation::parse_hole_pair;

pub fn handle_hand_command(hole: &str, board: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let hole = parse_hole_pair(hole).map_err(CliError::InvalidInput)?;
    let board = parse_cards(board)?;
    if !(3..=BOARD_SIZE).contains(&board.len()) {
        return Err(CliError::InvalidInput(format!(
            "Board must hold 3 to {} cards, got {}",
            BOARD_SIZE,
            board.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(card) = hole.iter().chain(board.iter()).find(|c| !seen.insert(**c)) {
        return Err(GameError::DuplicateCard { card: *card }.into());
    }
    let evaluated = evaluate_hand(&hole, &board)?;
    writeln!(out, "Hand: {}", evaluated.name())?;
    writeln!(out, "Kickers: {:?}", evaluated.kickers)?;
    writeln!(out, "Score: {}", evaluated.score)?;
    Ok(())
}
