//! Input parsing and validation for commands.
//!
//! Covers the interactive `play` prompt, hole-pair and hand-list text such as
//! `"AsKs QdQh 7c7d 2h3h"`, and phase names given to `replay`.
//!
//! Seats are 1-based at the prompt and 0-based in the engine.

use holdex_engine::cards::{parse_card, parse_cards, Card};
use holdex_engine::deck::SEATS;
use holdex_engine::game::{Phase, PHASE_ORDER};

/// A prompt command understood by `play`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayCommand {
    /// `seat` is 0-based
    Bet { seat: usize, stake: f64 },
    Cancel,
    Next,
    New,
    Status,
    Help,
}

#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Command(PlayCommand),
    Quit,
    Invalid(String),
}

pub const PLAY_HELP: &str =
    "Commands: bet <seat 1-4> <stake>, cancel, next (n), new, status (s), help (h), quit (q)";

/// Parses one line typed at the `play` prompt (case-insensitive).
///
/// ```rust
/// # use holdex_cli::validation::{parse_play_command, ParseResult, PlayCommand};
/// assert_eq!(
///     parse_play_command("bet 2 25"),
///     ParseResult::Command(PlayCommand::Bet { seat: 1, stake: 25.0 })
/// );
/// assert_eq!(parse_play_command("q"), ParseResult::Quit);
/// assert!(matches!(parse_play_command("fold"), ParseResult::Invalid(_)));
/// ```
pub fn parse_play_command(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&head) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match head {
        "q" | "quit" | "exit" => ParseResult::Quit,
        "n" | "next" => ParseResult::Command(PlayCommand::Next),
        "cancel" => ParseResult::Command(PlayCommand::Cancel),
        "new" => ParseResult::Command(PlayCommand::New),
        "s" | "status" => ParseResult::Command(PlayCommand::Status),
        "h" | "help" | "?" => ParseResult::Command(PlayCommand::Help),
        "bet" | "b" => {
            if parts.len() < 3 {
                return ParseResult::Invalid(
                    "Bet requires a seat and a stake (e.g., 'bet 1 10')".to_string(),
                );
            }
            let seat = match parts[1].parse::<usize>() {
                Ok(s) if (1..=SEATS).contains(&s) => s - 1,
                _ => return ParseResult::Invalid(format!("Seat must be 1-{}", SEATS)),
            };
            match parts[2].parse::<f64>() {
                Ok(stake) if stake > 0.0 && stake.is_finite() => {
                    ParseResult::Command(PlayCommand::Bet { seat, stake })
                }
                Ok(_) => ParseResult::Invalid("Stake must be positive".to_string()),
                Err(_) => ParseResult::Invalid("Invalid stake".to_string()),
            }
        }
        other => ParseResult::Invalid(format!("Unrecognized command '{}'. {}", other, PLAY_HELP)),
    }
}

/// Two hole cards written either spaced (`"As Ks"`) or packed (`"AsKs"`, `"10sKs"`).
pub fn parse_hole_pair(s: &str) -> Result<[Card; 2], String> {
    let s = s.trim();
    if s.split_whitespace().count() > 1 {
        let cards = parse_cards(s).map_err(|e| e.to_string())?;
        return match cards.as_slice() {
            [a, b] => Ok([*a, *b]),
            _ => Err(format!("Expected 2 hole cards, got {}", cards.len())),
        };
    }
    // packed: the first card is 2 or 3 characters long
    for split in [2, 3] {
        if let (Some(a), Some(b)) = (s.get(..split), s.get(split..))
            && let (Some(a), Some(b)) = (parse_card(a), parse_card(b))
        {
            return Ok([a, b]);
        }
    }
    Err(format!("Cannot parse hole cards from {:?}", s))
}

/// Whitespace-separated packed pairs, one per seat: `"AsKs QdQh 7c7d 2h3h"`.
pub fn parse_hands(s: &str) -> Result<Vec<[Card; 2]>, String> {
    let hands = s
        .split_whitespace()
        .map(parse_hole_pair)
        .collect::<Result<Vec<_>, _>>()?;
    if hands.len() != SEATS {
        return Err(format!("Expected {} hands, got {}", SEATS, hands.len()));
    }
    Ok(hands)
}

/// Board text; `None` or blank means no board yet.
pub fn parse_board(s: Option<&str>) -> Result<Vec<Card>, String> {
    match s {
        Some(text) if !text.trim().is_empty() => parse_cards(text).map_err(|e| e.to_string()),
        _ => Ok(Vec::new()),
    }
}

/// A phase by index (`0`-`5`) or by name (`flop`, `PRE_FLOP`, `pre-flop`, `preflop`).
pub fn parse_phase(s: &str) -> Result<Phase, String> {
    let s = s.trim();
    if let Ok(i) = s.parse::<usize>() {
        return PHASE_ORDER
            .get(i)
            .copied()
            .ok_or_else(|| format!("Phase index must be 0-{}", PHASE_ORDER.len() - 1));
    }
    let wanted: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase();
    PHASE_ORDER
        .into_iter()
        .find(|p| p.name().replace('_', "") == wanted)
        .ok_or_else(|| format!("Unknown phase {:?}", s))
}
