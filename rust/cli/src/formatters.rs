//! Card, board and exchange formatters for terminal display.
//!
//! Suits print as ♥ ♦ ♣ ♠ where the terminal is likely to render them and as
//! `h d c s` otherwise. Commands whose output is meant to be parsed (`deal`, `replay`)
//! use the card's plain `Display` form instead.
//!
//! ```rust
//! use holdex_engine::cards::{Card, Rank, Suit};
//! use holdex_cli::formatters::{format_board, format_card};
//!
//! let ace = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace) == "A♠" || format_card(&ace) == "As");
//! assert_eq!(format_board(&[]), "[]");
//! ```

use holdex_engine::cards::Card;
use holdex_engine::equity::HandEquity;
use holdex_engine::game::{visible_board, GameState, Settlement};

/// Windows consoles outside Windows Terminal or VS Code often lack the suit glyphs.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_card(card: &Card) -> String {
    if supports_unicode() {
        card.to_symbol_string()
    } else {
        card.to_string()
    }
}

/// `[A♠ K♥ Q♦]`, or `[]` for an empty board.
pub fn format_board(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

/// Hole cards, or `?? ??` while they are still face down.
pub fn format_hole(hole: &[Card; 2], visible: bool) -> String {
    if visible {
        format!("{} {}", format_card(&hole[0]), format_card(&hole[1]))
    } else {
        "?? ??".to_string()
    }
}

/// Space-separated short text, e.g. `As Kd`.
pub fn plain_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

pub fn format_odds(odds: f64) -> String {
    format!("{:.2}", odds)
}

pub fn format_equity(e: &HandEquity) -> String {
    format!(
        "win {} tie {} equity {} odds {}",
        format_percent(e.win_probability),
        format_percent(e.tie_probability),
        format_percent(e.total_equity),
        format_odds(e.fair_odds)
    )
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn format_settlement(s: &Settlement) -> String {
    let outcome = if !s.won {
        "lost".to_string()
    } else if s.is_dead_heat {
        format!("dead heat 1/{}", s.dead_heat_divisor)
    } else {
        "won".to_string()
    };
    format!(
        "Seat {} stake {} @ {}: {} (payout {}, profit {:+.2})",
        s.bet.seat + 1,
        format_amount(s.bet.stake),
        format_odds(s.bet.odds),
        outcome,
        format_amount(s.payout),
        s.profit
    )
}

/// Multi-line table view used by `play`.
pub fn format_table(state: &GameState) -> Vec<String> {
    let mut lines = vec![format!(
        "Round {} | {} | Balance {} | Profit {:+.2}",
        state.round_number,
        state.phase,
        format_amount(state.balance),
        state.total_profit
    )];
    lines.push(format!(
        "Board: {}",
        format_board(visible_board(state))
    ));
    for (seat, hole) in state.hands.iter().enumerate() {
        let odds = match &state.equities {
            Some(eq) => eq
                .get(seat)
                .map(format_equity)
                .unwrap_or_default(),
            None => "calculating...".to_string(),
        };
        lines.push(format!(
            "Seat {}: {}  {}",
            seat + 1,
            format_hole(hole, state.visible_hole_cards),
            odds
        ));
    }
    for bet in &state.bets {
        lines.push(format!(
            "Bet: seat {} stake {} @ {} ({})",
            bet.seat + 1,
            format_amount(bet.stake),
            format_odds(bet.odds),
            bet.phase
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdex_engine::cards::{Rank, Suit};
    use holdex_engine::game::{Bet, Phase};

    #[test]
    fn board_brackets() {
        let flop = [
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::King, Suit::Hearts),
        ];
        let s = format_board(&flop);
        assert!(s.starts_with("[A"));
        assert!(s.ends_with(']'));
        assert_eq!(plain_cards(&flop), "As Kh");
    }

    #[test]
    fn hidden_hole_cards() {
        let hole = [
            Card::new(Rank::Two, Suit::Clubs),
            Card::new(Rank::Three, Suit::Clubs),
        ];
        assert_eq!(format_hole(&hole, false), "?? ??");
        assert!(format_hole(&hole, true).starts_with('2'));
    }

    #[test]
    fn settlement_line_reports_dead_heat() {
        let bet = Bet {
            seat: 2,
            stake: 10.0,
            odds: 3.0,
            phase: Phase::Flop,
        };
        let line = format_settlement(&Settlement::for_bet(&bet, &[0, 2]));
        assert_eq!(
            line,
            "Seat 3 stake 10.00 @ 3.00: dead heat 1/2 (payout 20.00, profit +10.00)"
        );
    }

    #[test]
    fn percentages_have_one_decimal() {
        assert_eq!(format_percent(0.25), "25.0%");
        assert_eq!(format_odds(4.0), "4.00");
    }
}
