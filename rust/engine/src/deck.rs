use serde::{Deserialize, Serialize};

use crate::cards::{full_deck, Card};
use crate::errors::GameError;
use crate::rng::SeededRng;

/// Number of seats at a Hold'em Exchange table.
pub const SEATS: usize = 4;
/// Community cards dealt per round.
pub const BOARD_SIZE: usize = 5;

/// A 52-card deck shuffled once from a seed and dealt from the top.
///
/// # Examples
///
/// ```
/// use holdex_engine::deck::Deck;
///
/// let mut deck = Deck::new_with_seed("demo");
/// let hole = deck.deal(2).expect("fresh deck has 52 cards");
/// assert_eq!(hole.len(), 2);
/// assert_eq!(deck.remaining(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    pub fn new_with_seed(seed: &str) -> Self {
        let mut rng = SeededRng::from_text(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffled(rng: &mut SeededRng) -> Self {
        Self {
            cards: shuffle(&full_deck(), rng),
            position: 0,
        }
    }

    /// Unshuffled deck in canonical order.
    pub fn ordered() -> Self {
        Self {
            cards: full_deck(),
            position: 0,
        }
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Removes and returns the next `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let dealt = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(dealt)
    }

    /// Drops the given cards from the undealt portion.
    pub fn remove(&mut self, known: &[Card]) {
        let rest = remove_cards(&self.cards[self.position..], known);
        self.cards = rest;
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[self.position..]
    }
}

/// Fisher–Yates shuffle returning a new vector; the input is left untouched.
pub fn shuffle(cards: &[Card], rng: &mut SeededRng) -> Vec<Card> {
    let mut v = cards.to_vec();
    shuffle_in_place(&mut v, rng);
    v
}

pub(crate) fn shuffle_in_place(v: &mut [Card], rng: &mut SeededRng) {
    for i in (1..v.len()).rev() {
        let j = rng.next_int(0, i);
        v.swap(i, j);
    }
}

pub fn remove_cards(cards: &[Card], known: &[Card]) -> Vec<Card> {
    let mut mask = 0u64;
    for c in known {
        mask |= 1u64 << c.id();
    }
    cards
        .iter()
        .copied()
        .filter(|c| mask & (1u64 << c.id()) == 0)
        .collect()
}

/// The full deal of one round: four hole pairs and the complete board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtRound {
    pub hands: [[Card; 2]; SEATS],
    pub board: [Card; BOARD_SIZE],
    pub seed: String,
}

impl DealtRound {
    /// All 13 dealt cards, seat 0 first and board last.
    pub fn all_cards(&self) -> Vec<Card> {
        self.hands
            .iter()
            .flatten()
            .chain(self.board.iter())
            .copied()
            .collect()
    }
}

/// Shuffles once and deals 2 cards to each seat in order 0..3, then 5 to the board.
///
/// The dealing order is fixed; changing it would change every seed's round.
pub fn deal_round(seed: &str) -> DealtRound {
    let mut rng = SeededRng::from_text(seed);
    let c = shuffle(&full_deck(), &mut rng);
    DealtRound {
        hands: [[c[0], c[1]], [c[2], c[3]], [c[4], c[5]], [c[6], c[7]]],
        board: [c[8], c[9], c[10], c[11], c[12]],
        seed: seed.to_string(),
    }
}
