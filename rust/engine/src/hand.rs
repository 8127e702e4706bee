use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

/// Weight of the category in a score; exceeds the largest kicker polynomial
/// (14 * (15^4 + 15^3 + 15^2 + 15 + 1) = 759_374).
pub const CATEGORY_WEIGHT: u64 = 10_000_000_000;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Best five-card strength found among the candidate cards.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedHand {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: Vec<u8>,
    /// Sole comparison key, monotonic in (category, kickers).
    pub score: u64,
}

impl EvaluatedHand {
    fn new(category: Category, kickers: Vec<u8>) -> Self {
        let score = score_of(category, &kickers);
        Self {
            category,
            kickers,
            score,
        }
    }

    pub fn name(&self) -> &'static str {
        self.category.name()
    }
}

pub fn score_of(category: Category, kickers: &[u8]) -> u64 {
    let mut score = category as u64 * CATEGORY_WEIGHT;
    let mut weight = 15u64.pow(4);
    for &k in kickers.iter().take(5) {
        score += k as u64 * weight;
        weight /= 15;
    }
    score
}

/// Evaluates hole cards together with however much of the board is known.
///
/// # Errors
///
/// [`GameError::NotEnoughCards`] when fewer than five cards are supplied in total.
///
/// # Examples
///
/// ```
/// use holdex_engine::cards::parse_cards;
/// use holdex_engine::hand::{evaluate_hand, Category};
///
/// let hole = parse_cards("As Ks").unwrap();
/// let board = parse_cards("Qs Js Ts 2h 3d").unwrap();
/// let hand = evaluate_hand(&hole, &board).unwrap();
/// assert_eq!(hand.category, Category::RoyalFlush);
/// ```
pub fn evaluate_hand(hole: &[Card], board: &[Card]) -> Result<EvaluatedHand, GameError> {
    let found = hole.len() + board.len();
    if found < 5 {
        return Err(GameError::NotEnoughCards { found });
    }
    Ok(evaluate_cards(hole.iter().chain(board.iter())))
}

/// Showdown evaluation of a hole pair on a complete board; cannot be short of cards.
pub fn evaluate_showdown(hole: &[Card; 2], board: &[Card; 5]) -> EvaluatedHand {
    evaluate_cards(hole.iter().chain(board.iter()))
}

fn evaluate_cards<'a>(cards: impl Iterator<Item = &'a Card>) -> EvaluatedHand {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    let mut suit_counts = [0u8; 4];
    let mut by_suit_mask = [0u16; 4];
    for c in cards {
        let r = c.rank.value();
        let s = c.suit.index();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        suit_counts[s] += 1;
        by_suit_mask[s] |= 1 << r;
    }

    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    // Straight flush over every card of the flush suit, not only its top five.
    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            let category = if high == 14 {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            };
            return EvaluatedHand::new(category, vec![high]);
        }
    }

    let groups = RankGroups::from_counts(&rank_counts);

    if let Some(&quad) = groups.quads.first() {
        let kicker = groups.best_excluding(&[quad], 1);
        let mut k = vec![quad];
        k.extend(kicker);
        return EvaluatedHand::new(Category::FourOfAKind, k);
    }

    if let Some(&trip) = groups.trips.first() {
        let pair = match (groups.trips.get(1), groups.pairs.first()) {
            (Some(&t), Some(&p)) => Some(t.max(p)),
            (Some(&t), None) => Some(t),
            (None, Some(&p)) => Some(p),
            (None, None) => None,
        };
        if let Some(pair) = pair {
            return EvaluatedHand::new(Category::FullHouse, vec![trip, pair]);
        }
    }

    if let Some(s) = flush_suit {
        let kickers = ranks_desc(by_suit_mask[s]).into_iter().take(5).collect();
        return EvaluatedHand::new(Category::Flush, kickers);
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return EvaluatedHand::new(Category::Straight, vec![high]);
    }

    if let Some(&trip) = groups.trips.first() {
        let mut k = vec![trip];
        k.extend(groups.best_excluding(&[trip], 2));
        return EvaluatedHand::new(Category::ThreeOfAKind, k);
    }

    if groups.pairs.len() >= 2 {
        let (high, low) = (groups.pairs[0], groups.pairs[1]);
        let mut k = vec![high, low];
        // a third pair can serve as the kicker
        k.extend(groups.best_excluding(&[high, low], 1));
        return EvaluatedHand::new(Category::TwoPair, k);
    }

    if let Some(&pair) = groups.pairs.first() {
        let mut k = vec![pair];
        k.extend(groups.best_excluding(&[pair], 3));
        return EvaluatedHand::new(Category::Pair, k);
    }

    let highs = ranks_desc(rank_mask).into_iter().take(5).collect();
    EvaluatedHand::new(Category::HighCard, highs)
}

/// Orders two evaluated hands purely by score. `Equal` is a genuine tie.
pub fn compare_hands(a: &EvaluatedHand, b: &EvaluatedHand) -> Ordering {
    a.score.cmp(&b.score)
}

/// Every index holding the maximum score: one for a clean win, several for a dead heat.
pub fn determine_winners(hands: &[EvaluatedHand]) -> Vec<usize> {
    let Some(best) = hands.iter().map(|h| h.score).max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, h)| h.score == best)
        .map(|(i, _)| i)
        .collect()
}

/// Distinct ranks bucketed by multiplicity, each bucket high -> low.
struct RankGroups {
    quads: Vec<u8>,
    trips: Vec<u8>,
    pairs: Vec<u8>,
    present: Vec<u8>,
}

impl RankGroups {
    fn from_counts(rank_counts: &[u8; 15]) -> Self {
        let mut g = RankGroups {
            quads: vec![],
            trips: vec![],
            pairs: vec![],
            present: vec![],
        };
        for r in (2..=14u8).rev() {
            match rank_counts[r as usize] {
                0 => continue,
                1 => {}
                2 => g.pairs.push(r),
                3 => g.trips.push(r),
                _ => g.quads.push(r),
            }
            g.present.push(r);
        }
        g
    }

    fn best_excluding(&self, used: &[u8], n: usize) -> Vec<u8> {
        self.present
            .iter()
            .copied()
            .filter(|r| !used.contains(r))
            .take(n)
            .collect()
    }
}

fn ranks_desc(mask: u16) -> Vec<u8> {
    (2..=14u8).rev().filter(|r| mask & (1 << r) != 0).collect()
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    // Treat Ace as 14 and optionally as 1
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        (m & window) == window
    })
}
