//! Monte Carlo win/tie estimation for the four seats.
//!
//! All hole cards are known to the engine; only the unrevealed part of the board is
//! sampled. Trials are split into fixed-size chunks that run on the rayon pool, each
//! chunk with its own [`SeededRng`] derived from the run seed, so a given seed gives
//! the same counts no matter how many threads take part.

use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{full_deck, Card};
use crate::deck::{remove_cards, BOARD_SIZE, SEATS};
use crate::errors::GameError;
use crate::hand::{determine_winners, evaluate_showdown};
use crate::rng::{hash_seed, SeededRng};

pub const DEFAULT_ITERATIONS: u32 = 50_000;
pub const MIN_ITERATIONS: u32 = 1_000;
pub const MAX_ITERATIONS: u32 = 200_000;

/// Lower bound applied to equity before taking its reciprocal.
pub const EQUITY_FLOOR: f64 = 0.0001;

const CHUNK_TRIALS: u32 = 1_024;
// 2-, 3- and 4-way splits all divide 12 evenly, keeping exact shares integral.
const SHARE_UNITS: u64 = 12;

/// How a tied trial contributes to a seat's total equity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieShare {
    /// Every tie counts as half a win regardless of how many seats tied.
    Half,
    /// Each tied trial contributes `1 / winners` for that trial.
    #[default]
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityConfig {
    pub iterations: u32,
    pub tie_share: TieShare,
}

impl EquityConfig {
    /// Clamps `iterations` into the supported 1,000..=200,000 range.
    pub fn new(iterations: u32, tie_share: TieShare) -> Self {
        Self {
            iterations: iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS),
            tie_share,
        }
    }
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            tie_share: TieShare::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandEquity {
    pub seat: usize,
    /// Probability of winning outright
    pub win_probability: f64,
    /// Probability of sharing the best hand with at least one other seat
    pub tie_probability: f64,
    pub total_equity: f64,
    /// Decimal odds, `1 / max(total_equity, EQUITY_FLOOR)`
    pub fair_odds: f64,
}

impl HandEquity {
    fn from_equity(seat: usize, win: f64, tie: f64, total: f64) -> Self {
        Self {
            seat,
            win_probability: win,
            tie_probability: tie,
            total_equity: total,
            fair_odds: fair_odds(total),
        }
    }
}

pub fn fair_odds(total_equity: f64) -> f64 {
    1.0 / total_equity.max(EQUITY_FLOOR)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    pub equities: Vec<HandEquity>,
    pub total_simulations: u32,
    /// Hole cards plus revealed board cards
    pub known_cards: usize,
    /// Board cards still to come
    pub remaining_cards: usize,
}

/// Blind, symmetric table used before any card is revealed: 25% and 4.0 for every seat.
pub fn pre_deal_equities() -> Vec<HandEquity> {
    (0..SEATS)
        .map(|seat| HandEquity::from_equity(seat, 0.25, 0.0, 0.25))
        .collect()
}

/// Instant rough 4-way equity for a hole pair, shown while a simulation runs.
pub fn preflop_estimate(hand: &[Card; 2]) -> f64 {
    let (a, b) = (hand[0], hand[1]);
    let high = a.rank.value().max(b.rank.value());
    let gap = a.rank.value().abs_diff(b.rank.value());
    let suited = a.suit == b.suit;

    if a.rank == b.rank {
        return match high {
            13.. => 0.35,
            9.. => 0.30,
            _ => 0.28,
        };
    }
    if high == 14 {
        return if suited { 0.30 } else { 0.28 };
    }
    if suited && gap <= 2 && high >= 10 {
        return 0.28;
    }
    0.25
}

/// Exact equities once the board is complete: the sole winner takes everything, a dead
/// heat reports a tie for each winner.
pub fn showdown_equities(winners: &[usize], tie_share: TieShare) -> Vec<HandEquity> {
    let ways = winners.len();
    (0..SEATS)
        .map(|seat| {
            if !winners.contains(&seat) {
                HandEquity::from_equity(seat, 0.0, 0.0, 0.0)
            } else if ways == 1 {
                HandEquity::from_equity(seat, 1.0, 0.0, 1.0)
            } else {
                let share = match tie_share {
                    TieShare::Half => 0.5,
                    TieShare::Exact => 1.0 / ways as f64,
                };
                HandEquity::from_equity(seat, 0.0, 1.0, share)
            }
        })
        .collect()
}

/// Converts loosely parsed hands into hole pairs, checking each has two cards.
pub fn to_hole_pairs(hands: &[Vec<Card>]) -> Result<Vec<[Card; 2]>, GameError> {
    hands
        .iter()
        .enumerate()
        .map(|(seat, cards)| match cards.as_slice() {
            [a, b] => Ok([*a, *b]),
            _ => Err(GameError::InvalidHoleCount {
                seat,
                found: cards.len(),
            }),
        })
        .collect()
}

/// Estimates equity for exactly four hands given the revealed board prefix.
///
/// With a complete board no simulation runs and the result is exact. With
/// `iterations == 0` a single trial is run.
///
/// # Errors
///
/// [`GameError::WrongHandCount`], [`GameError::BoardTooLong`] or
/// [`GameError::DuplicateCard`] for malformed input.
pub fn estimate_equity(
    hands: &[[Card; 2]],
    board: &[Card],
    iterations: u32,
    seed: &str,
) -> Result<EquityResult, GameError> {
    let config = EquityConfig {
        iterations,
        tie_share: TieShare::default(),
    };
    estimate_equity_with(hands, board, &config, seed)
}

pub fn estimate_equity_with(
    hands: &[[Card; 2]],
    board: &[Card],
    config: &EquityConfig,
    seed: &str,
) -> Result<EquityResult, GameError> {
    let setup = Simulation::new(hands, board)?;
    // Never cancelled, so a tally is always produced.
    let tally = setup
        .run(config.iterations, seed, &|| false)
        .unwrap_or_default();
    Ok(setup.result(&tally, config.tie_share))
}

/// Validated inputs of one equity run.
#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    hands: [[Card; 2]; SEATS],
    board: Vec<Card>,
    unknown: Vec<Card>,
}

impl Simulation {
    pub(crate) fn new(hands: &[[Card; 2]], board: &[Card]) -> Result<Self, GameError> {
        let hands: [[Card; 2]; SEATS] = hands
            .try_into()
            .map_err(|_| GameError::WrongHandCount { found: hands.len() })?;
        if board.len() > BOARD_SIZE {
            return Err(GameError::BoardTooLong { found: board.len() });
        }
        let known: Vec<Card> = hands.iter().flatten().chain(board).copied().collect();
        let mut used = 0u64;
        for c in &known {
            let bit = 1u64 << c.id();
            if used & bit != 0 {
                return Err(GameError::DuplicateCard { card: *c });
            }
            used |= bit;
        }
        Ok(Self::from_parts(hands, board))
    }

    /// Builds a run from cards already known to be distinct, e.g. a dealt round.
    pub(crate) fn from_parts(hands: [[Card; 2]; SEATS], board: &[Card]) -> Self {
        let known: Vec<Card> = hands.iter().flatten().chain(board).copied().collect();
        Self {
            hands,
            board: board.to_vec(),
            unknown: remove_cards(&full_deck(), &known),
        }
    }

    fn need(&self) -> usize {
        BOARD_SIZE - self.board.len()
    }

    /// Runs the trials, checking `cancelled` between chunks. `None` once cancelled.
    pub(crate) fn run(
        &self,
        iterations: u32,
        seed: &str,
        cancelled: &(dyn Fn() -> bool + Sync),
    ) -> Option<Tally> {
        let mut board = [self.unknown[0]; BOARD_SIZE];
        board[..self.board.len()].copy_from_slice(&self.board);
        if self.need() == 0 {
            let mut tally = Tally::default();
            self.trial(&board, &mut tally);
            return Some(tally);
        }

        let started = Instant::now();
        let iterations = iterations.max(1);
        let chunks = iterations.div_ceil(CHUNK_TRIALS);
        let mut root = ChaCha20Rng::seed_from_u64(hash_seed(seed) as u64);
        let plan: Vec<(u32, u32)> = (0..chunks)
            .map(|i| {
                let trials = CHUNK_TRIALS.min(iterations - i * CHUNK_TRIALS);
                (root.next_u32(), trials)
            })
            .collect();

        let tally = plan
            .par_iter()
            .map(|&(chunk_seed, trials)| {
                if cancelled() {
                    return None;
                }
                Some(self.run_chunk(chunk_seed, trials, board))
            })
            .try_reduce(Tally::default, |a, b| Some(a.merge(b)))?;

        debug!(
            iterations,
            need = self.need(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "equity simulation finished"
        );
        Some(tally)
    }

    fn run_chunk(&self, seed: u32, trials: u32, mut board: [Card; BOARD_SIZE]) -> Tally {
        let mut rng = SeededRng::from_u32(seed);
        let mut deck = self.unknown.clone();
        let known = self.board.len();
        let need = self.need();
        let mut tally = Tally::default();
        let last = deck.len() - 1;
        for _ in 0..trials {
            // Partial Fisher-Yates: only the first `need` positions are drawn.
            for i in 0..need {
                let j = rng.next_int(i, last);
                deck.swap(i, j);
                board[known + i] = deck[i];
            }
            self.trial(&board, &mut tally);
        }
        tally
    }

    fn trial(&self, board: &[Card; BOARD_SIZE], tally: &mut Tally) {
        let evaluated: Vec<_> = self
            .hands
            .iter()
            .map(|h| evaluate_showdown(h, board))
            .collect();
        let winners = determine_winners(&evaluated);
        tally.trials += 1;
        match winners.as_slice() {
            [sole] => tally.wins[*sole] += 1,
            many => {
                let units = SHARE_UNITS / many.len() as u64;
                for &seat in many {
                    tally.ties[seat] += 1;
                    tally.share_units[seat] += units;
                }
            }
        }
    }

    pub(crate) fn result(&self, tally: &Tally, tie_share: TieShare) -> EquityResult {
        let total = tally.trials.max(1) as f64;
        let equities = (0..SEATS)
            .map(|seat| {
                let win = tally.wins[seat] as f64 / total;
                let tie = tally.ties[seat] as f64 / total;
                let share = match tie_share {
                    TieShare::Half => tie * 0.5,
                    TieShare::Exact => tally.share_units[seat] as f64 / SHARE_UNITS as f64 / total,
                };
                HandEquity::from_equity(seat, win, tie, win + share)
            })
            .collect();
        EquityResult {
            equities,
            total_simulations: tally.trials as u32,
            known_cards: SEATS * 2 + self.board.len(),
            remaining_cards: self.need(),
        }
    }
}

/// Per-seat counters; merging is a plain associative sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    trials: u64,
    wins: [u64; SEATS],
    ties: [u64; SEATS],
    share_units: [u64; SEATS],
}

impl Tally {
    fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        for seat in 0..SEATS {
            self.wins[seat] += other.wins[seat];
            self.ties[seat] += other.ties[seat];
            self.share_units[seat] += other.share_units[seat];
        }
        self
    }
}
