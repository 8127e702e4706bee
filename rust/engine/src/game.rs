//! Round lifecycle: `PRE_DEAL -> PRE_FLOP -> FLOP -> TURN -> RIVER -> SETTLE`.
//!
//! Every operation takes a snapshot by reference and returns a new one; the input is
//! never touched. Equity estimates are requested through [`equity_request`] and folded
//! back with [`update_equities`], so the slow part can run wherever the caller likes.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::Card;
use crate::deck::{deal_round, BOARD_SIZE, SEATS};
use crate::equity::{
    pre_deal_equities, showdown_equities, EquityConfig, EquityResult, HandEquity, Simulation,
    TieShare,
};
use crate::errors::BetRejection;
use crate::hand::{determine_winners, evaluate_showdown, EvaluatedHand};

pub const DEFAULT_BALANCE: f64 = 1_000.0;

/// Odds recorded for a bet when no estimate is on display.
pub const BLIND_ODDS: f64 = 4.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    PreDeal,
    PreFlop,
    Flop,
    Turn,
    River,
    Settle,
}

pub const PHASE_ORDER: [Phase; 6] = [
    Phase::PreDeal,
    Phase::PreFlop,
    Phase::Flop,
    Phase::Turn,
    Phase::River,
    Phase::Settle,
];

impl Phase {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Indices past the end clamp to [`Phase::Settle`].
    pub fn from_index(index: usize) -> Phase {
        PHASE_ORDER[index.min(PHASE_ORDER.len() - 1)]
    }

    /// The following phase, or `None` from `SETTLE`.
    pub fn next(self) -> Option<Phase> {
        PHASE_ORDER.get(self.index() + 1).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::PreDeal => "PRE_DEAL",
            Phase::PreFlop => "PRE_FLOP",
            Phase::Flop => "FLOP",
            Phase::Turn => "TURN",
            Phase::River => "RIVER",
            Phase::Settle => "SETTLE",
        }
    }

    pub fn hole_cards_visible(self) -> bool {
        self != Phase::PreDeal
    }

    pub fn visible_board_count(self) -> usize {
        match self {
            Phase::PreDeal | Phase::PreFlop => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Settle => BOARD_SIZE,
        }
    }

    /// Phases that wait on a fresh simulation after being entered.
    pub fn needs_equity(self) -> bool {
        !matches!(self, Phase::PreDeal | Phase::Settle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stake on one seat. `odds` is frozen at placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub seat: usize,
    pub stake: f64,
    pub odds: f64,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub bet: Bet,
    pub won: bool,
    pub is_dead_heat: bool,
    pub dead_heat_divisor: usize,
    /// Total returned, stake included
    pub payout: f64,
    pub profit: f64,
}

impl Settlement {
    /// Settles one bet against the winner set using the bet's locked odds.
    ///
    /// A winning bet in a dead heat keeps its full stake and receives its winnings
    /// divided by the number of tied seats.
    pub fn for_bet(bet: &Bet, winners: &[usize]) -> Settlement {
        let won = winners.contains(&bet.seat);
        let is_dead_heat = won && winners.len() > 1;
        let dead_heat_divisor = if is_dead_heat { winners.len() } else { 1 };
        let (payout, profit) = if won {
            let winnings = bet.stake * (bet.odds - 1.0) / dead_heat_divisor as f64;
            (bet.stake + winnings, winnings)
        } else {
            (0.0, -bet.stake)
        };
        Settlement {
            bet: bet.clone(),
            won,
            is_dead_heat,
            dead_heat_divisor,
            payout,
            profit,
        }
    }
}

/// One immutable view of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub seed: String,
    pub hands: [[Card; 2]; SEATS],
    pub board: [Card; BOARD_SIZE],
    pub visible_hole_cards: bool,
    pub visible_board_count: usize,
    /// `None` while a new estimate is pending
    pub equities: Option<Vec<HandEquity>>,
    pub is_calculating: bool,
    pub bets: Vec<Bet>,
    pub balance: f64,
    pub evaluated_hands: Option<Vec<EvaluatedHand>>,
    pub winners: Option<Vec<usize>>,
    /// Present exactly when `phase == SETTLE`
    pub settlements: Option<Vec<Settlement>>,
    pub round_number: u64,
    pub total_profit: f64,
}

impl GameState {
    pub fn total_staked(&self) -> f64 {
        self.bets.iter().map(|b| b.stake).sum()
    }

    /// Odds a new bet on `seat` would lock in right now.
    pub fn current_odds(&self, seat: usize) -> f64 {
        self.equities
            .as_ref()
            .and_then(|eq| eq.get(seat))
            .map_or(BLIND_ODDS, |e| e.fair_odds)
    }
}

/// Seed derived from the wall clock, used when a round is started without one.
pub fn clock_seed() -> String {
    Utc::now().timestamp_millis().to_string()
}

pub fn create_initial_state(balance: f64) -> GameState {
    create_initial_state_seeded(balance, &clock_seed())
}

/// First round of a session, dealt from `seed`.
pub fn create_initial_state_seeded(balance: f64, seed: &str) -> GameState {
    fresh_round(seed, 1, balance, 0.0)
}

fn fresh_round(seed: &str, round_number: u64, balance: f64, total_profit: f64) -> GameState {
    let dealt = deal_round(seed);
    GameState {
        phase: Phase::PreDeal,
        seed: dealt.seed,
        hands: dealt.hands,
        board: dealt.board,
        visible_hole_cards: false,
        visible_board_count: 0,
        equities: Some(pre_deal_equities()),
        is_calculating: false,
        bets: Vec::new(),
        balance,
        evaluated_hands: None,
        winners: None,
        settlements: None,
        round_number,
        total_profit,
    }
}

/// Deals the next round, carrying balance and running profit forward.
///
/// Bets still open on the old round are dropped without refund; callers cancel first
/// if they want stakes back.
pub fn start_new_round(state: &GameState, seed: Option<&str>) -> GameState {
    let seed = seed.map_or_else(clock_seed, str::to_string);
    let next = fresh_round(
        &seed,
        state.round_number + 1,
        state.balance,
        state.total_profit,
    );
    debug!(round = next.round_number, seed = %next.seed, "new round dealt");
    next
}

/// Moves one phase forward. From `SETTLE` the state is returned unchanged.
pub fn advance_phase(state: &GameState) -> GameState {
    let Some(phase) = state.phase.next() else {
        return state.clone();
    };
    let mut next = state.clone();
    next.phase = phase;
    next.visible_hole_cards = phase.hole_cards_visible();
    next.visible_board_count = phase.visible_board_count();
    next.equities = None;
    next.is_calculating = phase.needs_equity();
    debug!(
        round = next.round_number,
        phase = %phase,
        board = next.visible_board_count,
        "phase advanced"
    );
    if phase == Phase::Settle {
        settle(&mut next, TieShare::default());
    }
    next
}

fn settle(state: &mut GameState, tie_share: TieShare) {
    let evaluated: Vec<EvaluatedHand> = state
        .hands
        .iter()
        .map(|h| evaluate_showdown(h, &state.board))
        .collect();
    let winners = determine_winners(&evaluated);
    let settlements: Vec<Settlement> = state
        .bets
        .iter()
        .map(|b| Settlement::for_bet(b, &winners))
        .collect();
    let payout: f64 = settlements.iter().map(|s| s.payout).sum();
    let profit: f64 = settlements.iter().map(|s| s.profit).sum();

    info!(
        round = state.round_number,
        winners = ?winners,
        bets = settlements.len(),
        payout,
        profit,
        "round settled"
    );

    state.equities = Some(showdown_equities(&winners, tie_share));
    state.is_calculating = false;
    state.balance += payout;
    state.total_profit += profit;
    state.evaluated_hands = Some(evaluated);
    state.winners = Some(winners);
    state.settlements = Some(settlements);
}

/// Installs a finished estimate and clears the calculating flag.
pub fn update_equities(state: &GameState, equities: Vec<HandEquity>) -> GameState {
    GameState {
        equities: Some(equities),
        is_calculating: false,
        ..state.clone()
    }
}

/// Places a bet at the odds currently shown for `seat`.
///
/// Before any estimate has arrived for the phase the blind 4.0 odds are used.
///
/// # Errors
///
/// The [`BetRejection`] naming the first failed check; the input is untouched.
pub fn try_place_bet(state: &GameState, seat: usize, stake: f64) -> Result<GameState, BetRejection> {
    if state.phase == Phase::Settle {
        return Err(BetRejection::Settled);
    }
    if seat >= SEATS {
        return Err(BetRejection::SeatOutOfRange { seat });
    }
    // also catches NaN
    if !(stake > 0.0) {
        return Err(BetRejection::NonPositiveStake);
    }
    if stake > state.balance {
        return Err(BetRejection::OverBalance);
    }
    let bet = Bet {
        seat,
        stake,
        odds: state.current_odds(seat),
        phase: state.phase,
    };
    debug!(seat, stake, odds = bet.odds, phase = %bet.phase, "bet placed");
    let mut next = state.clone();
    next.bets.push(bet);
    next.balance -= stake;
    Ok(next)
}

/// Like [`try_place_bet`] but an invalid request simply yields the same state.
pub fn place_bet(state: &GameState, seat: usize, stake: f64) -> GameState {
    try_place_bet(state, seat, stake).unwrap_or_else(|_| state.clone())
}

/// Refunds every open stake and clears the bet list. No-op once settled.
pub fn cancel_bets(state: &GameState) -> GameState {
    if state.phase == Phase::Settle {
        return state.clone();
    }
    let refund = state.total_staked();
    GameState {
        bets: Vec::new(),
        balance: state.balance + refund,
        ..state.clone()
    }
}

pub fn visible_board(state: &GameState) -> &[Card] {
    &state.board[..state.visible_board_count.min(BOARD_SIZE)]
}

pub fn can_bet(state: &GameState) -> bool {
    state.phase != Phase::Settle
}

/// What a pending estimate for a snapshot should be computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRequest {
    pub round_number: u64,
    pub round_seed: String,
    pub phase: Phase,
    pub hands: [[Card; 2]; SEATS],
    pub board: Vec<Card>,
    /// Simulation seed, `"{round seed}:{phase}"`, so every client of a round agrees
    pub seed: String,
}

impl EquityRequest {
    pub(crate) fn simulation(&self) -> Simulation {
        Simulation::from_parts(self.hands, &self.board)
    }

    /// Runs the estimate on the calling thread (and the rayon pool it is in).
    pub fn run(&self, config: &EquityConfig) -> EquityResult {
        let sim = self.simulation();
        let tally = sim
            .run(config.iterations, &self.seed, &|| false)
            .unwrap_or_default();
        sim.result(&tally, config.tie_share)
    }

    /// True when `state` is still the snapshot this request was made for.
    pub fn matches(&self, state: &GameState) -> bool {
        state.is_calculating
            && state.phase == self.phase
            && state.round_number == self.round_number
            && state.seed == self.round_seed
    }
}

/// The estimate a calculating snapshot is waiting for, if any.
pub fn equity_request(state: &GameState) -> Option<EquityRequest> {
    if !state.is_calculating {
        return None;
    }
    Some(EquityRequest {
        round_number: state.round_number,
        round_seed: state.seed.clone(),
        phase: state.phase,
        hands: state.hands,
        board: visible_board(state).to_vec(),
        seed: format!("{}:{}", state.seed, state.phase),
    })
}

/// Rebuilds the view of a round from `(seed, phase index, round number)` alone.
///
/// Equities are computed synchronously, so two processes given the same triple arrive
/// at identical snapshots. Balance is owned elsewhere and starts at zero.
pub fn create_state_from_seed(seed: &str, phase_index: usize, round_number: u64) -> GameState {
    create_state_from_seed_with(seed, phase_index, round_number, &EquityConfig::default())
}

pub fn create_state_from_seed_with(
    seed: &str,
    phase_index: usize,
    round_number: u64,
    config: &EquityConfig,
) -> GameState {
    let phase = Phase::from_index(phase_index);
    let mut state = fresh_round(seed, round_number, 0.0, 0.0);
    state.phase = phase;
    state.visible_hole_cards = phase.hole_cards_visible();
    state.visible_board_count = phase.visible_board_count();

    if phase == Phase::Settle {
        settle(&mut state, config.tie_share);
    } else if phase.needs_equity() {
        state.is_calculating = true;
        state.equities = None;
        if let Some(request) = equity_request(&state) {
            let result = request.run(config);
            state = update_equities(&state, result.equities);
        }
    }
    state
}
