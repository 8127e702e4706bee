use thiserror::Error;

use crate::cards::Card;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Need at least 5 cards to evaluate, got {found}")]
    NotEnoughCards { found: usize },
    #[error("Hold'em Exchange requires exactly 4 hands, got {found}")]
    WrongHandCount { found: usize },
    #[error("Seat {seat} must hold exactly 2 hole cards, got {found}")]
    InvalidHoleCount { seat: usize, found: usize },
    #[error("Board holds at most 5 cards, got {found}")]
    BoardTooLong { found: usize },
    #[error("Card {card} appears more than once")]
    DuplicateCard { card: Card },
    #[error("Card id {id} is outside 0..52")]
    InvalidCardId { id: u8 },
    #[error("Cannot parse card from {input:?}")]
    InvalidCard { input: String },
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BalanceError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    Insufficient { requested: f64, available: f64 },
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },
    #[error("Balance service unavailable: {0}")]
    Unavailable(String),
}

/// Reason a bet request was refused. Refusal never changes the snapshot.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BetRejection {
    #[error("Round already settled")]
    Settled,
    #[error("Stake must be positive")]
    NonPositiveStake,
    #[error("Stake exceeds balance")]
    OverBalance,
    #[error("Seat {seat} is outside 0..=3")]
    SeatOutOfRange { seat: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExchangeError {
    #[error(transparent)]
    Rejected(#[from] BetRejection),
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to start equity worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Round schedule must last longer than zero milliseconds")]
pub struct ScheduleError;
