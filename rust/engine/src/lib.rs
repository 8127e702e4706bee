//! # holdex-engine: Hold'em Exchange Core
//!
//! A deterministic four-seat Hold'em "exchange": every hand is dealt face down from a
//! seeded shuffle, the board is revealed phase by phase, and players back seats at
//! fair odds derived from Monte Carlo equity. Odds are locked when a bet is placed;
//! settlement splits winnings on a dead heat.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), ids and parsing
//! - [`rng`] - Seeded xorshift32 generator behind every shuffle
//! - [`deck`] - Fisher-Yates shuffling and the fixed round deal
//! - [`hand`] - Best-five-of-seven evaluation, scoring and winner sets
//! - [`equity`] - Monte Carlo win/tie estimation over four hands
//! - [`worker`] - Generation-tagged equity jobs on a thread pool
//! - [`game`] - Phase state machine, bet ledger and settlement
//! - [`balance`] - Balance service contract and balance-aware operations
//! - [`sync`] - Round clock deriving `(seed, phase, round)` from time
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdex_engine::game::{advance_phase, create_initial_state_seeded, place_bet, Phase};
//!
//! let state = create_initial_state_seeded(1_000.0, "demo-seed");
//! // Blind bet at 4.0 before anything is revealed
//! let state = place_bet(&state, 2, 50.0);
//! assert_eq!(state.bets[0].odds, 4.0);
//!
//! let mut state = state;
//! while state.phase != Phase::Settle {
//!     state = advance_phase(&state);
//! }
//! assert!(state.settlements.is_some());
//! ```
//!
//! ## Deterministic Dealing
//!
//! ```rust
//! use holdex_engine::deck::deal_round;
//!
//! // Same seed, same hands and board
//! assert_eq!(deal_round("round-1"), deal_round("round-1"));
//! ```

pub mod balance;
pub mod cards;
pub mod deck;
pub mod equity;
pub mod errors;
pub mod game;
pub mod hand;
pub mod rng;
pub mod sync;
pub mod worker;
