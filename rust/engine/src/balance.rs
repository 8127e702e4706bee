//! Balance collaborator and the snapshot operations that move real money through it.
//!
//! The plain operations in [`crate::game`] only adjust the snapshot's `balance` field.
//! The `_with` variants here also debit and credit a [`BalanceService`], which owns
//! the authoritative figure and serialises concurrent updates for one user.

use std::sync::Mutex;

use tracing::debug;

use crate::errors::{BalanceError, ExchangeError};
use crate::game::{advance_phase, cancel_bets, try_place_bet, GameState, Phase};

pub trait BalanceService: Send + Sync {
    fn balance(&self) -> Result<f64, BalanceError>;
    /// Fails with [`BalanceError::Insufficient`] rather than going negative.
    fn debit(&self, amount: f64) -> Result<(), BalanceError>;
    fn credit(&self, amount: f64) -> Result<(), BalanceError>;
}

/// Process-local balance guarded by a mutex.
#[derive(Debug)]
pub struct InMemoryBalance {
    amount: Mutex<f64>,
}

impl InMemoryBalance {
    pub fn new(initial: f64) -> Self {
        Self {
            amount: Mutex::new(initial),
        }
    }

    fn update<F>(&self, amount: f64, f: F) -> Result<(), BalanceError>
    where
        F: FnOnce(&mut f64) -> Result<(), BalanceError>,
    {
        if !amount.is_finite() || amount < 0.0 {
            return Err(BalanceError::InvalidAmount { amount });
        }
        let mut guard = self
            .amount
            .lock()
            .map_err(|e| BalanceError::Unavailable(e.to_string()))?;
        f(&mut guard)
    }
}

impl BalanceService for InMemoryBalance {
    fn balance(&self) -> Result<f64, BalanceError> {
        self.amount
            .lock()
            .map(|g| *g)
            .map_err(|e| BalanceError::Unavailable(e.to_string()))
    }

    fn debit(&self, amount: f64) -> Result<(), BalanceError> {
        self.update(amount, |available| {
            if amount > *available {
                return Err(BalanceError::Insufficient {
                    requested: amount,
                    available: *available,
                });
            }
            *available -= amount;
            Ok(())
        })
    }

    fn credit(&self, amount: f64) -> Result<(), BalanceError> {
        self.update(amount, |available| {
            *available += amount;
            Ok(())
        })
    }
}

/// Validates the bet against the service's balance, debits the stake, then records it.
///
/// # Errors
///
/// [`ExchangeError::Rejected`] for an invalid request (nothing is debited) or
/// [`ExchangeError::Balance`] when the service refuses the debit.
pub fn place_bet_with(
    service: &dyn BalanceService,
    state: &GameState,
    seat: usize,
    stake: f64,
) -> Result<GameState, ExchangeError> {
    let view = GameState {
        balance: service.balance()?,
        ..state.clone()
    };
    let next = try_place_bet(&view, seat, stake)?;
    service.debit(stake)?;
    Ok(next)
}

/// Refunds open stakes through the service before clearing them from the snapshot.
pub fn cancel_bets_with(
    service: &dyn BalanceService,
    state: &GameState,
) -> Result<GameState, ExchangeError> {
    if state.phase == Phase::Settle || state.bets.is_empty() {
        return Ok(state.clone());
    }
    let refund = state.total_staked();
    service.credit(refund)?;
    debug!(refund, "open bets refunded");
    Ok(cancel_bets(state))
}

/// Advances one phase; on entering `SETTLE` the round's total payout is credited.
pub fn advance_phase_with(
    service: &dyn BalanceService,
    state: &GameState,
) -> Result<GameState, ExchangeError> {
    let next = advance_phase(state);
    if state.phase != Phase::Settle && next.phase == Phase::Settle {
        let payout: f64 = next
            .settlements
            .iter()
            .flatten()
            .map(|s| s.payout)
            .sum();
        if payout > 0.0 {
            service.credit(payout)?;
        }
    }
    Ok(next)
}
