use std::sync::Arc;
use std::thread;

use holdex_engine::balance::{
    advance_phase_with, cancel_bets_with, place_bet_with, BalanceService, InMemoryBalance,
};
use holdex_engine::cards::parse_cards;
use holdex_engine::errors::{BalanceError, BetRejection, ExchangeError};
use holdex_engine::game::{create_initial_state_seeded, GameState, Phase};

/// Service that refuses every debit.
struct Offline;

impl BalanceService for Offline {
    fn balance(&self) -> Result<f64, BalanceError> {
        Ok(1_000.0)
    }
    fn debit(&self, _amount: f64) -> Result<(), BalanceError> {
        Err(BalanceError::Unavailable("offline".into()))
    }
    fn credit(&self, _amount: f64) -> Result<(), BalanceError> {
        Err(BalanceError::Unavailable("offline".into()))
    }
}

fn state() -> GameState {
    create_initial_state_seeded(0.0, "balance")
}

#[test]
fn bet_debits_the_service() {
    let wallet = InMemoryBalance::new(50.0);
    let s = place_bet_with(&wallet, &state(), 1, 20.0).unwrap();
    assert_eq!(wallet.balance().unwrap(), 30.0);
    assert_eq!(s.balance, 30.0);
    assert_eq!(s.bets.len(), 1);
}

#[test]
fn rejected_bet_debits_nothing() {
    let wallet = InMemoryBalance::new(50.0);
    let err = place_bet_with(&wallet, &state(), 1, 80.0).unwrap_err();
    assert_eq!(err, ExchangeError::Rejected(BetRejection::OverBalance));
    assert_eq!(wallet.balance().unwrap(), 50.0);
}

#[test]
fn service_failure_propagates_and_keeps_snapshot() {
    let s = state();
    let err = place_bet_with(&Offline, &s, 0, 10.0).unwrap_err();
    assert!(matches!(err, ExchangeError::Balance(BalanceError::Unavailable(_))));
    assert!(s.bets.is_empty());
}

#[test]
fn cancel_credits_refund() {
    let wallet = InMemoryBalance::new(50.0);
    let s = place_bet_with(&wallet, &state(), 0, 10.0).unwrap();
    let s = place_bet_with(&wallet, &s, 2, 15.0).unwrap();
    assert_eq!(wallet.balance().unwrap(), 25.0);
    let s = cancel_bets_with(&wallet, &s).unwrap();
    assert_eq!(wallet.balance().unwrap(), 50.0);
    // idempotent
    let again = cancel_bets_with(&wallet, &s).unwrap();
    assert_eq!(again, s);
    assert_eq!(wallet.balance().unwrap(), 50.0);
}

#[test]
fn settlement_credits_total_payout() {
    let wallet = InMemoryBalance::new(100.0);
    let mut s = state();
    let cards = parse_cards("As Ks Qd Qh 7c 7d 2h 3h").unwrap();
    for seat in 0..4 {
        s.hands[seat] = [cards[seat * 2], cards[seat * 2 + 1]];
    }
    let board = parse_cards("Qs 9d 7h 4c 2s").unwrap();
    s.board.copy_from_slice(&board);

    s = place_bet_with(&wallet, &s, 1, 10.0).unwrap();
    s = place_bet_with(&wallet, &s, 0, 10.0).unwrap();
    while s.phase != Phase::Settle {
        s = advance_phase_with(&wallet, &s).unwrap();
    }
    // 10 at 4.0 on the winner returns 40
    assert_eq!(wallet.balance().unwrap(), 120.0);
    // already settled: no second credit
    let again = advance_phase_with(&wallet, &s).unwrap();
    assert_eq!(again, s);
    assert_eq!(wallet.balance().unwrap(), 120.0);
}

#[test]
fn concurrent_debits_never_overdraw() {
    let wallet = Arc::new(InMemoryBalance::new(100.0));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let w = Arc::clone(&wallet);
            thread::spawn(move || (0..10).filter(|_| w.debit(2.0).is_ok()).count())
        })
        .collect();
    let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(accepted, 50);
    assert_eq!(wallet.balance().unwrap(), 0.0);
}
