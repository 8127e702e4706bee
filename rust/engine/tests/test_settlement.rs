use holdex_engine::cards::{parse_cards, Card};
use holdex_engine::game::{advance_phase, create_initial_state_seeded, place_bet, GameState, Phase};

fn pair(s: &str) -> [Card; 2] {
    let c = parse_cards(s).unwrap();
    [c[0], c[1]]
}

/// A state at RIVER with hand-picked cards.
fn rigged(hands: [&str; 4], board: &str) -> GameState {
    let mut s = create_initial_state_seeded(1_000.0, "rigged");
    s.hands = [pair(hands[0]), pair(hands[1]), pair(hands[2]), pair(hands[3])];
    let b = parse_cards(board).unwrap();
    s.board = [b[0], b[1], b[2], b[3], b[4]];
    s
}

fn settle(mut s: GameState) -> GameState {
    while s.phase != Phase::Settle {
        s = advance_phase(&s);
    }
    s
}

#[test]
fn payouts_minus_stakes_equal_profit() {
    let mut s = rigged(["As Ks", "Qd Qh", "7c 7d", "2h 3h"], "Qs 9d 7h 4c 2s");
    s = place_bet(&s, 0, 10.0); // 4.0 blind
    s = place_bet(&s, 1, 25.0);
    s = place_bet(&s, 1, 5.0);
    s = place_bet(&s, 3, 12.5);
    let before_balance = s.balance;
    let staked = s.total_staked();

    let done = settle(s);
    assert_eq!(done.winners, Some(vec![1]));
    let settlements = done.settlements.as_ref().unwrap();
    assert_eq!(settlements.len(), 4);

    let payout: f64 = settlements.iter().map(|x| x.payout).sum();
    let profit: f64 = settlements.iter().map(|x| x.profit).sum();
    assert!((payout - staked - profit).abs() < 1e-9);

    // seat 1 wins both bets at 4.0
    assert!(settlements[1].won && settlements[2].won);
    assert_eq!(settlements[1].payout, 100.0);
    assert_eq!(settlements[2].profit, 15.0);
    assert!(!settlements[0].won);
    assert_eq!(settlements[3].profit, -12.5);

    assert!((done.balance - (before_balance + payout)).abs() < 1e-9);
    assert!((done.total_profit - profit).abs() < 1e-9);
}

#[test]
fn dead_heat_splits_winnings_by_winner_count() {
    // Seats 0 and 2 both make the ace-high straight; 1 and 3 miss.
    let mut s = rigged(["Ac 2d", "3c 4d", "Ad 5h", "6c 8d"], "Ks Qh Jd Tc 2s");
    s = place_bet(&s, 0, 20.0);
    s = place_bet(&s, 2, 20.0);
    s = place_bet(&s, 1, 20.0);
    let done = settle(s);
    assert_eq!(done.winners, Some(vec![0, 2]));

    let st = done.settlements.unwrap();
    let single_winner_winnings = 20.0 * (4.0 - 1.0);
    for x in &st[..2] {
        assert!(x.won && x.is_dead_heat);
        assert_eq!(x.dead_heat_divisor, 2);
        assert!((x.profit - single_winner_winnings / 2.0).abs() < 1e-9);
        assert!((x.payout - (20.0 + single_winner_winnings / 2.0)).abs() < 1e-9);
    }
    let losing = &st[2];
    assert!(!losing.won && !losing.is_dead_heat);
    assert_eq!(losing.dead_heat_divisor, 1);
    assert_eq!(losing.payout, 0.0);
}

#[test]
fn locked_odds_drive_dead_heat_payout() {
    let mut s = rigged(["2c 3d", "4h 5c", "6d 7h", "8c 9d"], "As Ks Qs Js Ts");
    s = place_bet(&s, 3, 10.0);
    // later bet at different odds
    s = advance_phase(&s);
    s.equities = Some(holdex_engine::equity::showdown_equities(
        &[3],
        Default::default(),
    ));
    s.is_calculating = false;
    s = place_bet(&s, 3, 10.0);
    assert_eq!(s.bets[1].odds, 1.0);

    let done = settle(s);
    let st = done.settlements.unwrap();
    assert_eq!(st[0].dead_heat_divisor, 4);
    assert!((st[0].profit - 7.5).abs() < 1e-9);
    assert_eq!(st[1].profit, 0.0);
    assert_eq!(st[1].payout, 10.0);
}
