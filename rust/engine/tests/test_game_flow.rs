use holdex_engine::deck::deal_round;
use holdex_engine::equity::{estimate_equity, EquityConfig, TieShare};
use holdex_engine::game::{
    advance_phase, create_initial_state, create_initial_state_seeded, create_state_from_seed,
    create_state_from_seed_with, equity_request, start_new_round, update_equities, visible_board,
    Phase, PHASE_ORDER,
};

#[test]
fn phases_advance_in_order_and_reveal_progressively() {
    let mut state = create_initial_state_seeded(1_000.0, "flow");
    let expected = [
        (Phase::PreDeal, false, 0),
        (Phase::PreFlop, true, 0),
        (Phase::Flop, true, 3),
        (Phase::Turn, true, 4),
        (Phase::River, true, 5),
        (Phase::Settle, true, 5),
    ];
    for (i, (phase, holes, board)) in expected.into_iter().enumerate() {
        assert_eq!(state.phase, phase, "step {i}");
        assert_eq!(state.visible_hole_cards, holes);
        assert_eq!(state.visible_board_count, board);
        assert_eq!(visible_board(&state), &state.board[..board]);
        assert_eq!(state.settlements.is_some(), phase == Phase::Settle);
        state = advance_phase(&state);
    }
    // SETTLE is terminal
    let again = advance_phase(&state);
    assert_eq!(again, state);
}

#[test]
fn advancing_discards_old_equities_and_marks_calculating() {
    let s0 = create_initial_state_seeded(500.0, "calc");
    assert!(!s0.is_calculating);
    assert!(s0.equities.is_some());

    let s1 = advance_phase(&s0);
    assert!(s1.is_calculating);
    assert!(s1.equities.is_none());
    // input snapshot untouched
    assert_eq!(s0.phase, Phase::PreDeal);
    assert!(s0.equities.is_some());

    let req = equity_request(&s1).unwrap();
    let result = req.run(&EquityConfig::new(1_000, TieShare::Exact));
    let s1b = update_equities(&s1, result.equities.clone());
    assert!(!s1b.is_calculating);
    assert_eq!(s1b.equities, Some(result.equities));

    let s2 = advance_phase(&s1b);
    assert!(s2.equities.is_none(), "equities are never carried forward");
}

#[test]
fn settle_reports_exact_final_equities() {
    let mut s = create_initial_state_seeded(100.0, "final");
    for _ in 0..5 {
        s = advance_phase(&s);
    }
    assert_eq!(s.phase, Phase::Settle);
    assert!(!s.is_calculating);
    let winners = s.winners.clone().unwrap();
    let direct = estimate_equity(&s.hands, &s.board, 1, "ignored").unwrap();
    assert_eq!(s.equities, Some(direct.equities));
    assert_eq!(s.evaluated_hands.as_ref().unwrap().len(), 4);
    assert!(!winners.is_empty());
    assert_eq!(s.settlements, Some(vec![]));
}

#[test]
fn new_round_resets_cards_and_counts_rounds() {
    let mut s = create_initial_state_seeded(100.0, "r1");
    for _ in 0..5 {
        s = advance_phase(&s);
    }
    let next = start_new_round(&s, Some("r2"));
    assert_eq!(next.round_number, 2);
    assert_eq!(next.phase, Phase::PreDeal);
    assert_eq!(next.seed, "r2");
    assert!(next.bets.is_empty());
    assert!(next.settlements.is_none());
    assert!(next.winners.is_none());
    assert_eq!(next.hands, deal_round("r2").hands);
    assert_eq!(next.balance, s.balance);
}

#[test]
fn unseeded_rounds_still_deal_valid_cards() {
    let s = create_initial_state(250.0);
    assert!(!s.seed.is_empty());
    assert_eq!(s.round_number, 1);
    let next = start_new_round(&s, None);
    assert_eq!(next.round_number, 2);
}

#[test]
fn state_from_seed_matches_local_play() {
    let config = EquityConfig::new(2_000, TieShare::Exact);
    let mut local = create_initial_state_seeded(0.0, "shared-seed");
    for (index, phase) in PHASE_ORDER.iter().enumerate() {
        let remote = create_state_from_seed_with("shared-seed", index, 1, &config);
        assert_eq!(remote.phase, *phase);
        assert_eq!(remote.hands, local.hands);
        assert_eq!(visible_board(&remote), visible_board(&local));
        assert!(!remote.is_calculating);
        assert!(remote.equities.is_some());

        if let Some(req) = equity_request(&local) {
            local = update_equities(&local, req.run(&config).equities);
        }
        assert_eq!(remote.equities, local.equities, "phase {phase}");
        assert_eq!(remote.winners, local.winners);
        local = advance_phase(&local);
    }
}

#[test]
fn state_from_seed_is_identical_across_calls() {
    let a = create_state_from_seed("holdem-round-42-v1", 2, 42);
    let b = create_state_from_seed("holdem-round-42-v1", 2, 42);
    assert_eq!(a, b);
    assert_eq!(a.round_number, 42);
    assert_eq!(a.balance, 0.0);
    // out-of-range phase index clamps to SETTLE
    let s = create_state_from_seed("holdem-round-42-v1", 17, 42);
    assert_eq!(s.phase, Phase::Settle);
    assert_eq!(s.settlements, Some(vec![]));
}
