use chrono::{Duration, TimeZone, Utc};
use holdex_engine::equity::{EquityConfig, TieShare};
use holdex_engine::game::{create_state_from_seed_with, Phase};
use holdex_engine::sync::{default_epoch, round_seed, PhaseSchedule, RoundClock};

#[test]
fn clock_counts_rounds_from_epoch() {
    let clock = RoundClock::default();
    // 50 s per round by default
    let t = default_epoch() + Duration::seconds(50 * 41 + 17);
    let s = clock.at(t);
    assert_eq!(s.round_number, 42);
    assert_eq!(s.phase(), Phase::Flop);
    assert_eq!(s.time_in_phase_ms, 2_000);
    assert_eq!(s.time_left_in_phase_ms, 8_000);
    assert_eq!(s.seed, round_seed(42));
}

#[test]
fn custom_schedule_and_epoch() {
    let epoch = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let schedule = PhaseSchedule::new([1_000, 2_000, 2_000, 2_000, 2_000, 1_000]).unwrap();
    let clock = RoundClock::new(epoch, schedule);
    assert_eq!(clock.schedule().round_ms(), 10_000);
    let s = clock.at(epoch + Duration::milliseconds(9_500));
    assert_eq!(s.round_number, 1);
    assert_eq!(s.phase(), Phase::Settle);
    assert_eq!(s.time_left_in_phase_ms, 500);
}

#[test]
fn two_clients_at_the_same_instant_agree() {
    let clock = RoundClock::default();
    let t = default_epoch() + Duration::milliseconds(123_456_789);
    let config = EquityConfig::new(1_000, TieShare::Exact);
    let a = clock.at(t).snapshot_with(&config);
    let b = clock.at(t).snapshot_with(&config);
    assert_eq!(a, b);

    let s = clock.at(t);
    let rebuilt = create_state_from_seed_with(&s.seed, s.phase_index, s.round_number, &config);
    assert_eq!(rebuilt, a);
}
