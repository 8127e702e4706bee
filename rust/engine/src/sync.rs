//! Shared round clock.
//!
//! Rounds run back to back from a fixed epoch, so any process that knows the time can
//! work out the current `(seed, phase index, round number)` and rebuild the round with
//! [`create_state_from_seed`](crate::game::create_state_from_seed) without exchanging
//! card data.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::equity::EquityConfig;
use crate::errors::ScheduleError;
use crate::game::{create_state_from_seed_with, GameState, Phase, PHASE_ORDER};

/// Per-phase durations in milliseconds, indexed like [`PHASE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u64; 6]", into = "[u64; 6]")]
pub struct PhaseSchedule {
    durations_ms: [u64; 6],
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self {
            durations_ms: [5_000, 10_000, 10_000, 10_000, 10_000, 5_000],
        }
    }
}

impl TryFrom<[u64; 6]> for PhaseSchedule {
    type Error = ScheduleError;

    fn try_from(durations_ms: [u64; 6]) -> Result<Self, Self::Error> {
        Self::new(durations_ms).ok_or(ScheduleError)
    }
}

impl From<PhaseSchedule> for [u64; 6] {
    fn from(schedule: PhaseSchedule) -> Self {
        schedule.durations_ms
    }
}

impl PhaseSchedule {
    /// `None` if the round would last zero milliseconds.
    pub fn new(durations_ms: [u64; 6]) -> Option<Self> {
        (durations_ms.iter().sum::<u64>() > 0).then_some(Self { durations_ms })
    }

    pub fn duration_ms(&self, phase: Phase) -> u64 {
        self.durations_ms[phase.index()]
    }

    pub fn round_ms(&self) -> u64 {
        self.durations_ms.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// Starts at 1 for the round beginning at the epoch
    pub round_number: u64,
    pub phase_index: usize,
    pub time_in_phase_ms: u64,
    pub time_left_in_phase_ms: u64,
    pub seed: String,
}

impl SyncState {
    pub fn phase(&self) -> Phase {
        Phase::from_index(self.phase_index)
    }

    pub fn snapshot(&self) -> GameState {
        self.snapshot_with(&EquityConfig::default())
    }

    pub fn snapshot_with(&self, config: &EquityConfig) -> GameState {
        create_state_from_seed_with(&self.seed, self.phase_index, self.round_number, config)
    }
}

pub fn round_seed(round_number: u64) -> String {
    format!("holdem-round-{round_number}-v1")
}

pub fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundClock {
    epoch: DateTime<Utc>,
    schedule: PhaseSchedule,
}

impl Default for RoundClock {
    fn default() -> Self {
        Self::new(default_epoch(), PhaseSchedule::default())
    }
}

impl RoundClock {
    pub fn new(epoch: DateTime<Utc>, schedule: PhaseSchedule) -> Self {
        Self { epoch, schedule }
    }

    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    pub fn now(&self) -> SyncState {
        self.at(Utc::now())
    }

    /// Where the table stands at `time`. Times before the epoch count as the epoch.
    pub fn at(&self, time: DateTime<Utc>) -> SyncState {
        let elapsed = (time - self.epoch).num_milliseconds().max(0) as u64;
        let round_ms = self.schedule.round_ms();
        let round_number = elapsed / round_ms + 1;
        let in_round = elapsed % round_ms;

        let mut start = 0;
        let mut phase_index = 0;
        for phase in PHASE_ORDER {
            let len = self.schedule.duration_ms(phase);
            if in_round < start + len {
                phase_index = phase.index();
                break;
            }
            start += len;
        }
        let time_in_phase_ms = in_round - start;
        let time_left_in_phase_ms = self
            .schedule
            .duration_ms(Phase::from_index(phase_index))
            .saturating_sub(time_in_phase_ms);

        SyncState {
            round_number,
            phase_index,
            time_in_phase_ms,
            time_left_in_phase_ms,
            seed: round_seed(round_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn epoch_is_round_one_pre_deal() {
        let clock = RoundClock::default();
        let s = clock.at(default_epoch());
        assert_eq!(s.round_number, 1);
        assert_eq!(s.phase(), Phase::PreDeal);
        assert_eq!(s.time_left_in_phase_ms, 5_000);
        assert_eq!(s.seed, "holdem-round-1-v1");
    }

    #[test]
    fn phase_boundaries_follow_schedule() {
        let clock = RoundClock::default();
        let at = |ms| clock.at(default_epoch() + Duration::milliseconds(ms));
        assert_eq!(at(4_999).phase(), Phase::PreDeal);
        assert_eq!(at(5_000).phase(), Phase::PreFlop);
        assert_eq!(at(15_000).phase(), Phase::Flop);
        assert_eq!(at(45_000).phase(), Phase::Settle);
        let next = at(50_000);
        assert_eq!(next.round_number, 2);
        assert_eq!(next.phase(), Phase::PreDeal);
    }

    #[test]
    fn before_epoch_clamps() {
        let clock = RoundClock::default();
        let s = clock.at(default_epoch() - Duration::hours(1));
        assert_eq!(s.round_number, 1);
        assert_eq!(s.time_in_phase_ms, 0);
    }

    #[test]
    fn zero_schedule_is_refused() {
        assert!(PhaseSchedule::new([0; 6]).is_none());
        assert!(PhaseSchedule::new([0, 1, 0, 0, 0, 0]).is_some());
    }

    #[test]
    fn zero_schedule_cannot_be_deserialized() {
        let zero = serde_json::from_str::<PhaseSchedule>("[0,0,0,0,0,0]").unwrap_err();
        assert!(zero.to_string().contains("zero milliseconds"));
    }

    #[test]
    fn schedule_serializes_as_duration_list() {
        let json = serde_json::to_string(&PhaseSchedule::default()).unwrap();
        assert_eq!(json, "[5000,10000,10000,10000,10000,5000]");
        let back: PhaseSchedule = serde_json::from_str(&json).unwrap();
        let clock = RoundClock::new(default_epoch(), back);
        assert_eq!(clock.at(default_epoch()).round_number, 1);
    }
}
