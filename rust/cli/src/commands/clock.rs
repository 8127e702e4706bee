//! Clock command: which round and phase the shared table is in.

use std::io::Write;

use chrono::{DateTime, Utc};
use holdex_engine::sync::RoundClock;

use crate::error::CliError;

/// `at` is an RFC 3339 timestamp; the current time when absent.
pub fn handle_clock_command(
    at: Option<&str>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let clock = RoundClock::default();
    let sync = match at {
        Some(text) => {
            let time = DateTime::parse_from_rfc3339(text)
                .map_err(|e| CliError::InvalidInput(format!("invalid --at {:?}: {}", text, e)))?;
            clock.at(time.with_timezone(&Utc))
        }
        None => clock.now(),
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&sync)?)?;
    } else {
        writeln!(
            out,
            "Round {} | {} | {:.1}s left | seed {}",
            sync.round_number,
            sync.phase(),
            sync.time_left_in_phase_ms as f64 / 1000.0,
            sync.seed
        )?;
    }
    Ok(())
}
