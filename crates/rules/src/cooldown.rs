//! Per-trigger cooldown gate.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::state::{AlertState, TriggerKey};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Convert fractional hours to a chrono duration at millisecond resolution.
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
}

/// Whether a candidate may be delivered now.
///
/// A key that never fired is always allowed. Otherwise at least
/// `min_hours_between_alerts` must have elapsed since the last firing. A
/// last-fired timestamp in the future (clock skew) keeps the key suppressed.
pub fn should_fire(
    key: &TriggerKey,
    now: DateTime<Utc>,
    min_hours_between_alerts: f64,
    state: &AlertState,
) -> bool {
    let Some(last) = state.last_fired(key) else {
        return true;
    };

    let elapsed = now.signed_duration_since(last);
    let cooldown = hours_to_duration(min_hours_between_alerts);
    if elapsed < cooldown {
        debug!(
            key = %key,
            last_fired = %last,
            elapsed_ms = elapsed.num_milliseconds(),
            cooldown_ms = cooldown.num_milliseconds(),
            "trigger still in cooldown"
        );
        return false;
    }
    true
}
