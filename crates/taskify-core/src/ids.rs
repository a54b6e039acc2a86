//! Millisecond-timestamp identifiers.

use chrono::Utc;

/// Current epoch milliseconds, bumped past the largest existing id so two
/// records created within the same millisecond never share one.
pub fn next_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    match existing.into_iter().max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}
