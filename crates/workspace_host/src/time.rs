//! Wall-clock helpers for record timestamps.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ISSUED_MS: Cell<u64> = const { Cell::new(0) };
}

/// Current unix time in milliseconds. Clocks before the epoch read as `0`.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    let now = js_sys::Date::now().max(0.0) as u64;

    #[cfg(not(target_arch = "wasm32"))]
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);

    now
}

/// Strictly increasing unix millisecond timestamp for this thread.
///
/// Two records created within the same millisecond still get distinct, ordered timestamps.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_ISSUED_MS.with(|last| {
        let issued = now.max(last.get() + 1);
        last.set(issued);
        issued
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_timestamps_strictly_increase() {
        let first = next_monotonic_timestamp_ms();
        let second = next_monotonic_timestamp_ms();
        let third = next_monotonic_timestamp_ms();
        assert!(first < second && second < third);
        assert!(first >= unix_time_ms_now().saturating_sub(60_000));
    }
}
