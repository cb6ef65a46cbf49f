//! Monotonic time adapter.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic,
//!   callable from ISR context).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` anchored
//!   at first use, for host-side testing and simulation.
//!
//! Milliseconds are truncated to `u32` and wrap after ~49.7 days; all
//! interval arithmetic goes through [`ticks_diff`](crate::app::ports::ticks_diff).

use crate::app::ports::Clock;

/// Milliseconds since boot, wrapping.
#[cfg(target_os = "espidf")]
pub fn uptime_ms() -> u32 {
    // SAFETY: esp_timer_get_time is a counter read; safe in ISR context.
    ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
}

/// Milliseconds since first use, wrapping.
#[cfg(not(target_os = "espidf"))]
pub fn uptime_ms() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u32
}

/// [`Clock`] backed by the system uptime counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        uptime_ms()
    }
}
