//! Port traits — the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RelayController (domain)
//! ```
//!
//! Driven adapters (relay GPIO, log output, clock, configuration source)
//! implement these traits.  The [`RelayController`](super::service::RelayController)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::BoardConfig;
use crate::error::Result;
use crate::ids::RelayId;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  The counter is allowed to wrap; callers
/// compare timestamps with [`ticks_diff`] only.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds elapsed from `earlier` to `now`, correct across a wrap of
/// the 32-bit counter as long as the true gap is below ~49 days.
#[inline]
pub const fn ticks_diff(now: u32, earlier: u32) -> u32 {
    now.wrapping_sub(earlier)
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to energise or release a relay.
pub trait RelayPort {
    fn write(&mut self, relay: RelayId, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / status)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`BoardEvent`](super::events::BoardEvent)s
/// through this port.  Adapters decide where they go (serial log, display,
/// MQTT publisher, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::BoardEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: config storage → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies the relay and input tables once at startup.
pub trait ConfigSource {
    fn load(&self) -> Result<BoardConfig>;
}
