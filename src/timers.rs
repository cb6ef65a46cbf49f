//! Per-relay countdown timers.
//!
//! One slot per relay, so "at most one live timer per relay" is a property
//! of the storage rather than something callers must remember.  Arming a
//! relay that already has a timer replaces it.
//!
//! ```text
//!   arm(relay, D, now)           fire_expired(now, f)
//!         │                              │
//!         ▼                              ▼
//!  ┌──────────────────────────────────────────────┐
//!  │  slots[relay]: Option<TimerEntry>            │
//!  │    started_ms · duration_ms · generation     │
//!  │    on_expire payload                         │
//!  └──────────────────────────────────────────────┘
//!         │ take() before callback
//!         ▼
//!     f(relay, payload)   ← may re-arm the same relay safely
//! ```
//!
//! Time is a wrapping millisecond counter supplied by the caller; nothing
//! here reads a clock, which keeps the manager deterministic under test.

use log::debug;

use crate::app::ports::ticks_diff;
use crate::ids::{RELAY_COUNT, RelayId};

/// Identifies one particular arming of a relay's timer.  A handle goes
/// stale as soon as the timer expires, is cancelled or is re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub relay: RelayId,
    generation: u32,
}

/// Internal bookkeeping for a live countdown.
#[derive(Debug, Clone, Copy)]
struct TimerEntry<T> {
    started_ms: u32,
    duration_ms: u32,
    generation: u32,
    on_expire: T,
}

impl<T> TimerEntry<T> {
    fn elapsed(&self, now_ms: u32) -> u32 {
        ticks_diff(now_ms, self.started_ms)
    }

    fn is_expired(&self, now_ms: u32) -> bool {
        self.elapsed(now_ms) >= self.duration_ms
    }

    fn remaining(&self, now_ms: u32) -> u32 {
        self.duration_ms.saturating_sub(self.elapsed(now_ms))
    }
}

/// The timer manager.  `T` is the payload handed back on expiry.
pub struct TimerManager<T: Copy> {
    slots: [Option<TimerEntry<T>>; RELAY_COUNT],
    next_generation: u32,
}

impl<T: Copy> TimerManager<T> {
    pub fn new() -> Self {
        Self {
            slots: [None; RELAY_COUNT],
            next_generation: 0,
        }
    }

    /// Start a countdown of `duration_ms` on `relay`, replacing any timer
    /// already running there.
    pub fn arm(&mut self, relay: RelayId, duration_ms: u32, now_ms: u32, on_expire: T) -> TimerHandle {
        if self.cancel(relay) {
            debug!("Timers: relay {} re-armed, previous countdown dropped", relay);
        }
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.slots[relay.index()] = Some(TimerEntry {
            started_ms: now_ms,
            duration_ms,
            generation,
            on_expire,
        });
        debug!("Timers: relay {} armed for {}ms", relay, duration_ms);
        TimerHandle { relay, generation }
    }

    /// Stop the countdown on `relay`.  Returns whether one was running;
    /// cancelling an idle relay is a no-op.
    pub fn cancel(&mut self, relay: RelayId) -> bool {
        self.slots[relay.index()].take().is_some()
    }

    /// Milliseconds left on `relay`, or 0 if nothing is armed.
    pub fn remaining(&self, relay: RelayId, now_ms: u32) -> u32 {
        self.slots[relay.index()].map_or(0, |e| e.remaining(now_ms))
    }

    /// Whether `handle` still refers to the live timer on its relay.
    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.slots[handle.relay.index()].is_some_and(|e| e.generation == handle.generation)
    }

    /// Whether any timer is running on `relay`.
    pub fn is_armed(&self, relay: RelayId) -> bool {
        self.slots[relay.index()].is_some()
    }

    /// Number of live timers.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Time until the earliest live timer expires, `None` when idle.
    pub fn next_expiry_in(&self, now_ms: u32) -> Option<u32> {
        self.slots.iter().flatten().map(|e| e.remaining(now_ms)).min()
    }

    /// Fire every expired timer.
    ///
    /// Each timer is removed from the active set before `f` sees it, so
    /// `f` fires exactly once per arming and may re-arm the same relay.
    /// Returns the number of timers fired.
    pub fn fire_expired(&mut self, now_ms: u32, mut f: impl FnMut(RelayId, T)) -> usize {
        let mut fired = 0;
        for idx in 0..RELAY_COUNT {
            let due = self.slots[idx].is_some_and(|e| e.is_expired(now_ms));
            if !due {
                continue;
            }
            let Some(entry) = self.slots[idx].take() else {
                continue;
            };
            let Ok(relay) = RelayId::from_index(idx) else {
                continue;
            };
            fired += 1;
            f(relay, entry.on_expire);
        }
        fired
    }
}

impl<T: Copy> Default for TimerManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
