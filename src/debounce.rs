//! ISR-side debounce filter.
//!
//! ## Hardware
//!
//! Active-low contacts with pull-ups.  The GPIO fires on both edges; the
//! ISR reads the pin level, classifies the edge (low = press = activate,
//! high = release = deactivate) and asks the filter whether to accept it.
//!
//! ## Rule
//!
//! An edge is accepted only if strictly more than the interval has passed
//! since the last *accepted* edge of the same direction on the same slot.
//! The first edge of each direction is always accepted.  Press and release
//! are tracked independently, so a bounce on release never eats the next
//! press.
//!
//! Storage is a fixed array of atomics indexed by slot: no allocation and
//! no locking on the interrupt path.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::app::ports::ticks_diff;
use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::events::Direction;

/// Last-accepted timestamp for one direction of one slot.
struct EdgeStamp {
    at_ms: AtomicU32,
    seen: AtomicBool,
}

impl EdgeStamp {
    const fn new() -> Self {
        Self {
            at_ms: AtomicU32::new(0),
            seen: AtomicBool::new(false),
        }
    }

    fn try_accept(&self, now_ms: u32, interval_ms: u32) -> bool {
        if self.seen.load(Ordering::Acquire)
            && ticks_diff(now_ms, self.at_ms.load(Ordering::Relaxed)) <= interval_ms
        {
            return false;
        }
        self.at_ms.store(now_ms, Ordering::Relaxed);
        self.seen.store(true, Ordering::Release);
        true
    }
}

/// Per-slot, per-direction edge filter for `N` contacts.
pub struct DebounceFilter<const N: usize> {
    interval_ms: AtomicU32,
    press: [EdgeStamp; N],
    release: [EdgeStamp; N],
}

impl<const N: usize> DebounceFilter<N> {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: AtomicU32::new(interval_ms),
            press: [const { EdgeStamp::new() }; N],
            release: [const { EdgeStamp::new() }; N],
        }
    }

    /// Change the interval (startup only, from configuration).
    pub fn set_interval(&self, interval_ms: u32) {
        self.interval_ms.store(interval_ms, Ordering::Relaxed);
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms.load(Ordering::Relaxed)
    }

    /// Classify an edge on `slot` and decide whether it survives.
    ///
    /// `level` is the pin level read in the ISR.  Returns the logical
    /// direction if accepted, `None` if suppressed or `slot` is out of
    /// range.
    pub fn accept(&self, slot: usize, level: bool, now_ms: u32) -> Option<Direction> {
        let (stamps, direction) = if level {
            (&self.release, Direction::Deactivate)
        } else {
            (&self.press, Direction::Activate)
        };
        let stamp = stamps.get(slot)?;
        stamp
            .try_accept(now_ms, self.interval_ms())
            .then_some(direction)
    }
}

impl<const N: usize> Default for DebounceFilter<N> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
