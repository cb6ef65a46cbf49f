//! Mock adapters for integration tests.
//!
//! Records every relay write and board event so tests can assert on the
//! full history without touching real GPIO registers.

use std::cell::Cell;

use relayboard::RelayController;
use relayboard::app::events::BoardEvent;
use relayboard::app::ports::{Clock, EventSink, RelayPort};
use relayboard::config::BoardConfig;
use relayboard::ids::{RELAY_COUNT, RelayId};

// ── MockRelays ────────────────────────────────────────────────

pub struct MockRelays {
    pub levels: [bool; RELAY_COUNT],
    pub writes: Vec<(RelayId, bool)>,
}

#[allow(dead_code)]
impl MockRelays {
    pub fn new() -> Self {
        Self {
            levels: [false; RELAY_COUNT],
            writes: Vec::new(),
        }
    }

    /// Physical level of relay `id` (1-based).
    pub fn is_on(&self, id: u8) -> bool {
        self.levels[id as usize - 1]
    }
}

impl Default for MockRelays {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPort for MockRelays {
    fn write(&mut self, relay: RelayId, on: bool) {
        self.levels[relay.index()] = on;
        self.writes.push((relay, on));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<BoardEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&BoardEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &BoardEvent) {
        self.events.push(event.clone());
    }
}

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock {
    now: Cell<u32>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── Fixtures ──────────────────────────────────────────────────

/// Controller on the shipped table, already started.
#[allow(dead_code)]
pub fn board() -> (RelayController, MockRelays, RecordingSink) {
    board_with(&BoardConfig::default())
}

pub fn board_with(config: &BoardConfig) -> (RelayController, MockRelays, RecordingSink) {
    let mut ctl = RelayController::new(config).expect("config should resolve");
    let mut relays = MockRelays::new();
    let mut sink = RecordingSink::new();
    ctl.start(&mut relays, &mut sink);
    sink.clear();
    (ctl, relays, sink)
}
