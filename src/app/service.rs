//! Relay controller — the hexagonal core.
//!
//! [`RelayController`] owns the mapping table, relay bank, timer manager
//! and listener lists.  It is driven from one cooperative task and is the
//! only writer of mapping and relay state, so none of it needs a lock.
//! All I/O flows through port traits injected at call sites.
//!
//! ```text
//!  EventQueue ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │        RelayController       │
//!     Clock ────▶ │ Mapping · Behavior · Timers  │ ──▶ RelayPort
//!                 └──────────────────────────────┘
//!                           │ after each event
//!                           ▼
//!                  activation / deactivation listeners
//! ```

use log::{debug, info, warn};

use crate::config::BoardConfig;
use crate::error::{Error, Result};
use crate::events::{Direction, Event, EventQueue, Message};
use crate::ids::{BUTTON_COUNT, ButtonId, INPUT_COUNT, InputId, RELAY_COUNT, RelayId};
use crate::relays::RelayBank;
use crate::timers::TimerManager;

use super::behavior::{TimerAction, decide};
use super::events::{BoardEvent, Cause};
use super::mapping::{Mapping, MappingTable};
use super::ports::{Clock, EventSink, RelayPort};
use super::status::{RelaySnapshot, RelayStatus};

// ───────────────────────────────────────────────────────────────
// Listener types
// ───────────────────────────────────────────────────────────────

/// What an input listener sees once an event has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputNotice {
    pub input: InputId,
    pub direction: Direction,
    /// Relay the input is mapped to, `None` for unmapped inputs.
    pub relay: Option<RelayId>,
    /// Relay level after the transition.
    pub relay_on: bool,
    /// Mapping `active` flag after the transition.
    pub active: bool,
}

/// Observer for input events.  Errors are logged and swallowed.
pub type InputListener = Box<dyn FnMut(&InputNotice) -> Result<()>>;

/// Observer for front-panel button presses.  Errors are logged and swallowed.
pub type ButtonListener = Box<dyn FnMut(ButtonId) -> Result<()>>;

// ───────────────────────────────────────────────────────────────
// RelayController
// ───────────────────────────────────────────────────────────────

/// The control core.
pub struct RelayController {
    relays: RelayBank,
    mappings: MappingTable,
    /// Expiry payload is the input whose mapping armed the countdown.
    timers: TimerManager<InputId>,
    on_activate: [Vec<InputListener>; INPUT_COUNT],
    on_deactivate: [Vec<InputListener>; INPUT_COUNT],
    on_button: [Vec<ButtonListener>; BUTTON_COUNT],
    processed: u64,
}

impl RelayController {
    /// Build the relay bank and mapping table from configuration.
    ///
    /// A misconfigured table is fatal: the error is returned and the caller
    /// must not start the consumer task.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let relays = RelayBank::from_config(config)?;
        let mappings = MappingTable::from_config(config, &relays)?;
        Ok(Self {
            relays,
            mappings,
            timers: TimerManager::new(),
            on_activate: core::array::from_fn(|_| Vec::new()),
            on_deactivate: core::array::from_fn(|_| Vec::new()),
            on_button: core::array::from_fn(|_| Vec::new()),
            processed: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Release every relay so outputs match the bank, then announce.
    pub fn start(&mut self, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.relays.all_off(hw);
        let relays = self.relays.iter().count();
        let mappings = self.mappings.len();
        sink.emit(&BoardEvent::Started { relays, mappings });
        info!("RelayController started: {} relays, {} mappings", relays, mappings);
    }

    /// The consumer task.  Never completes; the host schedules it once.
    ///
    /// The only suspension point is waiting on the queue.  Timer expiry is
    /// checked after every message; the periodic `TimerTick` guarantees a
    /// wake-up even when no input is moving.
    pub async fn process_events<const N: usize>(
        &mut self,
        queue: &EventQueue<N>,
        clock: &impl Clock,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        info!("RelayController: consumer running (queue depth {})", queue.capacity());
        loop {
            let raw = queue.pop().await;
            self.handle_message(raw, clock.now_ms(), hw, sink);
        }
    }

    // ── Message handling ──────────────────────────────────────

    /// Decode and handle one queue byte, then fire due timers.
    ///
    /// Never fails: a malformed byte or a failing event is logged and the
    /// consumer moves on to the next message.
    pub fn handle_message(
        &mut self,
        raw: u8,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        self.processed += 1;
        match Message::decode(raw) {
            Ok(Message::Input(event)) => self.handle_event(event, now_ms, hw, sink),
            Ok(Message::Button(button)) => self.handle_button(button, sink),
            Ok(Message::TimerTick) => {}
            Err(e) => {
                warn!("RelayController: dropping message: {}", e);
                sink.emit(&BoardEvent::Malformed { raw });
            }
        }
        self.poll_timers(now_ms, hw, sink);
    }

    /// Run one input event through its mapping's behavior, then notify the
    /// input's listeners.
    pub fn handle_event(
        &mut self,
        event: Event,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        let cause = Cause::Input(event.input, event.direction);
        match self.apply(event, cause, now_ms, hw, sink) {
            Ok(notice) => self.notify(&notice),
            Err(e) => warn!(
                "RelayController: {:?} on input {} failed: {}",
                event.direction, event.input, e
            ),
        }
    }

    /// Fire every due countdown: relay off, mappings on that relay
    /// released.  Returns the number of timers that fired.
    pub fn poll_timers(
        &mut self,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut expired: heapless::Vec<(RelayId, InputId), RELAY_COUNT> = heapless::Vec::new();
        self.timers.fire_expired(now_ms, |relay, owner| {
            // At most one timer per relay, so this never overflows.
            let _ = expired.push((relay, owner));
        });
        for &(relay, owner) in &expired {
            debug!("RelayController: relay {} timer (armed by input {}) expired", relay, owner);
            self.expire(relay, hw, sink);
        }
        expired.len()
    }

    fn expire(&mut self, relay: RelayId, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        for mapping in self.mappings.for_relay_mut(relay) {
            mapping.active = false;
            mapping.timer = None;
        }
        match self.relays.set(relay, false, hw) {
            Ok(()) => sink.emit(&BoardEvent::RelaySwitched {
                relay,
                on: false,
                cause: Cause::TimerExpired,
            }),
            Err(e) => warn!("RelayController: auto-off of relay {} failed: {}", relay, e),
        }
    }

    fn handle_button(&mut self, button: ButtonId, sink: &mut impl EventSink) {
        sink.emit(&BoardEvent::ButtonPressed { button });
        for (i, listener) in self.on_button[button.index()].iter_mut().enumerate() {
            if let Err(e) = listener(button) {
                warn!("RelayController: button {} listener #{} failed: {}", button, i, e);
            }
        }
    }

    // ── Behavior application ──────────────────────────────────

    fn apply(
        &mut self,
        event: Event,
        cause: Cause,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> Result<InputNotice> {
        let Some(mapping) = self.mappings.get(event.input).copied() else {
            debug!("RelayController: input {} is unmapped", event.input);
            sink.emit(&BoardEvent::Unmapped { input: event.input });
            return Ok(InputNotice {
                input: event.input,
                direction: event.direction,
                relay: None,
                relay_on: false,
                active: false,
            });
        };

        let relay = mapping.relay;
        let was_on = self.relays.get(relay)?;
        let step = decide(
            mapping.behavior,
            event.direction,
            mapping.active,
            was_on,
            mapping.duration_ms,
        );

        match step.timer {
            TimerAction::Keep => {}
            TimerAction::Cancel => self.cancel_timer(relay, sink),
            TimerAction::Arm(duration_ms) => self.arm_timer(&mapping, duration_ms, now_ms, sink),
        }

        if let Some(on) = step.level {
            self.relays.set(relay, on, hw)?;
            if on != was_on {
                sink.emit(&BoardEvent::RelaySwitched { relay, on, cause });
            }
        }
        self.release_others(event.input, relay, step.timer, sink)?;

        let active = match (step.active, self.mappings.get_mut(event.input)) {
            (Some(active), Some(m)) => {
                m.active = active;
                active
            }
            (None, Some(m)) => m.active,
            (_, None) => false,
        };

        Ok(InputNotice {
            input: event.input,
            direction: event.direction,
            relay: Some(relay),
            relay_on: self.relays.get(relay)?,
            active,
        })
    }

    fn arm_timer(&mut self, mapping: &Mapping, duration_ms: u32, now_ms: u32, sink: &mut impl EventSink) {
        let handle = self.timers.arm(mapping.relay, duration_ms, now_ms, mapping.input);
        for m in self.mappings.for_relay_mut(mapping.relay) {
            m.timer = (m.input == mapping.input).then_some(handle);
        }
        sink.emit(&BoardEvent::TimerArmed {
            relay: mapping.relay,
            duration_ms,
        });
    }

    fn cancel_timer(&mut self, relay: RelayId, sink: &mut impl EventSink) {
        if self.timers.cancel(relay) {
            sink.emit(&BoardEvent::TimerCancelled { relay });
        }
        for m in self.mappings.for_relay_mut(relay) {
            m.timer = None;
        }
    }

    /// Drop the hold of every other mapping on `relay` that the transition
    /// just took away.  An off relay is held by nobody and carries no
    /// countdown; a cancelled or replaced countdown releases the timed
    /// mappings that were relying on it.
    fn release_others(
        &mut self,
        input: InputId,
        relay: RelayId,
        timer: TimerAction,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let relay_on = self.relays.get(relay)?;
        if !relay_on {
            self.cancel_timer(relay, sink);
        }
        let countdown_gone = !matches!(timer, TimerAction::Keep);
        for m in self.mappings.for_relay_mut(relay) {
            if m.input == input || !m.active {
                continue;
            }
            if !relay_on || (countdown_gone && m.behavior.is_timed()) {
                debug!("RelayController: input {} released relay {}", m.input, relay);
                m.active = false;
                m.timer = None;
            }
        }
        Ok(())
    }

    fn notify(&mut self, notice: &InputNotice) {
        let listeners = match notice.direction {
            Direction::Activate => &mut self.on_activate,
            Direction::Deactivate => &mut self.on_deactivate,
        };
        for (i, listener) in listeners[notice.input.index()].iter_mut().enumerate() {
            if let Err(e) = listener(notice) {
                warn!(
                    "RelayController: input {} listener #{} failed: {}",
                    notice.input, i, e
                );
            }
        }
    }

    // ── Collaborator operations ───────────────────────────────

    /// Trigger a relay from the control endpoint by activating the first
    /// input mapped to it.  Returns the input used.
    pub fn activate_relay(
        &mut self,
        relay_id: u8,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> Result<InputId> {
        let relay = RelayId::new(relay_id)?;
        if !self.relays.contains(relay) {
            return Err(Error::InvalidRelay(relay_id));
        }
        let input = self
            .mappings
            .inputs_for_relay(relay)
            .next()
            .ok_or(Error::NoInputForRelay(relay_id))?;
        let event = Event::activate(input);
        let notice = self.apply(event, Cause::Manual(input), now_ms, hw, sink)?;
        self.notify(&notice);
        info!("RelayController: relay {} triggered via input {}", relay, input);
        Ok(input)
    }

    pub fn rename_relay(&mut self, relay_id: u8, name: &str) -> Result<()> {
        self.relays.rename(RelayId::new(relay_id)?, name)
    }

    pub fn register_activation_listener(
        &mut self,
        input_id: u8,
        listener: impl FnMut(&InputNotice) -> Result<()> + 'static,
    ) -> Result<()> {
        let input = InputId::new(input_id)?;
        self.on_activate[input.index()].push(Box::new(listener));
        Ok(())
    }

    pub fn register_deactivation_listener(
        &mut self,
        input_id: u8,
        listener: impl FnMut(&InputNotice) -> Result<()> + 'static,
    ) -> Result<()> {
        let input = InputId::new(input_id)?;
        self.on_deactivate[input.index()].push(Box::new(listener));
        Ok(())
    }

    pub fn register_button_listener(
        &mut self,
        button_id: u8,
        listener: impl FnMut(ButtonId) -> Result<()> + 'static,
    ) -> Result<()> {
        let button = ButtonId::new(button_id)?;
        self.on_button[button.index()].push(Box::new(listener));
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Name, level and remaining countdown of every configured relay.
    pub fn relay_snapshot(&self, now_ms: u32) -> RelaySnapshot {
        let mut snapshot = RelaySnapshot::new();
        for relay in self.relays.iter() {
            let _ = snapshot.push(RelayStatus {
                id: relay.id,
                name: relay.name.clone(),
                on: relay.on,
                remaining_ms: self.timers.remaining(relay.id, now_ms),
            });
        }
        snapshot
    }

    /// Last commanded level of a relay.
    pub fn relay_level(&self, relay_id: u8) -> Result<bool> {
        self.relays.get(RelayId::new(relay_id)?)
    }

    /// Milliseconds left on a relay's countdown, 0 if none.
    pub fn remaining_ms(&self, relay_id: u8, now_ms: u32) -> Result<u32> {
        let relay = RelayId::new(relay_id)?;
        if !self.relays.contains(relay) {
            return Err(Error::InvalidRelay(relay_id));
        }
        Ok(self.timers.remaining(relay, now_ms))
    }

    pub fn mapping(&self, input_id: u8) -> Result<Option<&Mapping>> {
        Ok(self.mappings.get(InputId::new(input_id)?))
    }

    /// Number of countdowns currently running.
    pub fn live_timers(&self) -> usize {
        self.timers.live_count()
    }

    /// Messages handled since startup.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}
