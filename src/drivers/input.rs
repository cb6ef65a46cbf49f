//! Edge routing from GPIO interrupts into the message queue.
//!
//! ## Hardware
//!
//! Eight opto-isolated inputs and four front-panel buttons, all active-low
//! with pull-ups.  Every pin interrupts on both edges; the ISR reads the
//! level and hands it here together with the current uptime.
//!
//! Inputs forward both directions.  Buttons only forward presses: the
//! panel callbacks fire on press and have no use for releases.
//!
//! Nothing in this module logs or allocates.  It runs in interrupt context.

use crate::adapters::time::uptime_ms;
use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::debounce::DebounceFilter;
use crate::error::Result;
use crate::events::{Direction, Event, EventQueue, INPUT_QUEUE, Message};
use crate::ids::{BUTTON_COUNT, ButtonId, INPUT_COUNT, InputId};

/// Debounce state for the eight inputs.
pub static INPUT_DEBOUNCE: DebounceFilter<INPUT_COUNT> = DebounceFilter::new(DEFAULT_DEBOUNCE_MS);

/// Debounce state for the front-panel buttons.
pub static PANEL_DEBOUNCE: DebounceFilter<BUTTON_COUNT> = DebounceFilter::new(DEFAULT_DEBOUNCE_MS);

/// What happened to one raw edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Accepted and enqueued.
    Queued(Message),
    /// Suppressed by the debounce filter.
    Bounced,
    /// Button release; not forwarded.
    Ignored,
    /// Accepted but the queue was full.
    Dropped(Message),
}

fn enqueue<const Q: usize>(queue: &EventQueue<Q>, msg: Message) -> EdgeOutcome {
    if queue.push(msg) {
        EdgeOutcome::Queued(msg)
    } else {
        EdgeOutcome::Dropped(msg)
    }
}

/// Debounce an input edge and enqueue the resulting event.
pub fn route_edge<const N: usize, const Q: usize>(
    filter: &DebounceFilter<N>,
    queue: &EventQueue<Q>,
    input: InputId,
    level: bool,
    now_ms: u32,
) -> EdgeOutcome {
    match filter.accept(input.index(), level, now_ms) {
        Some(direction) => enqueue(queue, Message::Input(Event { direction, input })),
        None => EdgeOutcome::Bounced,
    }
}

/// Debounce a button edge and enqueue presses.
pub fn route_button<const N: usize, const Q: usize>(
    filter: &DebounceFilter<N>,
    queue: &EventQueue<Q>,
    button: ButtonId,
    level: bool,
    now_ms: u32,
) -> EdgeOutcome {
    match filter.accept(button.index(), level, now_ms) {
        Some(Direction::Activate) => enqueue(queue, Message::Button(button)),
        Some(Direction::Deactivate) => EdgeOutcome::Ignored,
        None => EdgeOutcome::Bounced,
    }
}

/// ISR entry for input `input_id` (1–8) at pin `level`.
pub fn handle_edge(input_id: u8, level: bool) -> Result<EdgeOutcome> {
    let input = InputId::new(input_id)?;
    Ok(route_edge(&INPUT_DEBOUNCE, &INPUT_QUEUE, input, level, uptime_ms()))
}

/// ISR entry for front-panel button `button_id` (1–4) at pin `level`.
pub fn handle_button(button_id: u8, level: bool) -> Result<EdgeOutcome> {
    let button = ButtonId::new(button_id)?;
    Ok(route_button(&PANEL_DEBOUNCE, &INPUT_QUEUE, button, level, uptime_ms()))
}

/// Apply the configured debounce interval to both filters.
pub fn set_debounce_interval(interval_ms: u32) {
    INPUT_DEBOUNCE.set_interval(interval_ms);
    PANEL_DEBOUNCE.set_interval(interval_ms);
}
