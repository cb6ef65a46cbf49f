//! Interrupt-driven event system.
//!
//! Messages are produced by:
//! - GPIO ISRs on the eight inputs (debounced activate / deactivate)
//! - GPIO ISRs on the four front-panel buttons
//! - The periodic hardware timer (tick that drives auto-off expiry)
//! - Software (manual triggers injected by the status layer)
//!
//! Messages are consumed by a single cooperative task, one at a time,
//! in arrival order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ Input ISR   │────▶│              │     │                  │
//! │ Button ISR  │────▶│  EventQueue  │────▶│ process_events() │
//! │ Timer cb    │────▶│  (bounded)   │     │   (consumer)     │
//! │ Software    │────▶│              │     │                  │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//! ```
//!
//! Every message packs into one byte so the interrupt path never
//! allocates.  Overflow policy is drop-newest: an ISR cannot wait for
//! space, so the message that finds the queue full is discarded and
//! counted.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Deque;

use crate::error::{Error, Result};
use crate::ids::{ButtonId, InputId};

/// Default queue depth.
pub const EVENT_QUEUE_CAP: usize = 20;

const TAG_ACTIVATE: u8 = 0x10;
const TAG_DEACTIVATE: u8 = 0x20;
const TAG_BUTTON: u8 = 0x30;
const RAW_TIMER_TICK: u8 = 0xF0;

/// Logical direction of an input transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Contact closed (input pulled low).
    Activate,
    /// Contact opened (input back high).
    Deactivate,
}

/// A debounced logical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub direction: Direction,
    pub input: InputId,
}

impl Event {
    pub const fn activate(input: InputId) -> Self {
        Self {
            direction: Direction::Activate,
            input,
        }
    }

    pub const fn deactivate(input: InputId) -> Self {
        Self {
            direction: Direction::Deactivate,
            input,
        }
    }
}

/// Everything that can travel through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Input(Event),
    Button(ButtonId),
    TimerTick,
}

impl Message {
    /// Pack into the single-byte queue representation.
    pub const fn encode(self) -> u8 {
        match self {
            Self::Input(Event {
                direction: Direction::Activate,
                input,
            }) => TAG_ACTIVATE | input.get(),
            Self::Input(Event {
                direction: Direction::Deactivate,
                input,
            }) => TAG_DEACTIVATE | input.get(),
            Self::Button(button) => TAG_BUTTON | button.get(),
            Self::TimerTick => RAW_TIMER_TICK,
        }
    }

    /// Unpack a queue byte.  Anything that is not a well-formed message
    /// yields [`Error::MalformedEvent`].
    pub fn decode(raw: u8) -> Result<Self> {
        if raw == RAW_TIMER_TICK {
            return Ok(Self::TimerTick);
        }
        let id = raw & 0x0F;
        let malformed = |_| Error::MalformedEvent(raw);
        match raw & 0xF0 {
            TAG_ACTIVATE => Ok(Self::Input(Event::activate(
                InputId::new(id).map_err(malformed)?,
            ))),
            TAG_DEACTIVATE => Ok(Self::Input(Event::deactivate(
                InputId::new(id).map_err(malformed)?,
            ))),
            TAG_BUTTON => Ok(Self::Button(ButtonId::new(id).map_err(malformed)?)),
            _ => Err(Error::MalformedEvent(raw)),
        }
    }
}

// ── Bounded MPSC queue ────────────────────────────────────────
//
// Producers (ISRs, timer callback) push under a critical section;
// the single consumer task pops.  The buffer lives inside the queue
// so it can sit in a `static` that ISR callbacks reach directly.

/// Bounded multi-producer / single-consumer message queue.
pub struct EventQueue<const N: usize = EVENT_QUEUE_CAP> {
    buf: Mutex<CriticalSectionRawMutex, RefCell<Deque<u8, N>>>,
    ready: Signal<CriticalSectionRawMutex, ()>,
    dropped: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            buf: Mutex::new(RefCell::new(Deque::new())),
            ready: Signal::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue a message.  Safe to call from ISR context (never blocks).
    /// Returns `false` if the queue is full (message dropped).
    pub fn push(&self, msg: Message) -> bool {
        self.push_raw(msg.encode())
    }

    /// Enqueue an already packed byte.  Used by collaborators that relay
    /// messages from elsewhere; the consumer validates on the way out.
    pub fn push_raw(&self, raw: u8) -> bool {
        let accepted = self.buf.lock(|q| q.borrow_mut().push_back(raw).is_ok());
        if accepted {
            self.ready.signal(());
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        accepted
    }

    /// Pop the oldest message without waiting.
    pub fn try_pop(&self) -> Option<u8> {
        self.buf.lock(|q| q.borrow_mut().pop_front())
    }

    /// Wait until a message is available and return it.
    ///
    /// The wake-up signal is reset before the queue is re-checked, so a
    /// push that lands between the check and the wait still wakes us.
    pub async fn pop(&self) -> u8 {
        loop {
            self.ready.reset();
            if let Some(raw) = self.try_pop() {
                return raw;
            }
            self.ready.wait().await;
        }
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.buf.lock(|q| q.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The board's message queue, shared by every ISR and the consumer task.
pub static INPUT_QUEUE: EventQueue = EventQueue::new();
