//! Relay output driver.
//!
//! Eight GPIOs drive the relay coils through a Darlington array
//! (active HIGH).  Generic over [`embedded_hal::digital::OutputPin`], so
//! the device build hands in esp-idf-hal `PinDriver`s and host tests hand
//! in plain mocks.
//!
//! A failed pin write cannot be reported back through [`RelayPort`]; it
//! is logged and the bank keeps the commanded level.

use embedded_hal::digital::OutputPin;
use log::error;

use crate::app::ports::RelayPort;
use crate::ids::{RELAY_COUNT, RelayId};

/// Relay outputs, index `n` driving relay `n + 1`.
pub struct OutputPinRelays<P: OutputPin> {
    pins: [P; RELAY_COUNT],
}

impl<P: OutputPin> OutputPinRelays<P> {
    pub fn new(pins: [P; RELAY_COUNT]) -> Self {
        Self { pins }
    }

    pub fn into_inner(self) -> [P; RELAY_COUNT] {
        self.pins
    }
}

impl<P: OutputPin> RelayPort for OutputPinRelays<P> {
    fn write(&mut self, relay: RelayId, on: bool) {
        let pin = &mut self.pins[relay.index()];
        let result = if on { pin.set_high() } else { pin.set_low() };
        if let Err(e) = result {
            error!("relay: K{} write failed: {:?}", relay, e);
        }
    }
}
