//! Input → relay mapping table.
//!
//! Built once at startup from the relay and input tables.  A row that
//! names an unknown relay or behavior aborts startup: a miswired board
//! must not come up half-working.  After startup only the `active` flag
//! and timer handle of each mapping change.

use log::{error, info, warn};

use super::behavior::Behavior;
use crate::config::BoardConfig;
use crate::error::{ConfigError, Result};
use crate::ids::{INPUT_COUNT, InputId, RelayId};
use crate::relays::RelayBank;
use crate::timers::TimerHandle;

/// One input's binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub input: InputId,
    pub relay: RelayId,
    pub behavior: Behavior,
    /// Countdown length for timed behaviors (ms).
    pub duration_ms: u32,
    /// The behavior is currently holding the relay engaged.
    pub active: bool,
    /// Countdown armed by this mapping, if still running.
    pub timer: Option<TimerHandle>,
}

pub struct MappingTable {
    slots: [Option<Mapping>; INPUT_COUNT],
}

impl MappingTable {
    /// Resolve every input row against the relay bank.
    pub fn from_config(config: &BoardConfig, relays: &RelayBank) -> Result<Self> {
        let mut slots = [None; INPUT_COUNT];
        for row in &config.inputs {
            let input =
                InputId::new(row.input).map_err(|_| ConfigError::InvalidInputId(row.input))?;
            if slots[input.index()].is_some() {
                return Err(ConfigError::DuplicateInput(row.input).into());
            }
            let Some(relay) = relays.find_by_name(&row.relay) else {
                error!("Mapping: input {} names unknown relay '{}'", input, row.relay);
                return Err(ConfigError::UnknownRelayName { input: row.input }.into());
            };
            let Ok(behavior) = row.behavior.parse::<Behavior>() else {
                error!("Mapping: input {} has unknown behavior '{}'", input, row.behavior);
                return Err(ConfigError::UnknownBehavior { input: row.input }.into());
            };
            if behavior.is_timed() && row.duration_ms == 0 {
                warn!("Mapping: input {} is {} with zero duration", input, behavior);
            }
            info!(
                "Mapping: input {} -> relay {} ({}) {} {}ms",
                input, relay, row.relay, behavior, row.duration_ms
            );
            slots[input.index()] = Some(Mapping {
                input,
                relay,
                behavior,
                duration_ms: row.duration_ms,
                active: false,
                timer: None,
            });
        }
        Ok(Self { slots })
    }

    pub fn get(&self, input: InputId) -> Option<&Mapping> {
        self.slots[input.index()].as_ref()
    }

    pub fn get_mut(&mut self, input: InputId) -> Option<&mut Mapping> {
        self.slots[input.index()].as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.slots.iter().flatten()
    }

    /// Mappings that drive `relay`, in input order.
    pub fn for_relay_mut(&mut self, relay: RelayId) -> impl Iterator<Item = &mut Mapping> {
        self.slots
            .iter_mut()
            .flatten()
            .filter(move |m| m.relay == relay)
    }

    /// Inputs that drive `relay`, in input order.
    pub fn inputs_for_relay(&self, relay: RelayId) -> impl Iterator<Item = InputId> + '_ {
        self.iter().filter(move |m| m.relay == relay).map(|m| m.input)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
