//! Relay bank: the addressable array of relay outputs.
//!
//! Holds each configured relay's name and last commanded level and pushes
//! level changes out through a [`RelayPort`].  No behavior logic lives
//! here.

use log::{info, warn};

use crate::app::ports::RelayPort;
use crate::config::{BoardConfig, RelayName, bounded};
use crate::error::{ConfigError, Error, Result};
use crate::ids::{RELAY_COUNT, RelayId};

/// One relay output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relay {
    pub id: RelayId,
    pub name: RelayName,
    pub on: bool,
}

pub struct RelayBank {
    relays: [Option<Relay>; RELAY_COUNT],
}

impl RelayBank {
    /// Build from the relay table.  All relays start released.
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        let mut relays: [Option<Relay>; RELAY_COUNT] = Default::default();
        for row in &config.relays {
            let id = RelayId::new(row.id).map_err(|_| ConfigError::InvalidRelayId(row.id))?;
            if relays.iter().flatten().any(|r| r.name == row.name) {
                return Err(ConfigError::DuplicateRelayName(row.id).into());
            }
            let slot = &mut relays[id.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateRelay(row.id).into());
            }
            *slot = Some(Relay {
                id,
                name: row.name.clone(),
                on: false,
            });
        }
        Ok(Self { relays })
    }

    fn slot(&self, relay: RelayId) -> Result<&Relay> {
        self.relays[relay.index()]
            .as_ref()
            .ok_or(Error::InvalidRelay(relay.get()))
    }

    fn slot_mut(&mut self, relay: RelayId) -> Result<&mut Relay> {
        self.relays[relay.index()]
            .as_mut()
            .ok_or(Error::InvalidRelay(relay.get()))
    }

    /// Drive `relay` to `on`.  The port is written even when the level is
    /// unchanged so a glitched output is corrected on the next command.
    pub fn set(&mut self, relay: RelayId, on: bool, port: &mut impl RelayPort) -> Result<()> {
        let slot = self.slot_mut(relay)?;
        slot.on = on;
        port.write(relay, on);
        Ok(())
    }

    /// Last commanded level of `relay`.
    pub fn get(&self, relay: RelayId) -> Result<bool> {
        self.slot(relay).map(|r| r.on)
    }

    pub fn name(&self, relay: RelayId) -> Result<&str> {
        self.slot(relay).map(|r| r.name.as_str())
    }

    /// Rename a relay.  Names longer than the slot are truncated.
    pub fn rename(&mut self, relay: RelayId, name: &str) -> Result<()> {
        let slot = self.slot_mut(relay)?;
        let bounded_name: RelayName = bounded(name);
        if bounded_name.len() < name.len() {
            warn!("Relays: relay {} name truncated to '{}'", relay, bounded_name);
        }
        info!("Relays: relay {} renamed '{}' -> '{}'", relay, slot.name, bounded_name);
        slot.name = bounded_name;
        Ok(())
    }

    /// Look up a relay by name (exact match).
    pub fn find_by_name(&self, name: &str) -> Option<RelayId> {
        self.iter().find(|r| r.name.as_str() == name).map(|r| r.id)
    }

    /// Whether `relay` is part of the configured set.
    pub fn contains(&self, relay: RelayId) -> bool {
        self.relays[relay.index()].is_some()
    }

    /// Configured relays in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Relay> {
        self.relays.iter().flatten()
    }

    /// Release every relay.
    pub fn all_off(&mut self, port: &mut impl RelayPort) {
        for relay in self.relays.iter_mut().flatten() {
            relay.on = false;
            port.write(relay.id, false);
        }
    }
}
