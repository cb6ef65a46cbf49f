//! Read-only relay status for the HTTP status endpoint and the display.
//!
//! The JSON document keeps the shape the board's web page already polls:
//!
//! ```text
//! {"relay1": {"state": 1, "name": "Hall", "delay": 11500}, ...}
//! ```
//!
//! `delay` is the milliseconds left on the relay's countdown, 0 when none.

use core::fmt::Write as _;

use heapless::Vec;
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};

use crate::config::RelayName;
use crate::error::{Error, Result};
use crate::ids::{RELAY_COUNT, RelayId};

/// One relay's state at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayStatus {
    pub id: RelayId,
    pub name: RelayName,
    pub on: bool,
    pub remaining_ms: u32,
}

/// Snapshot of every configured relay, in id order.
pub type RelaySnapshot = Vec<RelayStatus, RELAY_COUNT>;

#[derive(Serialize)]
struct StatusEntry<'a> {
    state: u8,
    name: &'a str,
    delay: u32,
}

/// Serialises a snapshot as the keyed `relayN` document.
pub struct StatusDocument<'a>(pub &'a [RelayStatus]);

impl Serialize for StatusDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for relay in self.0 {
            let mut key: heapless::String<8> = heapless::String::new();
            write!(key, "relay{}", relay.id).map_err(|_| S::Error::custom("relay key overflow"))?;
            map.serialize_entry(
                key.as_str(),
                &StatusEntry {
                    state: u8::from(relay.on),
                    name: relay.name.as_str(),
                    delay: relay.remaining_ms,
                },
            )?;
        }
        map.end()
    }
}

/// Render a snapshot as the status endpoint's JSON body.
pub fn status_json(snapshot: &[RelayStatus]) -> Result<String> {
    serde_json::to_string(&StatusDocument(snapshot)).map_err(|e| {
        log::warn!("Status: JSON rendering failed: {}", e);
        Error::Status
    })
}
