//! Unified error types for the relay board firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! consumer loop's error handling uniform.  All variants are `Copy` so they
//! can be returned from interrupt-side helpers without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Startup configuration is inconsistent.  Fatal.
    Config(ConfigError),
    /// Relay id outside 1..=8 or not present in the configured set.
    InvalidRelay(u8),
    /// Input id outside 1..=8.
    InvalidInput(u8),
    /// Front-panel button id outside 1..=4.
    InvalidButton(u8),
    /// The event queue yielded a byte that does not decode to a message.
    MalformedEvent(u8),
    /// Manual activation requested for a relay that no input drives.
    NoInputForRelay(u8),
    /// A registered listener reported a failure.
    Listener(&'static str),
    /// The status snapshot could not be rendered.
    Status,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::InvalidRelay(id) => write!(f, "invalid relay id {id}"),
            Self::InvalidInput(id) => write!(f, "invalid input id {id}"),
            Self::InvalidButton(id) => write!(f, "invalid button id {id}"),
            Self::MalformedEvent(raw) => write!(f, "malformed event 0x{raw:02x}"),
            Self::NoInputForRelay(id) => write!(f, "no input mapped to relay {id}"),
            Self::Listener(msg) => write!(f, "listener: {msg}"),
            Self::Status => write!(f, "status rendering failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Reasons the mapping table cannot be built.  Each carries the offending
/// input or relay id so the boot log points at the bad table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Input row names a relay that is not in the relay table.
    UnknownRelayName { input: u8 },
    /// Input row names a behavior that does not exist.
    UnknownBehavior { input: u8 },
    /// Input id outside 1..=8.
    InvalidInputId(u8),
    /// Relay id outside 1..=8.
    InvalidRelayId(u8),
    /// The same input id appears twice.
    DuplicateInput(u8),
    /// The same relay id appears twice.
    DuplicateRelay(u8),
    /// Two relays share a name, so inputs could never reach the second.
    DuplicateRelayName(u8),
    /// The stored configuration document could not be decoded.
    Parse,
    /// The timer tick period must be non-zero.
    ZeroTick,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRelayName { input } => {
                write!(f, "input {input}: no relay found with that name")
            }
            Self::UnknownBehavior { input } => write!(f, "input {input}: unknown behavior"),
            Self::InvalidInputId(id) => write!(f, "input id {id} out of range"),
            Self::InvalidRelayId(id) => write!(f, "relay id {id} out of range"),
            Self::DuplicateInput(id) => write!(f, "input {id} configured twice"),
            Self::DuplicateRelay(id) => write!(f, "relay {id} configured twice"),
            Self::DuplicateRelayName(id) => write!(f, "relay {id} reuses another relay's name"),
            Self::Parse => write!(f, "configuration document is not valid"),
            Self::ZeroTick => write!(f, "tick period must be non-zero"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
