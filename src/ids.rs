//! Validated identifiers for inputs, relays, and front-panel buttons.
//!
//! Ids are 1-based on the wire and in configuration (the board silkscreen
//! reads IN1..IN8 / K1..K8) and 0-based when used as array indices.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of opto-isolated digital inputs on the board.
pub const INPUT_COUNT: usize = 8;
/// Number of relay outputs on the board.
pub const RELAY_COUNT: usize = 8;
/// Number of front-panel push buttons.
pub const BUTTON_COUNT: usize = 4;

macro_rules! board_id {
    ($(#[$meta:meta])* $name:ident, $count:expr, $err:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            /// Validate a 1-based id.
            pub const fn new(id: u8) -> Result<Self> {
                if id >= 1 && id as usize <= $count {
                    Ok(Self(id))
                } else {
                    Err($err(id))
                }
            }

            /// Build from a 0-based array index.
            pub const fn from_index(idx: usize) -> Result<Self> {
                if idx < $count {
                    Ok(Self(idx as u8 + 1))
                } else {
                    Err($err(u8::MAX))
                }
            }

            /// The 1-based id.
            pub const fn get(self) -> u8 {
                self.0
            }

            /// The 0-based array index.
            pub const fn index(self) -> usize {
                self.0 as usize - 1
            }

            /// Every valid id in ascending order.
            pub fn all() -> impl Iterator<Item = Self> {
                (1..=$count as u8).map(Self)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(id: u8) -> Result<Self> {
                Self::new(id)
            }
        }

        impl From<$name> for u8 {
            fn from(id: $name) -> u8 {
                id.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

board_id!(
    /// A digital input, 1..=8.
    InputId,
    INPUT_COUNT,
    Error::InvalidInput
);

board_id!(
    /// A relay output, 1..=8.
    RelayId,
    RELAY_COUNT,
    Error::InvalidRelay
);

board_id!(
    /// A front-panel button, 1..=4.
    ButtonId,
    BUTTON_COUNT,
    Error::InvalidButton
);
