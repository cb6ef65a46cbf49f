//! Behavior state machine.
//!
//! Given a mapping's behavior kind, the incoming direction, the mapping's
//! `active` flag and the relay's current level, [`decide`] returns the
//! [`Transition`] to apply.  It touches nothing; the controller applies
//! the result to the relay bank, timer manager and mapping.
//!
//! | Behavior             | Activate                                   | Deactivate          |
//! |----------------------|--------------------------------------------|---------------------|
//! | `Toggle`             | flip level, cancel timer                   | —                   |
//! | `Timed` (idle)       | on, arm D, active                          | —                   |
//! | `Timed` (active)     | off, cancel timer, inactive (manual stop)  | —                   |
//! | `Timer_resets`       | on, re-arm full D, active                  | —                   |
//! | `On_while_activated` | on, active                                 | off, inactive       |
//!
//! `active` is the logical "this mapping is holding the output" flag.  It
//! is not the relay level: Toggle flips the level and never touches it.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::events::Direction;

/// How an input drives its relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    /// Each activation flips the relay.
    Toggle,
    /// Activation switches on for a fixed time; a second activation while
    /// running switches off early.
    Timed,
    /// Activation switches on and restarts the full countdown every time.
    TimerResets,
    /// Relay follows the input: on while activated, off on deactivation.
    OnWhileActivated,
}

impl Behavior {
    /// Configuration spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toggle => "Toggle",
            Self::Timed => "Timed",
            Self::TimerResets => "Timer_resets",
            Self::OnWhileActivated => "On_while_activated",
        }
    }

    /// Whether the behavior arms a countdown and needs a duration.
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::Timed | Self::TimerResets)
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised behavior name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownBehavior;

impl FromStr for Behavior {
    type Err = UnknownBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Toggle" => Ok(Self::Toggle),
            "Timed" => Ok(Self::Timed),
            "Timer_resets" => Ok(Self::TimerResets),
            // Older configuration files use the "pressed" spelling.
            "On_while_activated" | "On_while_pressed" => Ok(Self::OnWhileActivated),
            _ => Err(UnknownBehavior),
        }
    }
}

/// What to do with the relay's countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Leave whatever is running alone.
    Keep,
    /// Stop the countdown if one is running.
    Cancel,
    /// Start a fresh countdown of the given length, replacing any other.
    Arm(u32),
}

/// Outcome of one behavior step.  `None` fields mean "unchanged".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub level: Option<bool>,
    pub timer: TimerAction,
    pub active: Option<bool>,
}

impl Transition {
    /// Nothing changes.
    pub const IGNORE: Self = Self {
        level: None,
        timer: TimerAction::Keep,
        active: None,
    };

    pub fn is_noop(&self) -> bool {
        *self == Self::IGNORE
    }
}

/// Decide the next step for one mapping.
pub fn decide(
    behavior: Behavior,
    direction: Direction,
    active: bool,
    relay_on: bool,
    duration_ms: u32,
) -> Transition {
    match (direction, behavior) {
        (Direction::Activate, Behavior::Toggle) => Transition {
            level: Some(!relay_on),
            timer: TimerAction::Cancel,
            active: None,
        },
        (Direction::Activate, Behavior::Timed) if active => Transition {
            level: Some(false),
            timer: TimerAction::Cancel,
            active: Some(false),
        },
        (Direction::Activate, Behavior::Timed | Behavior::TimerResets) => Transition {
            level: Some(true),
            timer: TimerAction::Arm(duration_ms),
            active: Some(true),
        },
        (Direction::Activate, Behavior::OnWhileActivated) => Transition {
            level: Some(true),
            timer: TimerAction::Keep,
            active: Some(true),
        },
        (Direction::Deactivate, Behavior::OnWhileActivated) => Transition {
            level: Some(false),
            timer: TimerAction::Keep,
            active: Some(false),
        },
        (Direction::Deactivate, Behavior::Toggle | Behavior::Timed | Behavior::TimerResets) => {
            Transition::IGNORE
        }
    }
}
