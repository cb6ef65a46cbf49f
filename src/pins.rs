//! GPIO assignments for the relay board (ESP32-S3 carrier).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Index `n` of each array is logical id `n + 1`.

use crate::ids::{BUTTON_COUNT, INPUT_COUNT, RELAY_COUNT};

// ---------------------------------------------------------------------------
// Opto-isolated inputs (active LOW, internal pull-up)
// ---------------------------------------------------------------------------

/// Inputs 1–8.  Low = contact closed = activate.
pub const INPUT_GPIOS: [i32; INPUT_COUNT] = [4, 5, 6, 7, 15, 16, 17, 18];

// ---------------------------------------------------------------------------
// Relay drivers (active HIGH through ULN2803)
// ---------------------------------------------------------------------------

/// Relays 1–8.
pub const RELAY_GPIOS: [i32; RELAY_COUNT] = [1, 2, 8, 9, 10, 11, 12, 13];

// ---------------------------------------------------------------------------
// Front-panel buttons (active LOW, internal pull-up)
// ---------------------------------------------------------------------------

/// Buttons 1–4, left to right.
pub const BUTTON_GPIOS: [i32; BUTTON_COUNT] = [38, 39, 40, 41];

/// Whether `names[i]` is `gpio{gpios[i]}` at every index.  Lets code that
/// names HAL pin fields check itself against these tables at compile time.
pub const fn gpios_match(gpios: &[i32], names: &[&str]) -> bool {
    if gpios.len() != names.len() {
        return false;
    }
    let mut i = 0;
    while i < gpios.len() {
        let name = names[i].as_bytes();
        if name.len() < 5 || name[0] != b'g' || name[1] != b'p' || name[2] != b'i' || name[3] != b'o' {
            return false;
        }
        let mut num = 0i32;
        let mut j = 4;
        while j < name.len() {
            if !name[j].is_ascii_digit() {
                return false;
            }
            num = num * 10 + (name[j] - b'0') as i32;
            j += 1;
        }
        if num != gpios[i] {
            return false;
        }
        i += 1;
    }
    true
}
