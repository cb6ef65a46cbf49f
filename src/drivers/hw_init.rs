//! One-shot GPIO and interrupt initialization.
//!
//! Configures the input and button pins and registers the shared edge
//! ISRs using raw ESP-IDF sys calls.  Called once from `main()` before the
//! consumer task starts.  Relay outputs are owned by `PinDriver`s in
//! `main()` and are not touched here.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed { gpio: i32, rc: i32 },
    TimerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed { gpio, rc } => {
                write!(f, "ISR handler for GPIO {} failed (rc={})", gpio, rc)
            }
            Self::TimerFailed(rc) => write!(f, "tick timer failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── GPIO Inputs ───────────────────────────────────────────────

/// Configure every input and button pin as pulled-up, any-edge input.
#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    let mask = pins::INPUT_GPIOS
        .iter()
        .chain(pins::BUTTON_GPIOS.iter())
        .fold(0u64, |m, &pin| m | (1u64 << pin));
    let cfg = gpio_config_t {
        pin_bit_mask: mask,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    // SAFETY: Called once from main() before any ISR is registered.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!(
        "hw_init: {} inputs + {} buttons configured",
        pins::INPUT_GPIOS.len(),
        pins::BUTTON_GPIOS.len()
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a register read on a configured input;
    // safe from both task and ISR context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::input::{handle_button, handle_edge};

/// Shared ISR for the inputs.  `arg` carries the 0-based slot.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn input_gpio_isr(arg: *mut core::ffi::c_void) {
    let slot = arg as usize;
    let Some(&gpio) = pins::INPUT_GPIOS.get(slot) else { return };
    // Ids derive from the pin table, so the only failure is a full queue,
    // already counted by the queue itself.
    let _ = handle_edge(slot as u8 + 1, gpio_read(gpio));
}

/// Shared ISR for the front-panel buttons.  `arg` carries the 0-based slot.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    let slot = arg as usize;
    let Some(&gpio) = pins::BUTTON_GPIOS.get(slot) else { return };
    let _ = handle_button(slot as u8 + 1, gpio_read(gpio));
}

#[cfg(target_os = "espidf")]
unsafe fn add_handler(
    gpio: i32,
    isr: unsafe extern "C" fn(*mut core::ffi::c_void),
    slot: usize,
) -> Result<(), HwInitError> {
    // SAFETY: the handler only touches the debounce atomics and the
    // critical-section guarded queue; `slot` is passed by value.
    let ret = unsafe { gpio_isr_handler_add(gpio, Some(isr), slot as *mut core::ffi::c_void) };
    if ret != ESP_OK {
        return Err(HwInitError::IsrHandlerFailed { gpio, rc: ret });
    }
    unsafe { gpio_intr_enable(gpio) };
    Ok(())
}

/// Install the per-pin GPIO ISR service and register every edge handler.
/// Call after init_peripherals() and before the consumer task.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        for (slot, &gpio) in pins::INPUT_GPIOS.iter().enumerate() {
            add_handler(gpio, input_gpio_isr, slot)?;
        }
        for (slot, &gpio) in pins::BUTTON_GPIOS.iter().enumerate() {
            add_handler(gpio, button_gpio_isr, slot)?;
        }
    }
    info!("hw_init: ISR service installed (inputs×8, buttons×4)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
