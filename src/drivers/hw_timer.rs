//! Periodic tick timer using ESP-IDF's esp_timer API.
//!
//! Pushes `Message::TimerTick` into the board queue at the configured
//! period (100 ms by default).  Each tick wakes the consumer, which then
//! fires any relay countdowns that have run out.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR); the
//! queue push is a short critical section either way.

use crate::events::{INPUT_QUEUE, Message};

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// callback fires.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t {
    unsafe { TICK_TIMER }
}

/// Callback body, shared with the host build.  A full queue simply loses
/// this tick; the next one arrives a period later.
pub fn on_tick() -> bool {
    INPUT_QUEUE.push(Message::TimerTick)
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    on_tick();
}

/// Start the periodic tick.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(period_ms: u32) -> Result<(), HwInitError> {
    // SAFETY: TICK_TIMER is written here once at boot from the main task
    // before the callback can fire.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"relay_tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            return Err(HwInitError::TimerFailed(ret));
        }
        let ret = esp_timer_start_periodic(tick_timer(), u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            return Err(HwInitError::TimerFailed(ret));
        }
    }
    info!("hw_timer: tick every {}ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(period_ms: u32) -> Result<(), HwInitError> {
    log::info!("hw_timer(sim): {}ms tick not started (tests call on_tick)", period_ms);
    Ok(())
}

/// Stop the tick timer.
#[cfg(target_os = "espidf")]
pub fn stop_tick_timer() {
    // SAFETY: tick_timer() contract; null-check guards a failed start.
    unsafe {
        let t = tick_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_tick_timer() {}
