//! Relay Board Firmware — Main Entry Point
//!
//! Hexagonal architecture with interrupt-driven input and a single
//! cooperative consumer task.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  OutputPinRelays   LogEventSink   StaticConfig   MonotonicClock│
//! │  (RelayPort)       (EventSink)    (ConfigSource) (Clock)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            RelayController (pure logic)                │    │
//! │  │  Mapping · Behavior · Timers · Relay bank              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                          ▲                                     │
//! │   GPIO ISRs ─ debounce ─ EventQueue ◀─ 100 ms tick timer       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::gpio::{OutputPin as _, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use log::info;

use relayboard::adapters::config::StaticConfig;
use relayboard::adapters::log_sink::LogEventSink;
use relayboard::adapters::time::MonotonicClock;
use relayboard::app::ports::ConfigSource;
use relayboard::drivers::relay::OutputPinRelays;
use relayboard::drivers::{hw_init, hw_timer, input};
use relayboard::{INPUT_QUEUE, RelayController, pins};

/// One output driver per relay, in relay order.  Fails to compile if the
/// listed pins drift from `pins::RELAY_GPIOS`.
macro_rules! relay_drivers {
    ($p:ident; $($gpio:ident),+ $(,)?) => {{
        const _: () = assert!(pins::gpios_match(&pins::RELAY_GPIOS, &[$(stringify!($gpio)),+]));
        [$(PinDriver::output($p.pins.$gpio.downgrade_output())?),+]
    }};
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RelayBoard v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    // A bad table is fatal: the consumer must not run on a half-resolved
    // mapping.
    let config = StaticConfig::builtin().load()?;
    let mut controller = RelayController::new(&config)?;
    input::set_debounce_interval(config.debounce_ms);

    // ── 3. Relay outputs ──────────────────────────────────────
    let p = Peripherals::take()?;
    let mut relays = OutputPinRelays::new(relay_drivers!(p;
        gpio1, gpio2, gpio8, gpio9, gpio10, gpio11, gpio12, gpio13,
    ));
    let mut sink = LogEventSink::new();
    controller.start(&mut relays, &mut sink);

    // ── 4. Front-panel buttons ────────────────────────────────
    for button in 1..=4u8 {
        controller.register_button_listener(button, move |b| {
            info!("Panel: button {} pressed", b);
            Ok(())
        })?;
    }

    // ── 5. Interrupts and tick ────────────────────────────────
    hw_init::init_peripherals()?;
    hw_init::init_isr_service()?;
    hw_timer::start_tick_timer(config.tick_ms)?;

    // ── 6. Consumer task ──────────────────────────────────────
    let clock = MonotonicClock::new();
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    info!("System ready. Entering event loop.");
    futures_lite::future::block_on(executor.run(controller.process_events(
        &INPUT_QUEUE,
        &clock,
        &mut relays,
        &mut sink,
    )));

    hw_timer::stop_tick_timer();
    Ok(())
}
