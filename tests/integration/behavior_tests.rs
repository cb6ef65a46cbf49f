//! Behavior scenarios on the shipped table, driven through the controller.
//!
//! Table under test:
//! IN1 Hall 12000 Timed · IN3 Kitchen Toggle · IN7 Patio 3600 Timer_resets ·
//! IN8 Toilet On_while_activated.

use relayboard::app::events::{BoardEvent, Cause};
use relayboard::config::{BoardConfig, InputConfig};
use relayboard::{Event, InputId, RelayController, RelayId};

use super::mock_hw::{MockRelays, RecordingSink, board, board_with};

fn id(n: u8) -> InputId {
    InputId::new(n).unwrap()
}

fn press(ctl: &mut RelayController, hw: &mut MockRelays, sink: &mut RecordingSink, input: u8, now: u32) {
    ctl.handle_event(Event::activate(id(input)), now, hw, sink);
    ctl.poll_timers(now, hw, sink);
}

fn release(ctl: &mut RelayController, hw: &mut MockRelays, sink: &mut RecordingSink, input: u8, now: u32) {
    ctl.handle_event(Event::deactivate(id(input)), now, hw, sink);
    ctl.poll_timers(now, hw, sink);
}

fn active(ctl: &RelayController, input: u8) -> bool {
    ctl.mapping(input).unwrap().unwrap().active
}

// ── Toggle ────────────────────────────────────────────────────

#[test]
fn toggle_flips_on_every_activation() {
    let (mut ctl, mut hw, mut sink) = board();
    for n in 1..=7u32 {
        press(&mut ctl, &mut hw, &mut sink, 3, n * 1_000);
        assert_eq!(hw.is_on(3), n % 2 == 1, "after {} presses", n);
        assert!(!active(&ctl, 3), "toggle never claims the output");
    }
    assert_eq!(ctl.live_timers(), 0);
}

#[test]
fn toggle_ignores_release() {
    let (mut ctl, mut hw, mut sink) = board();
    press(&mut ctl, &mut hw, &mut sink, 3, 0);
    release(&mut ctl, &mut hw, &mut sink, 3, 400);
    assert!(hw.is_on(3));
}

// ── Timed ─────────────────────────────────────────────────────

#[test]
fn hall_timed_switches_off_after_duration() {
    let (mut ctl, mut hw, mut sink) = board();

    press(&mut ctl, &mut hw, &mut sink, 1, 0);
    assert!(hw.is_on(1));
    assert!(active(&ctl, 1));
    assert_eq!(ctl.remaining_ms(1, 500), Ok(11_500));

    ctl.poll_timers(11_999, &mut hw, &mut sink);
    assert!(hw.is_on(1), "one millisecond early");

    ctl.poll_timers(12_000, &mut hw, &mut sink);
    assert!(!hw.is_on(1));
    assert!(!active(&ctl, 1));
    assert_eq!(ctl.live_timers(), 0);
    assert!(sink.events.contains(&BoardEvent::RelaySwitched {
        relay: RelayId::new(1).unwrap(),
        on: false,
        cause: Cause::TimerExpired,
    }));
}

#[test]
fn hall_second_press_cancels_early() {
    let (mut ctl, mut hw, mut sink) = board();

    press(&mut ctl, &mut hw, &mut sink, 1, 0);
    press(&mut ctl, &mut hw, &mut sink, 1, 5_000);
    assert!(!hw.is_on(1));
    assert!(!active(&ctl, 1));
    assert_eq!(ctl.live_timers(), 0);

    sink.clear();
    ctl.poll_timers(12_000, &mut hw, &mut sink);
    assert!(sink.events.is_empty(), "cancelled timer must not fire");
}

#[test]
fn timed_third_press_starts_a_new_countdown() {
    let (mut ctl, mut hw, mut sink) = board();
    press(&mut ctl, &mut hw, &mut sink, 1, 0);
    press(&mut ctl, &mut hw, &mut sink, 1, 1_000);
    press(&mut ctl, &mut hw, &mut sink, 1, 2_000);
    assert!(hw.is_on(1));
    assert_eq!(ctl.remaining_ms(1, 2_000), Ok(12_000));
    ctl.poll_timers(14_000, &mut hw, &mut sink);
    assert!(!hw.is_on(1));
}

#[test]
fn timed_ignores_release() {
    let (mut ctl, mut hw, mut sink) = board();
    press(&mut ctl, &mut hw, &mut sink, 1, 0);
    release(&mut ctl, &mut hw, &mut sink, 1, 500);
    assert!(hw.is_on(1));
    assert_eq!(ctl.live_timers(), 1);
}

// ── Timer_resets ──────────────────────────────────────────────

#[test]
fn patio_reactivation_moves_the_deadline() {
    let (mut ctl, mut hw, mut sink) = board();

    press(&mut ctl, &mut hw, &mut sink, 7, 0);
    press(&mut ctl, &mut hw, &mut sink, 7, 2_000);
    assert_eq!(ctl.live_timers(), 1, "re-arm replaces, never stacks");

    ctl.poll_timers(3_600, &mut hw, &mut sink);
    assert!(hw.is_on(7), "original deadline no longer applies");

    ctl.poll_timers(5_599, &mut hw, &mut sink);
    assert!(hw.is_on(7));

    ctl.poll_timers(5_600, &mut hw, &mut sink);
    assert!(!hw.is_on(7));
    assert!(!active(&ctl, 7));
}

// ── On_while_activated ────────────────────────────────────────

#[test]
fn toilet_follows_the_input() {
    let (mut ctl, mut hw, mut sink) = board();
    for cycle in 0..3u32 {
        let t = cycle * 1_000;
        press(&mut ctl, &mut hw, &mut sink, 8, t);
        assert!(hw.is_on(8));
        assert!(active(&ctl, 8));
        release(&mut ctl, &mut hw, &mut sink, 8, t + 500);
        assert!(!hw.is_on(8));
        assert!(!active(&ctl, 8));
    }
    assert_eq!(ctl.live_timers(), 0);
}

// ── Shared relays ─────────────────────────────────────────────

#[test]
fn expiry_releases_every_mapping_on_the_relay() {
    let mut config = BoardConfig::default();
    config.inputs[1] = InputConfig::new(2, "Hall", 4_000, "Timer_resets");
    let (mut ctl, mut hw, mut sink) = board_with(&config);

    press(&mut ctl, &mut hw, &mut sink, 1, 0);
    press(&mut ctl, &mut hw, &mut sink, 2, 1_000);
    assert!(!active(&ctl, 1), "its countdown was replaced");
    assert!(active(&ctl, 2));
    assert_eq!(ctl.live_timers(), 1, "one countdown per relay");
    assert!(ctl.mapping(1).unwrap().unwrap().timer.is_none());
    assert!(ctl.mapping(2).unwrap().unwrap().timer.is_some());

    ctl.poll_timers(5_000, &mut hw, &mut sink);
    assert!(!hw.is_on(1));
    assert!(!active(&ctl, 1));
    assert!(!active(&ctl, 2));
}

#[test]
fn toggle_cancels_a_countdown_on_the_same_relay() {
    let mut config = BoardConfig::default();
    config.inputs[2] = InputConfig::new(3, "Patio", 0, "Toggle");
    let (mut ctl, mut hw, mut sink) = board_with(&config);

    press(&mut ctl, &mut hw, &mut sink, 7, 0);
    press(&mut ctl, &mut hw, &mut sink, 3, 1_000);
    assert!(!hw.is_on(7));
    assert_eq!(ctl.live_timers(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, BoardEvent::TimerCancelled { .. })),
        1
    );
}

#[test]
fn toggle_off_releases_a_timed_mapping_on_the_same_relay() {
    let mut config = BoardConfig::default();
    config.inputs[2] = InputConfig::new(3, "Hall", 0, "Toggle");
    let (mut ctl, mut hw, mut sink) = board_with(&config);

    press(&mut ctl, &mut hw, &mut sink, 1, 0);
    press(&mut ctl, &mut hw, &mut sink, 3, 1_000);
    assert!(!hw.is_on(1));
    assert!(!active(&ctl, 1));
    assert_eq!(ctl.live_timers(), 0);

    // The next Hall press starts a countdown instead of stopping one.
    press(&mut ctl, &mut hw, &mut sink, 1, 2_000);
    assert!(hw.is_on(1));
    assert!(active(&ctl, 1));
    assert_eq!(ctl.remaining_ms(1, 2_000), Ok(12_000));
}

#[test]
fn timed_stop_releases_a_timer_resets_mapping_on_the_same_relay() {
    let mut config = BoardConfig::default();
    config.inputs[1] = InputConfig::new(2, "Hall", 4_000, "Timer_resets");
    let (mut ctl, mut hw, mut sink) = board_with(&config);

    press(&mut ctl, &mut hw, &mut sink, 2, 0);
    press(&mut ctl, &mut hw, &mut sink, 1, 500);
    press(&mut ctl, &mut hw, &mut sink, 1, 1_000);
    assert!(!hw.is_on(1));
    assert!(!active(&ctl, 1));
    assert!(!active(&ctl, 2));
    assert_eq!(ctl.live_timers(), 0);
}

#[test]
fn follower_release_cancels_a_shared_countdown() {
    let mut config = BoardConfig::default();
    config.inputs[7] = InputConfig::new(8, "Patio", 0, "On_while_activated");
    let (mut ctl, mut hw, mut sink) = board_with(&config);

    press(&mut ctl, &mut hw, &mut sink, 7, 0);
    press(&mut ctl, &mut hw, &mut sink, 8, 100);
    release(&mut ctl, &mut hw, &mut sink, 8, 200);
    assert!(!hw.is_on(7));
    assert!(!active(&ctl, 7));
    assert!(!active(&ctl, 8));
    assert_eq!(ctl.live_timers(), 0, "no countdown on an off relay");
}
