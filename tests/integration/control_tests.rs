//! Listener hooks, manual control, and status reporting.

use std::cell::RefCell;
use std::rc::Rc;

use relayboard::app::events::{BoardEvent, Cause};
use relayboard::config::BoardConfig;
use relayboard::{
    ButtonId, Direction, Error, Event, InputId, InputNotice, Message, RelayId, status_json,
};

use super::mock_hw::{board, board_with};

fn id(n: u8) -> InputId {
    InputId::new(n).unwrap()
}

// ── Listeners ─────────────────────────────────────────────────

#[test]
fn failing_listener_does_not_block_the_rest() {
    let (mut ctl, mut hw, mut sink) = board();
    let seen: Rc<RefCell<Vec<InputNotice>>> = Rc::default();

    ctl.register_activation_listener(3, |_| Err(Error::Listener("display offline")))
        .unwrap();
    let log = seen.clone();
    ctl.register_activation_listener(3, move |n| {
        log.borrow_mut().push(*n);
        Ok(())
    })
    .unwrap();

    ctl.handle_event(Event::activate(id(3)), 0, &mut hw, &mut sink);
    ctl.handle_event(Event::activate(id(3)), 1_000, &mut hw, &mut sink);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].relay, Some(RelayId::new(3).unwrap()));
    assert!(seen[0].relay_on, "listener runs after the transition");
    assert!(!seen[1].relay_on);
    assert!(!hw.is_on(3));
}

#[test]
fn deactivation_listener_sees_release() {
    let (mut ctl, mut hw, mut sink) = board();
    let hits = Rc::new(RefCell::new(Vec::new()));
    let log = hits.clone();
    ctl.register_deactivation_listener(8, move |n| {
        log.borrow_mut().push((n.direction, n.active));
        Ok(())
    })
    .unwrap();

    ctl.handle_event(Event::activate(id(8)), 0, &mut hw, &mut sink);
    assert!(hits.borrow().is_empty(), "activation goes to the other list");
    ctl.handle_event(Event::deactivate(id(8)), 300, &mut hw, &mut sink);
    assert_eq!(*hits.borrow(), vec![(Direction::Deactivate, false)]);
}

#[test]
fn listener_ids_are_validated() {
    let (mut ctl, _, _) = board();
    assert_eq!(
        ctl.register_activation_listener(0, |_| Ok(())),
        Err(Error::InvalidInput(0))
    );
    assert_eq!(
        ctl.register_deactivation_listener(9, |_| Ok(())),
        Err(Error::InvalidInput(9))
    );
    assert_eq!(
        ctl.register_button_listener(5, |_| Ok(())),
        Err(Error::InvalidButton(5))
    );
}

#[test]
fn unmapped_input_is_reported_and_listeners_still_run() {
    let mut config = BoardConfig::default();
    config.inputs.truncate(4);
    let (mut ctl, mut hw, mut sink) = board_with(&config);
    let hits = Rc::new(RefCell::new(0u32));
    let count = hits.clone();
    ctl.register_activation_listener(6, move |n| {
        assert_eq!(n.relay, None);
        *count.borrow_mut() += 1;
        Ok(())
    })
    .unwrap();

    let writes_before = hw.writes.len();
    ctl.handle_event(Event::activate(id(6)), 0, &mut hw, &mut sink);
    assert_eq!(hw.writes.len(), writes_before, "no relay touched");
    assert_eq!(sink.events, vec![BoardEvent::Unmapped { input: id(6) }]);
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn button_messages_reach_button_listeners() {
    let (mut ctl, mut hw, mut sink) = board();
    let pressed = Rc::new(RefCell::new(Vec::new()));
    let log = pressed.clone();
    ctl.register_button_listener(2, move |b| {
        log.borrow_mut().push(b);
        Ok(())
    })
    .unwrap();
    ctl.register_button_listener(2, |_| Err(Error::Listener("menu busy")))
        .unwrap();

    let b2 = ButtonId::new(2).unwrap();
    ctl.handle_message(Message::Button(b2).encode(), 0, &mut hw, &mut sink);
    ctl.handle_message(Message::Button(ButtonId::new(1).unwrap()).encode(), 10, &mut hw, &mut sink);

    assert_eq!(*pressed.borrow(), vec![b2]);
    assert_eq!(sink.count(|e| matches!(e, BoardEvent::ButtonPressed { .. })), 2);
}

// ── Manual control ────────────────────────────────────────────

#[test]
fn activate_relay_runs_the_mapped_behavior() {
    let (mut ctl, mut hw, mut sink) = board();

    assert_eq!(ctl.activate_relay(1, 0, &mut hw, &mut sink), Ok(id(1)));
    assert!(hw.is_on(1));
    assert_eq!(ctl.remaining_ms(1, 0), Ok(12_000));
    assert!(sink.events.contains(&BoardEvent::RelaySwitched {
        relay: RelayId::new(1).unwrap(),
        on: true,
        cause: Cause::Manual(id(1)),
    }));

    // Timed: a second trigger is a manual stop.
    ctl.activate_relay(1, 3_000, &mut hw, &mut sink).unwrap();
    assert!(!hw.is_on(1));
}

#[test]
fn activate_relay_errors() {
    let mut config = BoardConfig::default();
    config.inputs.retain(|row| row.relay.as_str() != "Cellar");
    let (mut ctl, mut hw, mut sink) = board_with(&config);

    assert_eq!(
        ctl.activate_relay(6, 0, &mut hw, &mut sink),
        Err(Error::NoInputForRelay(6))
    );
    assert_eq!(
        ctl.activate_relay(0, 0, &mut hw, &mut sink),
        Err(Error::InvalidRelay(0))
    );
    assert!(!hw.is_on(6));
}

#[test]
fn rename_shows_up_in_status() {
    let (mut ctl, _, _) = board();
    ctl.rename_relay(5, "Loft").unwrap();
    assert_eq!(ctl.rename_relay(12, "Nowhere"), Err(Error::InvalidRelay(12)));

    let snapshot = ctl.relay_snapshot(0);
    assert_eq!(snapshot[4].name.as_str(), "Loft");
}

// ── Status ────────────────────────────────────────────────────

#[test]
fn status_json_reports_levels_and_countdowns() {
    let (mut ctl, mut hw, mut sink) = board();
    ctl.handle_event(Event::activate(id(1)), 0, &mut hw, &mut sink);
    ctl.handle_event(Event::activate(id(3)), 0, &mut hw, &mut sink);

    let snapshot = ctl.relay_snapshot(500);
    assert_eq!(snapshot.len(), 8);

    let json = status_json(&snapshot).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["relay1"]["state"], 1);
    assert_eq!(value["relay1"]["name"], "Hall");
    assert_eq!(value["relay1"]["delay"], 11_500);
    assert_eq!(value["relay3"]["state"], 1);
    assert_eq!(value["relay3"]["delay"], 0);
    assert_eq!(value["relay8"]["name"], "Toilet");
    assert_eq!(value["relay8"]["state"], 0);
}

#[test]
fn processed_counter_tracks_messages() {
    let (mut ctl, mut hw, mut sink) = board();
    ctl.handle_message(Message::TimerTick.encode(), 0, &mut hw, &mut sink);
    ctl.handle_message(0x00, 0, &mut hw, &mut sink);
    assert_eq!(ctl.processed(), 2);
}
