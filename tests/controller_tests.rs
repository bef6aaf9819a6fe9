//! End-to-end tests of the control loop against the mock HAL.

use rs_knob::command::{Command, REBOOT_GRACE_MS};
use rs_knob::config::{ActionObject, Configuration, GestureSlot};
use rs_knob::controller::{KnobController, KnobIo, LOOP_PERIOD_MS};
use rs_knob::hal::{HidEvent, MockChannel, MockClock, MockDelay, MockEncoder, MockHid, MockReset};
use rs_knob::keycodes::{ConsumerCode, Keycode};
use rs_knob::traits::{Clock, MouseButton};
use rs_knob::{ButtonState, DispatchOutcome};

type TestKnob = KnobController<MockEncoder, MockHid, MockChannel, MockReset, MockDelay>;

fn knob(config: Configuration) -> TestKnob {
    let io = KnobIo {
        encoder: MockEncoder::new(),
        hid: MockHid::new(),
        channel: MockChannel::new(),
        reset: MockReset::new(),
        delay: MockDelay::new(),
    };
    KnobController::new(io, config)
}

/// Poll once per loop period until `until_ms`, collecting gestures.
fn run_until(knob: &mut TestKnob, clock: &mut MockClock, until_ms: u64) -> Vec<GestureSlot> {
    let mut gestures = Vec::new();
    while clock.now_ms() <= until_ms {
        if let Some(g) = knob.poll(clock.now_ms()).gesture {
            gestures.push(g);
        }
        clock.advance(u64::from(LOOP_PERIOD_MS));
    }
    gestures
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn repeated_position_yields_single_cw() {
    let mut k = knob(Configuration::default());
    let mut gestures = Vec::new();
    for (t, pos) in [0, 1, 1, 1].into_iter().enumerate() {
        k.io_mut().encoder.set_position(pos);
        gestures.extend(k.poll(t as u64 * 10).gesture);
    }
    assert_eq!(gestures, vec![GestureSlot::Cw]);
    assert_eq!(k.io().hid.consumer_count(ConsumerCode::VOLUME_INCREMENT), 1);
}

#[test]
fn volume_sensitivity_six_fires_three_spaced_pulses() {
    let mut k = knob(Configuration::default().with_sensitivity_volume(6));
    k.io_mut().encoder.rotate(1);

    let out = k.poll(0);

    assert_eq!(out.gesture, Some(GestureSlot::Cw));
    assert_eq!(k.io().hid.consumer_count(ConsumerCode::VOLUME_INCREMENT), 3);
    let delays = &k.io().delay.calls_ms;
    assert_eq!(delays.len(), 3);
    assert!(delays.iter().all(|&ms| ms >= 15));
}

#[test]
fn navigation_profile_scrolls_with_arrows() {
    let mut k = knob(
        Configuration::default()
            .with_current_profile(2)
            .with_sensitivity_scroll(2),
    );
    k.io_mut().encoder.rotate(1);
    k.poll(0);

    assert_eq!(
        k.io().hid.events,
        vec![
            HidEvent::Press(vec![Keycode::UP_ARROW]),
            HidEvent::ReleaseAll,
            HidEvent::Press(vec![Keycode::UP_ARROW]),
            HidEvent::ReleaseAll,
        ]
    );
}

// ============================================================================
// Button gestures
// ============================================================================

#[test]
fn held_button_is_one_long_press_and_no_click() {
    let mut k = knob(Configuration::default());
    let mut clock = MockClock::new();

    k.io_mut().encoder.set_button(true);
    let held = run_until(&mut k, &mut clock, 900);
    assert_eq!(held, vec![GestureSlot::LongPress]);
    assert_eq!(k.button_state(), ButtonState::LongPressDone);

    k.io_mut().encoder.set_button(false);
    let released = run_until(&mut k, &mut clock, 950);
    assert!(released.is_empty());
    assert_eq!(k.button_state(), ButtonState::Released);

    // The media profile's long press moved us to navigation.
    assert_eq!(k.state().active_index(), 1);
    assert_eq!(k.io().hid.consumer_count(ConsumerCode::MUTE), 0);
}

#[test]
fn short_press_clicks() {
    let mut k = knob(Configuration::default());
    let mut clock = MockClock::new();

    k.io_mut().encoder.set_button(true);
    run_until(&mut k, &mut clock, 200);
    k.io_mut().encoder.set_button(false);
    let out = run_until(&mut k, &mut clock, 220);

    assert_eq!(out, vec![GestureSlot::Click]);
    assert_eq!(k.io().hid.events, vec![HidEvent::Consumer(ConsumerCode::MUTE)]);
}

#[test]
fn hold_and_turn_uses_shifted_bindings() {
    let mut k = knob(Configuration::default().with_current_profile(3));
    let mut clock = MockClock::new();

    k.io_mut().encoder.set_button(true);
    run_until(&mut k, &mut clock, 50);
    k.io_mut().encoder.rotate(1);
    run_until(&mut k, &mut clock, 100);
    k.io_mut().encoder.rotate(-1);
    run_until(&mut k, &mut clock, 1500);
    k.io_mut().encoder.set_button(false);
    run_until(&mut k, &mut clock, 1600);

    // Shifted rotation pans; holding on afterwards is neither a click nor a long press.
    assert_eq!(
        k.io().hid.events,
        vec![
            HidEvent::MouseMove { x: 0, y: 0, wheel: 0, pan: 1 },
            HidEvent::MouseMove { x: 0, y: 0, wheel: 0, pan: -1 },
        ]
    );
    assert_eq!(k.state().active_index(), 2);
}

#[test]
fn macro_binding_presses_and_releases() {
    let config = Configuration::default().with_binding(
        1,
        GestureSlot::Click,
        ActionObject::keys(&["CTRL", "SHIFT", "M"]),
    );
    let mut k = knob(config);
    k.io_mut().encoder.set_button(true);
    k.poll(0);
    k.io_mut().encoder.set_button(false);
    let out = k.poll(10);

    assert!(matches!(out.dispatched, Some(DispatchOutcome::Macro { .. })));
    assert_eq!(
        k.io().hid.events,
        vec![
            HidEvent::Press(vec![Keycode::LEFT_CONTROL, Keycode::LEFT_SHIFT, Keycode::M]),
            HidEvent::ReleaseAll,
        ]
    );
    assert_eq!(k.io().delay.calls_ms, vec![10]);
}

#[test]
fn profile_cycle_wraps_through_all_profiles() {
    let config = Configuration::default()
        .with_binding(2, GestureSlot::LongPress, ActionObject::simple("next_profile"))
        .with_binding(3, GestureSlot::LongPress, ActionObject::simple("next_profile"));
    let mut k = knob(config);
    let mut clock = MockClock::new();

    let mut seen = vec![k.state().active_index()];
    for _ in 0..3 {
        k.io_mut().encoder.set_button(true);
        let until = clock.now_ms() + 850;
        run_until(&mut k, &mut clock, until);
        k.io_mut().encoder.set_button(false);
        let until = clock.now_ms() + 20;
        run_until(&mut k, &mut clock, until);
        seen.push(k.state().active_index());
    }

    assert_eq!(seen, vec![0, 1, 2, 0]);
}

#[test]
fn mouse_profile_click() {
    let mut k = knob(Configuration::default().with_current_profile(3));
    k.io_mut().encoder.set_button(true);
    k.poll(0);
    k.io_mut().encoder.set_button(false);
    k.poll(10);
    assert_eq!(k.io().hid.events, vec![HidEvent::Click(MouseButton::Middle)]);
}

// ============================================================================
// Host commands
// ============================================================================

#[test]
fn reboot_in_any_case_resets() {
    for text in ["reboot\n", "REBOOT\n", "ReBoOt"] {
        let mut k = knob(Configuration::default());
        k.io_mut().channel.push(text.as_bytes());

        let out = k.poll(0);

        assert_eq!(out.command, Some(Command::Reboot), "{text:?}");
        assert_eq!(k.io().reset.count, 1);
        assert_eq!(k.io().delay.calls_ms, vec![REBOOT_GRACE_MS]);
    }
}

#[test]
fn unknown_command_does_not_reset() {
    let mut k = knob(Configuration::default());
    k.io_mut().channel.push(b"PING");

    let out = k.poll(0);

    assert_eq!(out.command, Some(Command::Unknown("PING".into())));
    assert_eq!(k.io().reset.count, 0);
}

// ============================================================================
// Failure tolerance
// ============================================================================

#[test]
fn hid_failure_does_not_stop_the_loop() {
    let mut k = knob(Configuration::default());
    k.io_mut().hid.fail_after = Some(0);
    k.io_mut().encoder.rotate(1);

    let out = k.poll(0);
    assert_eq!(out.dispatched, Some(DispatchOutcome::Failed));

    k.io_mut().hid.fail_after = None;
    k.io_mut().encoder.rotate(1);
    k.poll(10);
    assert_eq!(k.io().hid.consumer_count(ConsumerCode::VOLUME_INCREMENT), 1);
}

#[test]
fn unknown_action_binding_is_silent() {
    let config =
        Configuration::default().with_binding(1, GestureSlot::Cw, ActionObject::simple("warp_drive"));
    let mut k = knob(config);
    k.io_mut().encoder.rotate(1);

    let out = k.poll(0);

    assert_eq!(out.dispatched, Some(DispatchOutcome::Idle));
    assert!(k.io().hid.events.is_empty());
}
