//! Action dispatch: gesture + active profile in, HID traffic out.
//!
//! [`Dispatcher::dispatch`] looks up the binding for a gesture, works out how
//! many times to fire it, and drives the [`HidTransport`]. It never fails:
//! write errors are logged and the burst is abandoned, so one bad binding or
//! a flaky transport cannot stall the control loop.
//!
//! # Repeat rules
//!
//! | Action | Gesture | Repeats | Spacing |
//! |--------|---------|---------|---------|
//! | `volume_up` / `volume_down` | rotation | [`volume_repeats`] | 15 ms |
//! | `scroll_up` / `scroll_down` | rotation | `sensitivity_scroll` | 5 ms |
//! | profile control | any | 1 | none |
//! | everything else | any | 1 | none |
//!
//! Macros press every resolvable key at once, hold for 10 ms, then release
//! everything. The release runs even if the press failed.

use embedded_hal::delay::DelayNs;
use tracing::{debug, error, warn};

use crate::actions::{ActionKind, Effect, ProfileControl};
use crate::config::{ActionObject, GestureSlot};
use crate::keycodes::{keycode_of, Keycode};
use crate::state::RuntimeState;
use crate::traits::HidTransport;

/// Gap after each volume step.
pub const VOLUME_STEP_SPACING_MS: u32 = 15;

/// Gap after each scroll step.
pub const SCROLL_STEP_SPACING_MS: u32 = 5;

/// How long macro keys stay down.
pub const MACRO_HOLD_MS: u32 = 10;

/// Consumer-control volume usages register twice per report on common hosts,
/// so the configured volume sensitivity is divided by this before repeating.
pub const VOLUME_PULSE_DIVISOR: u8 = 2;

/// Volume repeats for a sensitivity: `max(1, round(s / 2))`, ties to even.
pub fn volume_repeats(sensitivity: u8) -> u32 {
    let halved = (f32::from(sensitivity) / f32::from(VOLUME_PULSE_DIVISOR)).round_ties_even();
    (halved as u32).max(1)
}

/// How many times to fire a simple action and how long to wait after each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatPlan {
    pub count: u32,
    pub spacing_ms: u32,
}

impl RepeatPlan {
    /// Fire once, no wait.
    pub const ONCE: RepeatPlan = RepeatPlan {
        count: 1,
        spacing_ms: 0,
    };
}

/// What a dispatch did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Bound to nothing, or nothing resolvable.
    Idle,
    /// A simple action fired `times` times.
    Fired { action: ActionKind, times: u32 },
    /// The active profile changed (zero-based index).
    ProfileChanged(usize),
    /// A macro was pressed and released.
    Macro { keys: Vec<Keycode> },
    /// A HID write failed; already logged.
    Failed,
}

/// Dispatch timing.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    volume_spacing_ms: u32,
    scroll_spacing_ms: u32,
    macro_hold_ms: u32,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            volume_spacing_ms: VOLUME_STEP_SPACING_MS,
            scroll_spacing_ms: SCROLL_STEP_SPACING_MS,
            macro_hold_ms: MACRO_HOLD_MS,
        }
    }
}

impl Dispatcher {
    /// Dispatcher with the standard timing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap after each volume step.
    pub fn with_volume_spacing_ms(mut self, ms: u32) -> Self {
        self.volume_spacing_ms = ms;
        self
    }

    /// Set the gap after each scroll step.
    pub fn with_scroll_spacing_ms(mut self, ms: u32) -> Self {
        self.scroll_spacing_ms = ms;
        self
    }

    /// Set the macro hold time.
    pub fn with_macro_hold_ms(mut self, ms: u32) -> Self {
        self.macro_hold_ms = ms;
        self
    }

    /// Repeat plan for a simple action fired by a gesture.
    pub fn repeat_plan(&self, action: ActionKind, slot: GestureSlot, state: &RuntimeState) -> RepeatPlan {
        if action.is_profile_control() || !slot.is_rotation() {
            return RepeatPlan::ONCE;
        }
        let config = state.config();
        if action.is_volume() {
            RepeatPlan {
                count: volume_repeats(config.sensitivity_volume),
                spacing_ms: self.volume_spacing_ms,
            }
        } else if action.is_scroll() {
            RepeatPlan {
                count: u32::from(config.sensitivity_scroll.max(1)),
                spacing_ms: self.scroll_spacing_ms,
            }
        } else {
            RepeatPlan::ONCE
        }
    }

    /// Run the active profile's binding for `slot`.
    pub fn dispatch<H, D>(
        &self,
        slot: GestureSlot,
        state: &mut RuntimeState,
        hid: &mut H,
        delay: &mut D,
    ) -> DispatchOutcome
    where
        H: HidTransport + ?Sized,
        D: DelayNs + ?Sized,
    {
        debug!(gesture = slot.key(), profile = state.active_index() + 1, "dispatch");
        match state.binding(slot).clone() {
            ActionObject::Simple { action } => self.run_simple(&action, slot, state, hid, delay),
            ActionObject::Macro { keys } => self.run_macro(&keys, hid, delay),
        }
    }

    fn run_simple<H, D>(
        &self,
        name: &str,
        slot: GestureSlot,
        state: &mut RuntimeState,
        hid: &mut H,
        delay: &mut D,
    ) -> DispatchOutcome
    where
        H: HidTransport + ?Sized,
        D: DelayNs + ?Sized,
    {
        let Some(action) = ActionKind::from_name(name) else {
            warn!(action = name, gesture = slot.key(), "unknown action, doing nothing");
            return DispatchOutcome::Idle;
        };

        let effect = action.effect(state.config().sensitivity_mouse as i8);
        if let Effect::Profile(control) = effect {
            match control {
                ProfileControl::Next => state.next_profile(),
                ProfileControl::Switch(index) => {
                    state.switch_profile(index);
                }
            }
            return DispatchOutcome::ProfileChanged(state.active_index());
        }
        if effect == Effect::None {
            return DispatchOutcome::Idle;
        }

        let plan = self.repeat_plan(action, slot, state);
        for _ in 0..plan.count {
            if let Err(e) = emit(effect, hid) {
                error!(action = action.name(), error = ?e, "HID write failed");
                return DispatchOutcome::Failed;
            }
            if plan.spacing_ms > 0 {
                delay.delay_ms(plan.spacing_ms);
            }
        }
        DispatchOutcome::Fired {
            action,
            times: plan.count,
        }
    }

    fn run_macro<H, D>(&self, names: &[String], hid: &mut H, delay: &mut D) -> DispatchOutcome
    where
        H: HidTransport + ?Sized,
        D: DelayNs + ?Sized,
    {
        let keys: Vec<Keycode> = names
            .iter()
            .filter_map(|name| {
                let code = keycode_of(name);
                if code.is_none() {
                    warn!(key = %name, "unknown macro key, dropping");
                }
                code
            })
            .collect();

        if keys.is_empty() {
            return DispatchOutcome::Idle;
        }

        let pressed = hid.press_keys(&keys);
        if pressed.is_ok() {
            delay.delay_ms(self.macro_hold_ms);
        }
        let released = hid.release_all();

        match pressed.and(released) {
            Ok(()) => DispatchOutcome::Macro { keys },
            Err(e) => {
                error!(error = ?e, "macro write failed");
                DispatchOutcome::Failed
            }
        }
    }
}

fn emit<H: HidTransport + ?Sized>(effect: Effect, hid: &mut H) -> Result<(), H::Error> {
    match effect {
        Effect::None | Effect::Profile(_) => Ok(()),
        Effect::Consumer(code) => hid.send_consumer(code),
        Effect::Keys(keys) => hid.send_keys(keys),
        Effect::MouseMove { x, y } => hid.mouse_move(x, y, 0, 0),
        Effect::Wheel {
            vertical,
            horizontal,
        } => hid.mouse_move(0, 0, vertical, horizontal),
        Effect::Click(button) => hid.mouse_click(button),
    }
}
