//! Action registry: symbolic action names and the HID effects they produce.
//!
//! The set of simple actions is closed, so it is an enum rather than a
//! string-keyed table of closures. Names only appear at the edges: the
//! configuration file stores them, and [`resolve`] turns them into an
//! [`ActionKind`]. Lookup is total; unknown names resolve to
//! [`ActionKind::Nothing`].
//!
//! # Example
//!
//! ```rust
//! use rs_knob::actions::{resolve, ActionKind, Effect};
//! use rs_knob::keycodes::ConsumerCode;
//!
//! assert_eq!(resolve("volume_up"), ActionKind::VolumeUp);
//! assert_eq!(resolve("bogus"), ActionKind::Nothing);
//! assert_eq!(
//!     ActionKind::VolumeUp.effect(4),
//!     Effect::Consumer(ConsumerCode::VOLUME_INCREMENT)
//! );
//! ```

use crate::keycodes::{ConsumerCode, Keycode};
use crate::traits::MouseButton;

/// Every simple action the device can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Nothing,
    VolumeUp,
    VolumeDown,
    Mute,
    PlayPause,
    NextTrack,
    PrevTrack,
    ScrollUp,
    ScrollDown,
    Undo,
    Redo,
    MouseMoveXPos,
    MouseMoveXNeg,
    MouseMoveYPos,
    MouseMoveYNeg,
    MouseScrollVPos,
    MouseScrollVNeg,
    MouseScrollHPos,
    MouseScrollHNeg,
    MouseClickLeft,
    MouseClickRight,
    MouseClickMiddle,
    NextProfile,
    SwitchProfile1,
    SwitchProfile2,
    SwitchProfile3,
}

impl ActionKind {
    /// All actions, in the order host tools list them.
    pub const ALL: [ActionKind; 26] = [
        ActionKind::Nothing,
        ActionKind::VolumeUp,
        ActionKind::VolumeDown,
        ActionKind::Mute,
        ActionKind::PlayPause,
        ActionKind::NextTrack,
        ActionKind::PrevTrack,
        ActionKind::ScrollUp,
        ActionKind::ScrollDown,
        ActionKind::Undo,
        ActionKind::Redo,
        ActionKind::MouseMoveXPos,
        ActionKind::MouseMoveXNeg,
        ActionKind::MouseMoveYPos,
        ActionKind::MouseMoveYNeg,
        ActionKind::MouseScrollVPos,
        ActionKind::MouseScrollVNeg,
        ActionKind::MouseScrollHPos,
        ActionKind::MouseScrollHNeg,
        ActionKind::MouseClickLeft,
        ActionKind::MouseClickRight,
        ActionKind::MouseClickMiddle,
        ActionKind::NextProfile,
        ActionKind::SwitchProfile1,
        ActionKind::SwitchProfile2,
        ActionKind::SwitchProfile3,
    ];

    /// Name used in the configuration file.
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Nothing => "nothing",
            ActionKind::VolumeUp => "volume_up",
            ActionKind::VolumeDown => "volume_down",
            ActionKind::Mute => "mute",
            ActionKind::PlayPause => "play_pause",
            ActionKind::NextTrack => "next_track",
            ActionKind::PrevTrack => "prev_track",
            ActionKind::ScrollUp => "scroll_up",
            ActionKind::ScrollDown => "scroll_down",
            ActionKind::Undo => "undo",
            ActionKind::Redo => "redo",
            ActionKind::MouseMoveXPos => "mouse_move_x_pos",
            ActionKind::MouseMoveXNeg => "mouse_move_x_neg",
            ActionKind::MouseMoveYPos => "mouse_move_y_pos",
            ActionKind::MouseMoveYNeg => "mouse_move_y_neg",
            ActionKind::MouseScrollVPos => "mouse_scroll_v_pos",
            ActionKind::MouseScrollVNeg => "mouse_scroll_v_neg",
            ActionKind::MouseScrollHPos => "mouse_scroll_h_pos",
            ActionKind::MouseScrollHNeg => "mouse_scroll_h_neg",
            ActionKind::MouseClickLeft => "mouse_click_left",
            ActionKind::MouseClickRight => "mouse_click_right",
            ActionKind::MouseClickMiddle => "mouse_click_middle",
            ActionKind::NextProfile => "next_profile",
            ActionKind::SwitchProfile1 => "switch_profile_1",
            ActionKind::SwitchProfile2 => "switch_profile_2",
            ActionKind::SwitchProfile3 => "switch_profile_3",
        }
    }

    /// Exact-name lookup. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Consumer-control volume steps. These get the double-pulse compensation
    /// in the dispatcher.
    #[inline]
    pub const fn is_volume(self) -> bool {
        matches!(self, ActionKind::VolumeUp | ActionKind::VolumeDown)
    }

    /// Arrow-key scroll emulation.
    #[inline]
    pub const fn is_scroll(self) -> bool {
        matches!(self, ActionKind::ScrollUp | ActionKind::ScrollDown)
    }

    /// Profile-control actions that change state instead of emitting HID traffic.
    #[inline]
    pub const fn is_profile_control(self) -> bool {
        matches!(
            self,
            ActionKind::NextProfile
                | ActionKind::SwitchProfile1
                | ActionKind::SwitchProfile2
                | ActionKind::SwitchProfile3
        )
    }

    /// The concrete effect of this action.
    ///
    /// `mouse_step` is the pointer distance for the four mouse-move actions
    /// (the configured mouse sensitivity).
    pub fn effect(self, mouse_step: i8) -> Effect {
        match self {
            ActionKind::Nothing => Effect::None,
            ActionKind::VolumeUp => Effect::Consumer(ConsumerCode::VOLUME_INCREMENT),
            ActionKind::VolumeDown => Effect::Consumer(ConsumerCode::VOLUME_DECREMENT),
            ActionKind::Mute => Effect::Consumer(ConsumerCode::MUTE),
            ActionKind::PlayPause => Effect::Consumer(ConsumerCode::PLAY_PAUSE),
            ActionKind::NextTrack => Effect::Consumer(ConsumerCode::SCAN_NEXT_TRACK),
            ActionKind::PrevTrack => Effect::Consumer(ConsumerCode::SCAN_PREVIOUS_TRACK),
            ActionKind::ScrollUp => Effect::Keys(&[Keycode::UP_ARROW]),
            ActionKind::ScrollDown => Effect::Keys(&[Keycode::DOWN_ARROW]),
            ActionKind::Undo => Effect::Keys(&[Keycode::LEFT_CONTROL, Keycode::Z]),
            ActionKind::Redo => Effect::Keys(&[Keycode::LEFT_CONTROL, Keycode::Y]),
            ActionKind::MouseMoveXPos => Effect::MouseMove { x: mouse_step, y: 0 },
            ActionKind::MouseMoveXNeg => Effect::MouseMove {
                x: -mouse_step,
                y: 0,
            },
            ActionKind::MouseMoveYPos => Effect::MouseMove { x: 0, y: mouse_step },
            ActionKind::MouseMoveYNeg => Effect::MouseMove {
                x: 0,
                y: -mouse_step,
            },
            ActionKind::MouseScrollVPos => Effect::Wheel { vertical: 1, horizontal: 0 },
            ActionKind::MouseScrollVNeg => Effect::Wheel { vertical: -1, horizontal: 0 },
            ActionKind::MouseScrollHPos => Effect::Wheel { vertical: 0, horizontal: 1 },
            ActionKind::MouseScrollHNeg => Effect::Wheel { vertical: 0, horizontal: -1 },
            ActionKind::MouseClickLeft => Effect::Click(MouseButton::Left),
            ActionKind::MouseClickRight => Effect::Click(MouseButton::Right),
            ActionKind::MouseClickMiddle => Effect::Click(MouseButton::Middle),
            ActionKind::NextProfile => Effect::Profile(ProfileControl::Next),
            ActionKind::SwitchProfile1 => Effect::Profile(ProfileControl::Switch(0)),
            ActionKind::SwitchProfile2 => Effect::Profile(ProfileControl::Switch(1)),
            ActionKind::SwitchProfile3 => Effect::Profile(ProfileControl::Switch(2)),
        }
    }
}

/// Profile-control meta action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileControl {
    /// Advance to the next profile, wrapping around.
    Next,
    /// Jump to the profile at this zero-based index.
    Switch(usize),
}

/// What an action does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// No output.
    None,
    /// One consumer-control usage.
    Consumer(ConsumerCode),
    /// Tap a key or key combination.
    Keys(&'static [Keycode]),
    /// Relative pointer motion.
    MouseMove { x: i8, y: i8 },
    /// Wheel (vertical) or pan (horizontal) step.
    Wheel { vertical: i8, horizontal: i8 },
    /// Mouse button click.
    Click(MouseButton),
    /// Changes the active profile; no HID output.
    Profile(ProfileControl),
}

/// Resolve an action name. Unknown names become [`ActionKind::Nothing`].
pub fn resolve(name: &str) -> ActionKind {
    ActionKind::from_name(name).unwrap_or(ActionKind::Nothing)
}
