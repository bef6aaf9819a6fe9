//! Configuration model: profiles, gesture bindings, and sensitivity settings.
//!
//! The on-disk format is JSON:
//!
//! ```json
//! {
//!   "schema_version": 3,
//!   "current_profile": 1,
//!   "sensitivity_volume": 2,
//!   "sensitivity_scroll": 1,
//!   "sensitivity_mouse": 4,
//!   "profiles": [
//!     { "cw": {"type": "simple", "action": "volume_up"},
//!       "ccw": {"type": "simple", "action": "volume_down"},
//!       "click": {"type": "macro", "keys": ["CTRL", "SHIFT", "M"]},
//!       "long_press": {"type": "simple", "action": "next_profile"},
//!       "cw_shifted": {"type": "simple", "action": "nothing"},
//!       "ccw_shifted": {"type": "simple", "action": "nothing"} }
//!   ]
//! }
//! ```
//!
//! Older files without `schema_version`, with bare action-name strings,
//! without the shifted slots, or missing some of the four settings are
//! upgraded on load by [`migrate`]. Anything
//! that cannot be read or recognized falls back to [`Configuration::default`].
//!
//! # Example
//!
//! ```rust
//! use rs_knob::config::{parse_str, GestureSlot, ActionObject};
//!
//! let cfg = parse_str(r#"{
//!     "current_profile": 1, "sensitivity_volume": 2,
//!     "sensitivity_scroll": 1, "sensitivity_mouse": 4,
//!     "profiles": [
//!         {"cw": "volume_up", "ccw": "volume_down", "click": "mute", "long_press": "nothing"},
//!         {"cw": "scroll_up", "ccw": "scroll_down", "click": "nothing", "long_press": "nothing"},
//!         {"cw": "nothing", "ccw": "nothing", "click": "nothing", "long_press": "nothing"}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(cfg.profiles[0].slot(GestureSlot::Cw), &ActionObject::simple("volume_up"));
//! assert_eq!(cfg.profiles[0].slot(GestureSlot::CwShifted), &ActionObject::nothing());
//! ```

mod load;
mod migrate;

pub use load::{load, load_detailed, ConfigOrigin, ConfigSource, FileSource, LoadedConfig};
pub use migrate::{detect_shape, migrate, parse_str, validate, SchemaShape};

use serde::{Deserialize, Serialize};

/// Version written by this crate into `schema_version`.
pub const SCHEMA_VERSION: u32 = 3;

/// Where the firmware expects the configuration file.
pub const DEVICE_CONFIG_PATH: &str = "/data/profiles.json";

/// Minimum number of profiles a configuration carries.
pub const MIN_PROFILES: usize = 3;

/// Valid range for every sensitivity setting.
pub const SENSITIVITY_RANGE: core::ops::RangeInclusive<i64> = 1..=10;

/// Default volume sensitivity.
pub const DEFAULT_SENSITIVITY_VOLUME: u8 = 2;
/// Default scroll sensitivity.
pub const DEFAULT_SENSITIVITY_SCROLL: u8 = 1;
/// Default mouse sensitivity.
pub const DEFAULT_SENSITIVITY_MOUSE: u8 = 4;

// ============================================================================
// Gesture slots
// ============================================================================

/// The six bindable gestures of a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureSlot {
    Cw,
    Ccw,
    Click,
    LongPress,
    CwShifted,
    CcwShifted,
}

impl GestureSlot {
    /// All slots in file order.
    pub const ALL: [GestureSlot; 6] = [
        GestureSlot::Cw,
        GestureSlot::Ccw,
        GestureSlot::Click,
        GestureSlot::LongPress,
        GestureSlot::CwShifted,
        GestureSlot::CcwShifted,
    ];

    /// JSON key for this slot.
    pub const fn key(self) -> &'static str {
        match self {
            GestureSlot::Cw => "cw",
            GestureSlot::Ccw => "ccw",
            GestureSlot::Click => "click",
            GestureSlot::LongPress => "long_press",
            GestureSlot::CwShifted => "cw_shifted",
            GestureSlot::CcwShifted => "ccw_shifted",
        }
    }

    /// Rotation gestures (plain or shifted). Sensitivity multipliers apply to these.
    pub const fn is_rotation(self) -> bool {
        !matches!(self, GestureSlot::Click | GestureSlot::LongPress)
    }

    /// Slots added with hold-and-rotate support.
    pub const fn is_shifted(self) -> bool {
        matches!(self, GestureSlot::CwShifted | GestureSlot::CcwShifted)
    }
}

// ============================================================================
// Action objects
// ============================================================================

/// Binding for one gesture slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionObject {
    /// A named action from the registry.
    Simple {
        /// Registry name; unknown names do nothing.
        action: String,
    },
    /// A key combination pressed together.
    Macro {
        /// Key names, resolved with [`crate::keycodes::keycode_of`].
        keys: Vec<String>,
    },
}

impl ActionObject {
    /// `{"type": "simple", "action": name}`
    pub fn simple(name: &str) -> Self {
        ActionObject::Simple {
            action: name.into(),
        }
    }

    /// The no-op binding.
    pub fn nothing() -> Self {
        Self::simple("nothing")
    }

    /// `{"type": "macro", "keys": [...]}`
    pub fn keys(keys: &[&str]) -> Self {
        ActionObject::Macro {
            keys: keys.iter().map(|k| (*k).into()).collect(),
        }
    }
}

impl Default for ActionObject {
    fn default() -> Self {
        Self::nothing()
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// A complete set of gesture bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub cw: ActionObject,
    pub ccw: ActionObject,
    pub click: ActionObject,
    pub long_press: ActionObject,
    pub cw_shifted: ActionObject,
    pub ccw_shifted: ActionObject,
}

impl Profile {
    /// Binding for a slot.
    pub fn slot(&self, slot: GestureSlot) -> &ActionObject {
        match slot {
            GestureSlot::Cw => &self.cw,
            GestureSlot::Ccw => &self.ccw,
            GestureSlot::Click => &self.click,
            GestureSlot::LongPress => &self.long_press,
            GestureSlot::CwShifted => &self.cw_shifted,
            GestureSlot::CcwShifted => &self.ccw_shifted,
        }
    }

    /// Mutable binding for a slot.
    pub fn slot_mut(&mut self, slot: GestureSlot) -> &mut ActionObject {
        match slot {
            GestureSlot::Cw => &mut self.cw,
            GestureSlot::Ccw => &mut self.ccw,
            GestureSlot::Click => &mut self.click,
            GestureSlot::LongPress => &mut self.long_press,
            GestureSlot::CwShifted => &mut self.cw_shifted,
            GestureSlot::CcwShifted => &mut self.ccw_shifted,
        }
    }

    /// Set a slot's binding.
    pub fn with(mut self, slot: GestureSlot, action: ActionObject) -> Self {
        *self.slot_mut(slot) = action;
        self
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Complete device configuration.
///
/// Construct through [`Configuration::default`], [`parse_str`], or
/// [`load`]; all of them return values that satisfy the range invariants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Active profile, 1-based.
    pub current_profile: usize,
    pub sensitivity_volume: u8,
    pub sensitivity_scroll: u8,
    pub sensitivity_mouse: u8,
    pub profiles: Vec<Profile>,
}

impl Default for Configuration {
    /// Three profiles: media control, navigation, mouse.
    fn default() -> Self {
        use GestureSlot::*;

        let media = Profile::default()
            .with(Cw, ActionObject::simple("volume_up"))
            .with(Ccw, ActionObject::simple("volume_down"))
            .with(Click, ActionObject::simple("mute"))
            .with(LongPress, ActionObject::simple("next_profile"));

        let navigation = Profile::default()
            .with(Cw, ActionObject::simple("scroll_up"))
            .with(Ccw, ActionObject::simple("scroll_down"))
            .with(Click, ActionObject::simple("play_pause"));

        let mouse = Profile::default()
            .with(Cw, ActionObject::simple("mouse_scroll_v_pos"))
            .with(Ccw, ActionObject::simple("mouse_scroll_v_neg"))
            .with(Click, ActionObject::simple("mouse_click_middle"))
            .with(CwShifted, ActionObject::simple("mouse_scroll_h_pos"))
            .with(CcwShifted, ActionObject::simple("mouse_scroll_h_neg"));

        Self {
            current_profile: 1,
            sensitivity_volume: DEFAULT_SENSITIVITY_VOLUME,
            sensitivity_scroll: DEFAULT_SENSITIVITY_SCROLL,
            sensitivity_mouse: DEFAULT_SENSITIVITY_MOUSE,
            profiles: vec![media, navigation, mouse],
        }
    }
}

impl Configuration {
    /// Set the active profile (1-based, clamped on [`sanitize`](Self::sanitize)).
    pub fn with_current_profile(mut self, index: usize) -> Self {
        self.current_profile = index;
        self
    }

    /// Set the volume sensitivity.
    pub fn with_sensitivity_volume(mut self, value: u8) -> Self {
        self.sensitivity_volume = value;
        self
    }

    /// Set the scroll sensitivity.
    pub fn with_sensitivity_scroll(mut self, value: u8) -> Self {
        self.sensitivity_scroll = value;
        self
    }

    /// Set the mouse sensitivity.
    pub fn with_sensitivity_mouse(mut self, value: u8) -> Self {
        self.sensitivity_mouse = value;
        self
    }

    /// Replace one profile's binding (profile index is 1-based).
    pub fn with_binding(mut self, profile: usize, slot: GestureSlot, action: ActionObject) -> Self {
        if let Some(p) = profile.checked_sub(1).and_then(|i| self.profiles.get_mut(i)) {
            *p.slot_mut(slot) = action;
        }
        self
    }

    /// Reset out-of-range values to their defaults.
    ///
    /// Sensitivities outside `1..=10` reset to the per-field default;
    /// `current_profile` outside `1..=profiles.len()` resets to 1; fewer than
    /// three profiles are padded with no-op profiles.
    pub fn sanitize(mut self) -> Self {
        self.sensitivity_volume = clamp_sensitivity(
            i64::from(self.sensitivity_volume),
            DEFAULT_SENSITIVITY_VOLUME,
        );
        self.sensitivity_scroll = clamp_sensitivity(
            i64::from(self.sensitivity_scroll),
            DEFAULT_SENSITIVITY_SCROLL,
        );
        self.sensitivity_mouse =
            clamp_sensitivity(i64::from(self.sensitivity_mouse), DEFAULT_SENSITIVITY_MOUSE);
        while self.profiles.len() < MIN_PROFILES {
            self.profiles.push(Profile::default());
        }
        if !(1..=self.profiles.len()).contains(&self.current_profile) {
            self.current_profile = 1;
        }
        self
    }

    /// Serialize to the current on-disk format, including `schema_version`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct OnDisk<'a> {
            schema_version: u32,
            #[serde(flatten)]
            config: &'a Configuration,
        }

        serde_json::to_string_pretty(&OnDisk {
            schema_version: SCHEMA_VERSION,
            config: self,
        })
    }
}

/// In-range values pass through; anything else becomes `default`.
pub fn clamp_sensitivity(value: i64, default: u8) -> u8 {
    if SENSITIVITY_RANGE.contains(&value) {
        value as u8
    } else {
        default
    }
}

// ============================================================================
// Tests
// ============================================================================
