//! Validation and forward migration of configuration files.
//!
//! Four shapes are recognized, checked in this order:
//!
//! 1. [`SchemaShape::BareNames`]: some slot holds a bare action-name string.
//! 2. [`SchemaShape::MissingShifted`]: action objects, but a profile lacks
//!    `cw_shifted`/`ccw_shifted`.
//! 3. [`SchemaShape::Current`]: passes [`validate`].
//! 4. [`SchemaShape::MissingSettings`]: all six slots well formed, but some
//!    of the top-level settings are absent. They take their defaults.
//!
//! A file carrying `"schema_version": 3` skips the sniff: its slots must all
//! be well formed.

use serde_json::{Map, Value};
use tracing::warn;

use super::{
    clamp_sensitivity, ActionObject, Configuration, GestureSlot, Profile, DEFAULT_SENSITIVITY_MOUSE,
    DEFAULT_SENSITIVITY_SCROLL, DEFAULT_SENSITIVITY_VOLUME, MIN_PROFILES, SCHEMA_VERSION,
};
use crate::error::ConfigError;

const SCALAR_KEYS: [&str; 4] = [
    "current_profile",
    "sensitivity_volume",
    "sensitivity_scroll",
    "sensitivity_mouse",
];

/// Recognized configuration layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaShape {
    /// Oldest layout: slot values are bare action names.
    BareNames,
    /// Action objects for the original four slots only.
    MissingShifted,
    /// Current layout.
    Current,
    /// Current slots, but one or more of the four settings missing.
    MissingSettings,
}

/// Check a raw document against the current layout.
///
/// Requires the four scalar keys, a `profiles` array of at least three
/// objects, and a well-formed action object in every slot of every profile.
/// Scalar ranges are not checked here.
pub fn validate(raw: &Value) -> bool {
    let Some(obj) = raw.as_object() else {
        return false;
    };
    if !SCALAR_KEYS.iter().all(|k| obj.contains_key(*k)) {
        return false;
    }
    profile_list(obj).is_some_and(|profiles| slots_well_formed(profiles))
}

/// Work out which layout a document uses, or `None` if it is unrecognizable.
pub fn detect_shape(raw: &Value) -> Option<SchemaShape> {
    let obj = raw.as_object()?;

    match obj.get("schema_version").and_then(Value::as_u64) {
        Some(v) if v == u64::from(SCHEMA_VERSION) => {
            return current_or_missing_settings(raw, obj);
        }
        Some(v) if v > u64::from(SCHEMA_VERSION) => {
            warn!(
                schema_version = v,
                "configuration is newer than this firmware, inspecting structure"
            );
        }
        _ => {}
    }

    let profiles = profile_list(obj)?;
    let profiles: Vec<&Map<String, Value>> = profiles
        .iter()
        .map(Value::as_object)
        .collect::<Option<_>>()?;

    if profiles
        .iter()
        .any(|p| GestureSlot::ALL.iter().any(|s| p.get(s.key()).is_some_and(Value::is_string)))
    {
        return Some(SchemaShape::BareNames);
    }
    if profiles.iter().any(|p| {
        !p.contains_key(GestureSlot::CwShifted.key()) || !p.contains_key(GestureSlot::CcwShifted.key())
    }) {
        return Some(SchemaShape::MissingShifted);
    }
    current_or_missing_settings(raw, obj)
}

fn current_or_missing_settings(raw: &Value, obj: &Map<String, Value>) -> Option<SchemaShape> {
    if validate(raw) {
        return Some(SchemaShape::Current);
    }
    profile_list(obj)
        .filter(|profiles| slots_well_formed(profiles))
        .map(|_| SchemaShape::MissingSettings)
}

/// Upgrade a document of any recognized shape into a [`Configuration`].
///
/// Slots missing from legacy files become `nothing`; missing scalars take
/// their defaults. The result is already sanitized. Migrating a current
/// document returns it unchanged apart from range correction.
pub fn migrate(raw: &Value) -> Result<Configuration, ConfigError> {
    let obj = raw.as_object().ok_or(ConfigError::NotAnObject)?;
    let shape = detect_shape(raw).ok_or(ConfigError::Unrecognized)?;

    let mut profiles = Vec::new();
    for (index, value) in profile_list(obj).into_iter().flatten().enumerate() {
        let profile = profile_from_value(value, shape)
            .map_err(|reason| ConfigError::InvalidProfile { index, reason })?;
        profiles.push(profile);
    }

    let config = Configuration {
        current_profile: scalar(obj, "current_profile")
            .filter(|v| *v >= 1)
            .map_or(1, |v| usize::try_from(v).unwrap_or(0)),
        sensitivity_volume: clamp_sensitivity(
            scalar(obj, "sensitivity_volume").unwrap_or(0),
            DEFAULT_SENSITIVITY_VOLUME,
        ),
        sensitivity_scroll: clamp_sensitivity(
            scalar(obj, "sensitivity_scroll").unwrap_or(0),
            DEFAULT_SENSITIVITY_SCROLL,
        ),
        sensitivity_mouse: clamp_sensitivity(
            scalar(obj, "sensitivity_mouse").unwrap_or(0),
            DEFAULT_SENSITIVITY_MOUSE,
        ),
        profiles,
    };
    Ok(config.sanitize())
}

/// Parse JSON text and migrate it.
pub fn parse_str(text: &str) -> Result<Configuration, ConfigError> {
    let raw: Value = serde_json::from_str(text)?;
    migrate(&raw)
}

fn profile_list(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    obj.get("profiles")
        .and_then(Value::as_array)
        .filter(|p| p.len() >= MIN_PROFILES)
}

/// Every profile is an object with a well-formed action in all six slots.
fn slots_well_formed(profiles: &[Value]) -> bool {
    profiles.iter().all(|profile| {
        profile.as_object().is_some_and(|p| {
            GestureSlot::ALL
                .iter()
                .all(|slot| p.get(slot.key()).is_some_and(is_action_object))
        })
    })
}

fn scalar(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64)
}

fn is_action_object(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    match obj.get("type").and_then(Value::as_str) {
        Some("simple") => obj.get("action").is_some_and(Value::is_string),
        Some("macro") => obj
            .get("keys")
            .and_then(Value::as_array)
            .is_some_and(|keys| keys.iter().all(Value::is_string)),
        _ => false,
    }
}

fn profile_from_value(value: &Value, shape: SchemaShape) -> Result<Profile, String> {
    let obj = value.as_object().ok_or("profile is not an object")?;
    let mut profile = Profile::default();
    for slot in GestureSlot::ALL {
        let action = match obj.get(slot.key()) {
            Some(Value::String(name)) if shape == SchemaShape::BareNames => {
                ActionObject::simple(name)
            }
            Some(v) if is_action_object(v) => serde_json::from_value(v.clone())
                .map_err(|e| format!("{}: {e}", slot.key()))?,
            None if matches!(shape, SchemaShape::BareNames | SchemaShape::MissingShifted) => {
                ActionObject::nothing()
            }
            _ => return Err(format!("{}: malformed action", slot.key())),
        };
        *profile.slot_mut(slot) = action;
    }
    Ok(profile)
}
