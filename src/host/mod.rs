//! Host-side tooling: find the device, write its configuration, reboot it.
//!
//! The device exposes two things to the host: a storage mount holding
//! `profiles.json` and a serial control port that accepts `REBOOT\n`. How
//! they are discovered is platform specific, so discovery sits behind
//! [`DeviceLocator`]; [`FixedLocator`] takes explicit paths.
//!
//! # Example
//!
//! ```rust
//! use rs_knob::config::Configuration;
//! use rs_knob::host::{deploy, FixedLocator, DeviceLocator};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let locator = FixedLocator::new().with_storage(dir.path());
//!
//! let mount = locator.storage_mount().unwrap();
//! let written = deploy(&Configuration::default(), &mount).unwrap();
//! assert!(written.ends_with("profiles.json"));
//! ```

mod deploy;

use std::path::{Path, PathBuf};

pub use deploy::{deploy, deploy_and_reboot, send_reboot, DeployReport, RebootStatus};
pub use crate::error::HostError;
pub use crate::usb_ids;

use crate::config::{ActionObject, Configuration};

/// File name of the configuration on the device storage.
pub const CONFIG_FILE_NAME: &str = "profiles.json";

/// Bytes written to the control port to request a reboot.
pub const REBOOT_COMMAND: &[u8] = b"REBOOT\n";

/// Finds the device's storage mount and control port.
pub trait DeviceLocator {
    /// Directory where the device storage is mounted.
    fn storage_mount(&self) -> Option<PathBuf>;

    /// Serial port of the device with these USB identifiers.
    fn control_port(&self, vid: u16, pid: u16) -> Option<PathBuf>;
}

/// Locator over paths supplied by the user.
#[derive(Clone, Debug, Default)]
pub struct FixedLocator {
    storage: Option<PathBuf>,
    port: Option<PathBuf>,
}

impl FixedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` as the storage mount. Ignored if it is not a directory.
    pub fn with_storage(mut self, path: impl AsRef<Path>) -> Self {
        self.storage = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use `path` as the control port.
    pub fn with_port(mut self, path: impl AsRef<Path>) -> Self {
        self.port = Some(path.as_ref().to_path_buf());
        self
    }
}

impl DeviceLocator for FixedLocator {
    fn storage_mount(&self) -> Option<PathBuf> {
        self.storage.clone().filter(|p| p.is_dir())
    }

    fn control_port(&self, vid: u16, pid: u16) -> Option<PathBuf> {
        if usb_ids::matches(vid, pid) {
            self.port.clone()
        } else {
            None
        }
    }
}

/// Canonical key name for a user-typed one.
///
/// Trims, upper-cases and maps common aliases (`CTRL` → `LEFT_CONTROL`,
/// `ESC` → `ESCAPE`, `UP` → `UP_ARROW`, ...). Unknown names pass through
/// upper-cased; the device drops names it cannot resolve.
pub fn normalize_key_name(name: &str) -> String {
    let key = name.trim().to_ascii_uppercase();
    let canonical = match key.as_str() {
        "CONTROL" | "CTRL" => "LEFT_CONTROL",
        "SHIFT" => "LEFT_SHIFT",
        "ALT" | "ALT_GR" => "LEFT_ALT",
        "WIN" | "CMD" | "WINDOWS" | "COMMAND" => "LEFT_GUI",
        "DEL" => "DELETE",
        "ESC" => "ESCAPE",
        "UP" => "UP_ARROW",
        "DOWN" => "DOWN_ARROW",
        "LEFT" => "LEFT_ARROW",
        "RIGHT" => "RIGHT_ARROW",
        _ => return key,
    };
    canonical.to_owned()
}

/// Normalize every macro key and drop blank entries.
pub fn normalize_macros(mut config: Configuration) -> Configuration {
    for profile in &mut config.profiles {
        for slot in crate::config::GestureSlot::ALL {
            if let ActionObject::Macro { keys } = profile.slot_mut(slot) {
                *keys = keys
                    .iter()
                    .filter(|k| !k.trim().is_empty())
                    .map(|k| normalize_key_name(k))
                    .collect();
            }
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureSlot;

    #[test]
    fn normalize_aliases() {
        assert_eq!(normalize_key_name(" ctrl "), "LEFT_CONTROL");
        assert_eq!(normalize_key_name("Command"), "LEFT_GUI");
        assert_eq!(normalize_key_name("alt_gr"), "LEFT_ALT");
        assert_eq!(normalize_key_name("esc"), "ESCAPE");
        assert_eq!(normalize_key_name("left"), "LEFT_ARROW");
        assert_eq!(normalize_key_name("f5"), "F5");
        assert_eq!(normalize_key_name("PAGE_UP"), "PAGE_UP");
    }

    #[test]
    fn normalized_names_resolve_on_device() {
        use crate::keycodes::keycode_of;
        for alias in ["ctrl", "shift", "alt", "win", "del", "esc", "up", "down", "left", "right"] {
            let name = normalize_key_name(alias);
            assert!(keycode_of(&name).is_some(), "{alias} -> {name}");
        }
    }

    #[test]
    fn normalize_macros_rewrites_keys() {
        let config = Configuration::default().with_binding(
            2,
            GestureSlot::Click,
            ActionObject::keys(&["ctrl", " ", "shift", "t"]),
        );
        let config = normalize_macros(config);
        assert_eq!(
            config.profiles[1].click,
            ActionObject::keys(&["LEFT_CONTROL", "LEFT_SHIFT", "T"])
        );
        assert_eq!(config.profiles[0].cw, ActionObject::simple("volume_up"));
    }

    #[test]
    fn fixed_locator_checks_ids() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FixedLocator::new()
            .with_storage(dir.path())
            .with_port("/dev/ttyACM0");
        assert_eq!(locator.storage_mount().as_deref(), Some(dir.path()));
        assert_eq!(
            locator.control_port(usb_ids::VENDOR_ID, usb_ids::PRODUCT_ID),
            Some(PathBuf::from("/dev/ttyACM0"))
        );
        assert_eq!(locator.control_port(0x2E8A, 0x000A), None);
    }

    #[test]
    fn deployed_file_is_the_one_the_device_loads() {
        use crate::config::{load_detailed, ConfigOrigin, FileSource, DEVICE_CONFIG_PATH};

        let device_file = Path::new(DEVICE_CONFIG_PATH);
        assert_eq!(
            device_file.file_name().and_then(|n| n.to_str()),
            Some(CONFIG_FILE_NAME)
        );

        // The drive root on the host is the device's mount point.
        let drive = tempfile::tempdir().unwrap();
        let config = Configuration::default().with_sensitivity_mouse(7);
        deploy(&config, drive.path()).unwrap();

        let on_device = drive.path().join(device_file.strip_prefix("/data").unwrap());
        let loaded = load_detailed(&mut FileSource::new(on_device));
        assert_eq!(loaded.origin, ConfigOrigin::Current);
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn fixed_locator_rejects_missing_storage() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FixedLocator::new().with_storage(dir.path().join("nope"));
        assert_eq!(locator.storage_mount(), None);
        assert_eq!(FixedLocator::new().control_port(usb_ids::VENDOR_ID, usb_ids::PRODUCT_ID), None);
    }
}
