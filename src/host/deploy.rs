//! Writing the configuration to the device and asking it to reboot.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::{normalize_macros, DeviceLocator, CONFIG_FILE_NAME, REBOOT_COMMAND};
use crate::config::Configuration;
use crate::error::HostError;
use crate::usb_ids;

/// Write `config` to `<mount>/profiles.json`.
///
/// The `current_profile` already on the device is kept, so deploying new
/// bindings does not move the user off the profile they were on. Macro key
/// names are normalized. The file is written to a temporary file in the same
/// directory and renamed over the old one, so a failed write leaves the old
/// file untouched.
///
/// Returns the path written.
pub fn deploy(config: &Configuration, mount: &Path) -> Result<PathBuf, HostError> {
    let path = mount.join(CONFIG_FILE_NAME);

    let mut out = normalize_macros(config.clone());
    if let Some(current) = existing_current_profile(&path) {
        out.current_profile = current;
    }
    let json = out.to_json_pretty()?;

    let write_err = |source| HostError::Write {
        path: path.display().to_string(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(mount).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), current_profile = out.current_profile, "configuration written");
    Ok(path)
}

/// `current_profile` from an existing device file, if it has a usable one.
fn existing_current_profile(path: &Path) -> Option<usize> {
    let bytes = std::fs::read(path).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let current = value.get("current_profile")?.as_u64()?;
    usize::try_from(current).ok().filter(|&n| n >= 1)
}

/// Write `REBOOT\n` to the device's control port.
pub fn send_reboot(port: &Path) -> Result<(), HostError> {
    let reboot_err = |source| HostError::Reboot {
        port: port.display().to_string(),
        source,
    };
    let mut serial = OpenOptions::new().write(true).open(port).map_err(reboot_err)?;
    serial.write_all(REBOOT_COMMAND).map_err(reboot_err)?;
    serial.flush().map_err(reboot_err)?;
    info!(port = %port.display(), "reboot sent");
    Ok(())
}

/// What happened after the file was written.
#[derive(Debug, PartialEq, Eq)]
pub enum RebootStatus {
    /// `REBOOT` went out on this port.
    Sent(PathBuf),
    /// No control port found; the device picks the file up on its next boot.
    NoPort,
    /// The port was found but the write failed.
    Failed(String),
}

/// Outcome of [`deploy_and_reboot`].
#[derive(Debug)]
pub struct DeployReport {
    pub path: PathBuf,
    pub reboot: RebootStatus,
}

/// Locate the device, deploy, wait `settle` for the storage to flush, then
/// request a reboot.
///
/// Only a failure to write the file is an error. A missing or unwritable
/// control port is reported in [`DeployReport::reboot`]; the new file is in
/// place either way.
pub fn deploy_and_reboot<L: DeviceLocator + ?Sized>(
    config: &Configuration,
    locator: &L,
    settle: Duration,
) -> Result<DeployReport, HostError> {
    let mount = locator.storage_mount().ok_or(HostError::StorageNotFound)?;
    let path = deploy(config, &mount)?;

    if !settle.is_zero() {
        std::thread::sleep(settle);
    }

    let reboot = match locator.control_port(usb_ids::VENDOR_ID, usb_ids::PRODUCT_ID) {
        None => {
            info!("no control port, new configuration applies on next boot");
            RebootStatus::NoPort
        }
        Some(port) => match send_reboot(&port) {
            Ok(()) => RebootStatus::Sent(port),
            Err(e) => {
                warn!(error = %e, "saved, but reboot failed");
                RebootStatus::Failed(e.to_string())
            }
        },
    };

    Ok(DeployReport { path, reboot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, ActionObject, GestureSlot};
    use crate::host::FixedLocator;

    #[test]
    fn deploy_writes_current_format() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::default().with_sensitivity_scroll(3);

        let path = deploy(&config, dir.path()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schema_version"], 3);
        assert_eq!(parse_str(&text).unwrap(), config);
    }

    #[test]
    fn deploy_keeps_device_current_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"current_profile": 3, "profiles": []}"#).unwrap();

        deploy(&Configuration::default().with_current_profile(1), dir.path()).unwrap();

        let written = parse_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.current_profile, 3);
    }

    #[test]
    fn deploy_ignores_unreadable_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "garbage").unwrap();

        deploy(&Configuration::default().with_current_profile(2), dir.path()).unwrap();

        let written = parse_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.current_profile, 2);
    }

    #[test]
    fn deploy_normalizes_macros() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::default().with_binding(
            1,
            GestureSlot::Click,
            ActionObject::keys(&["ctrl", "esc"]),
        );

        let path = deploy(&config, dir.path()).unwrap();

        let written = parse_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written.profiles[0].click,
            ActionObject::keys(&["LEFT_CONTROL", "ESCAPE"])
        );
    }

    #[test]
    fn deploy_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let err = deploy(&Configuration::default(), &dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, HostError::Write { .. }));
    }

    #[test]
    fn send_reboot_writes_command() {
        let dir = tempfile::tempdir().unwrap();
        let port = dir.path().join("tty");
        std::fs::write(&port, b"").unwrap();

        send_reboot(&port).unwrap();

        assert_eq!(std::fs::read(&port).unwrap(), b"REBOOT\n");
    }

    #[test]
    fn send_reboot_missing_port() {
        let dir = tempfile::tempdir().unwrap();
        let err = send_reboot(&dir.path().join("no-such-port")).unwrap_err();
        assert!(matches!(err, HostError::Reboot { .. }));
    }

    #[test]
    fn deploy_and_reboot_without_port() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FixedLocator::new().with_storage(dir.path());

        let report =
            deploy_and_reboot(&Configuration::default(), &locator, Duration::ZERO).unwrap();

        assert_eq!(report.reboot, RebootStatus::NoPort);
        assert!(report.path.exists());
    }

    #[test]
    fn deploy_and_reboot_with_port() {
        let dir = tempfile::tempdir().unwrap();
        let port = dir.path().join("tty");
        std::fs::write(&port, b"").unwrap();
        let locator = FixedLocator::new().with_storage(dir.path()).with_port(&port);

        let report =
            deploy_and_reboot(&Configuration::default(), &locator, Duration::ZERO).unwrap();

        assert_eq!(report.reboot, RebootStatus::Sent(port.clone()));
        assert_eq!(std::fs::read(&port).unwrap(), b"REBOOT\n");
    }

    #[test]
    fn deploy_and_reboot_needs_storage() {
        let err = deploy_and_reboot(&Configuration::default(), &FixedLocator::new(), Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, HostError::StorageNotFound));
    }
}
