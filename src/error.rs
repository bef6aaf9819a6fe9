//! Error types.
//!
//! Firmware-side errors are all recoverable: the controller logs them and
//! carries on. The only fatal condition (HID transport init) lives in the
//! firmware binary. [`HostError`] is surfaced to the user by the host tools.

use thiserror::Error;

/// Configuration read, parse or shape failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file exists.
    #[error("configuration file not found: {0}")]
    NotFound(String),

    /// Storage read failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON.
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Top-level JSON value is not an object.
    #[error("configuration root is not a JSON object")]
    NotAnObject,

    /// Neither the current layout nor a known legacy layout.
    #[error("configuration layout not recognized")]
    Unrecognized,

    /// A profile entry could not be converted.
    #[error("profile {index}: {reason}")]
    InvalidProfile { index: usize, reason: String },
}

/// Command channel failure.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The underlying channel reported an error.
    #[error("command channel read failed: {0}")]
    Read(String),

    /// Received bytes are not UTF-8.
    #[error("command is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),
}

/// Host-side deploy or reboot failure.
#[derive(Debug, Error)]
pub enum HostError {
    /// No device storage mount could be located.
    #[error("device storage not found")]
    StorageNotFound,

    /// Writing the configuration file failed. The previous file is intact.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Opening or writing the control port failed.
    #[error("failed to send reboot to {port}: {source}")]
    Reboot {
        port: String,
        #[source]
        source: std::io::Error,
    },
}
