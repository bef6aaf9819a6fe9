//! Loading the configuration from persistent storage.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{migrate, Configuration, SchemaShape};
use crate::error::ConfigError;

/// Persistent storage holding the configuration file.
pub trait ConfigSource {
    /// Read the raw file contents.
    ///
    /// Returns [`ConfigError::NotFound`] when no file exists.
    fn read_config(&mut self) -> Result<Vec<u8>, ConfigError>;
}

/// Configuration file on a filesystem path.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading from `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn read_config(&mut self) -> Result<Vec<u8>, ConfigError> {
        std::fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(self.path.display().to_string()),
            _ => ConfigError::Io(e),
        })
    }
}

/// How the effective configuration was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read in the current layout.
    Current,
    /// Read in an older layout and upgraded.
    Migrated(SchemaShape),
    /// Built-in defaults; the string says why.
    Default(String),
}

/// A loaded configuration and where it came from.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: Configuration,
    pub origin: ConfigOrigin,
}

/// Load, migrate and sanitize the configuration. Never fails.
pub fn load<S: ConfigSource + ?Sized>(source: &mut S) -> Configuration {
    load_detailed(source).config
}

/// Like [`load`], also reporting whether migration or fallback happened.
pub fn load_detailed<S: ConfigSource + ?Sized>(source: &mut S) -> LoadedConfig {
    match try_load(source) {
        Ok((config, SchemaShape::Current)) => {
            info!(profiles = config.profiles.len(), "loaded configuration");
            LoadedConfig {
                config,
                origin: ConfigOrigin::Current,
            }
        }
        Ok((config, shape)) => {
            info!(?shape, "upgraded configuration from older layout");
            LoadedConfig {
                config,
                origin: ConfigOrigin::Migrated(shape),
            }
        }
        Err(e) => {
            warn!(error = %e, "using default configuration");
            LoadedConfig {
                config: Configuration::default(),
                origin: ConfigOrigin::Default(e.to_string()),
            }
        }
    }
}

fn try_load<S: ConfigSource + ?Sized>(
    source: &mut S,
) -> Result<(Configuration, SchemaShape), ConfigError> {
    let bytes = source.read_config()?;
    let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
    let shape = super::detect_shape(&raw).ok_or(ConfigError::Unrecognized)?;
    Ok((migrate(&raw)?, shape))
}
