//! Host command side channel.
//!
//! The host tool writes `REBOOT\n` over the serial data channel after saving
//! a new configuration. Each poll drains whatever bytes are buffered and
//! treats them as one command: decoded as UTF-8, trimmed and compared
//! case-insensitively. Anything else is logged and ignored.
//!
//! ```rust
//! use rs_knob::command::{parse_command, Command};
//!
//! assert_eq!(parse_command(b"reboot\r\n").unwrap(), Some(Command::Reboot));
//! assert_eq!(parse_command(b"   ").unwrap(), None);
//! ```

use embedded_hal::delay::DelayNs;
use tracing::{info, warn};

use crate::error::CommandError;
use crate::traits::{CommandChannel, SystemReset};

/// Pause between accepting `REBOOT` and resetting, so the host sees the
/// write complete before the device drops off the bus.
pub const REBOOT_GRACE_MS: u32 = 500;

/// A decoded host command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Restart the device so it reloads its configuration.
    Reboot,
    /// Anything else, trimmed.
    Unknown(String),
}

/// Decode a chunk of channel bytes. Blank input is `Ok(None)`.
pub fn parse_command(bytes: &[u8]) -> Result<Option<Command>, CommandError> {
    let text = std::str::from_utf8(bytes)?.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.eq_ignore_ascii_case("REBOOT") {
        Ok(Some(Command::Reboot))
    } else {
        Ok(Some(Command::Unknown(text.to_owned())))
    }
}

/// Polls a [`CommandChannel`] and acts on what arrives.
#[derive(Debug)]
pub struct CommandHandler {
    buf: Vec<u8>,
    grace_ms: u32,
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            grace_ms: REBOOT_GRACE_MS,
        }
    }
}

impl CommandHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the pre-reset pause.
    pub fn with_grace_ms(mut self, ms: u32) -> Self {
        self.grace_ms = ms;
        self
    }

    /// Drain the channel once. Returns the command that was handled, if any.
    ///
    /// On `REBOOT` this waits the grace period and calls
    /// [`SystemReset::reset`], which does not return on hardware.
    pub fn poll<C, D, R>(&mut self, channel: &mut C, delay: &mut D, reset: &mut R) -> Option<Command>
    where
        C: CommandChannel + ?Sized,
        D: DelayNs + ?Sized,
        R: SystemReset + ?Sized,
    {
        self.buf.clear();
        match channel.read_available(&mut self.buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %CommandError::Read(format!("{e:?}")), "dropping command input");
                return None;
            }
        }

        match parse_command(&self.buf) {
            Ok(Some(Command::Reboot)) => {
                info!(grace_ms = self.grace_ms, "reboot requested by host");
                delay.delay_ms(self.grace_ms);
                reset.reset();
                Some(Command::Reboot)
            }
            Ok(Some(Command::Unknown(text))) => {
                warn!(command = %text, "ignoring unknown command");
                Some(Command::Unknown(text))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "dropping command input");
                None
            }
        }
    }
}
