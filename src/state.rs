//! Runtime state owned by the control loop.
//!
//! Holds the loaded [`Configuration`] and the active profile. The active
//! profile is the only thing that changes at runtime, and only through
//! [`RuntimeState::next_profile`] and [`RuntimeState::switch_profile`]. The
//! change lives in memory; host tools own writes to storage.

use tracing::{info, warn};

use crate::config::{ActionObject, Configuration, GestureSlot, Profile};

/// Configuration plus the active profile index.
#[derive(Clone, Debug)]
pub struct RuntimeState {
    config: Configuration,
    /// Zero-based.
    active: usize,
}

impl RuntimeState {
    /// Wrap a configuration. It is sanitized first, so the active profile
    /// always indexes a real profile.
    pub fn new(config: Configuration) -> Self {
        let config = config.sanitize();
        let active = config.current_profile - 1;
        Self { config, active }
    }

    /// The configuration, with `current_profile` tracking the active profile.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Zero-based active profile index.
    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Number of profiles.
    #[inline]
    pub fn profile_count(&self) -> usize {
        self.config.profiles.len()
    }

    /// The active profile.
    pub fn active_profile(&self) -> &Profile {
        &self.config.profiles[self.active]
    }

    /// Binding for a gesture in the active profile.
    pub fn binding(&self, slot: GestureSlot) -> &ActionObject {
        self.active_profile().slot(slot)
    }

    /// Advance to the next profile, wrapping to the first.
    pub fn next_profile(&mut self) {
        let next = (self.active + 1) % self.profile_count();
        self.set_active(next);
    }

    /// Jump to a zero-based profile index. Out-of-range targets are ignored.
    ///
    /// Returns whether the switch happened.
    pub fn switch_profile(&mut self, index: usize) -> bool {
        if index < self.profile_count() {
            self.set_active(index);
            true
        } else {
            warn!(target_profile = index + 1, "no such profile, ignoring switch");
            false
        }
    }

    fn set_active(&mut self, index: usize) {
        self.active = index;
        self.config.current_profile = index + 1;
        info!(profile = index + 1, "switched profile");
    }
}
