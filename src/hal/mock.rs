//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every hardware seam, so the
//! gesture machine, dispatcher and controller run on the desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockEncoder`] | [`EncoderInput`] | Settable position and button level |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockHid`] | [`HidTransport`] | Records every HID write, optional failures |
//! | [`MockChannel`] | [`CommandChannel`] | Queued host bytes |
//! | [`MockReset`] | [`SystemReset`] | Counts reset requests |
//! | [`MockDelay`] | [`DelayNs`] | Records delays without sleeping |
//! | [`MockConfigSource`] | [`ConfigSource`] | In-memory configuration file |
//!
//! # Example
//!
//! ```rust
//! use rs_knob::config::{Configuration, GestureSlot};
//! use rs_knob::dispatch::Dispatcher;
//! use rs_knob::hal::{HidEvent, MockDelay, MockHid};
//! use rs_knob::keycodes::ConsumerCode;
//! use rs_knob::state::RuntimeState;
//!
//! let mut state = RuntimeState::new(Configuration::default());
//! let mut hid = MockHid::new();
//! let mut delay = MockDelay::new();
//!
//! Dispatcher::new().dispatch(GestureSlot::Click, &mut state, &mut hid, &mut delay);
//!
//! assert_eq!(hid.events, vec![HidEvent::Consumer(ConsumerCode::MUTE)]);
//! ```
//!
//! [`EncoderInput`]: crate::traits::EncoderInput
//! [`Clock`]: crate::traits::Clock
//! [`HidTransport`]: crate::traits::HidTransport
//! [`CommandChannel`]: crate::traits::CommandChannel
//! [`SystemReset`]: crate::traits::SystemReset
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//! [`ConfigSource`]: crate::config::ConfigSource

use embedded_hal::delay::DelayNs;

use crate::config::ConfigSource;
use crate::error::ConfigError;
use crate::keycodes::{ConsumerCode, Keycode};
use crate::traits::{Clock, CommandChannel, EncoderInput, HidTransport, MouseButton, SystemReset};

// ============================================================================
// Input Mocks
// ============================================================================

/// Mock encoder for testing.
///
/// Holds an absolute position and a button level. Tests move the knob by
/// setting the position directly or with [`MockEncoder::rotate`].
///
/// # Example
///
/// ```rust
/// use rs_knob::hal::MockEncoder;
/// use rs_knob::traits::EncoderInput;
///
/// let mut encoder = MockEncoder::new();
/// encoder.rotate(2);
/// encoder.rotate(-5);
/// assert_eq!(encoder.position(), -3);
///
/// encoder.set_button(true);
/// assert!(encoder.button_pressed());
/// ```
#[derive(Debug, Default)]
pub struct MockEncoder {
    /// Absolute detent count.
    pub position: i32,
    /// Button level.
    pub pressed: bool,
    /// Number of times `position()` was read.
    pub reads: usize,
}

impl MockEncoder {
    /// Creates an encoder at position 0 with the button released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute position.
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    /// Turn by `detents` (positive is clockwise).
    pub fn rotate(&mut self, detents: i32) {
        self.position += detents;
    }

    /// Set the button level.
    pub fn set_button(&mut self, pressed: bool) {
        self.pressed = pressed;
    }
}

impl EncoderInput for MockEncoder {
    fn position(&mut self) -> i32 {
        self.reads += 1;
        self.position
    }

    fn button_pressed(&mut self) -> bool {
        self.pressed
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for testing time-dependent behavior.
///
/// # Example
///
/// ```rust
/// use rs_knob::hal::MockClock;
/// use rs_knob::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Output Mocks
// ============================================================================

/// One recorded HID write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HidEvent {
    Consumer(ConsumerCode),
    Press(Vec<Keycode>),
    ReleaseAll,
    MouseMove { x: i8, y: i8, wheel: i8, pan: i8 },
    Click(MouseButton),
}

/// Mock HID transport.
///
/// Successful writes are appended to [`MockHid::events`]; failed writes
/// record nothing.
///
/// # Example
///
/// ```rust
/// use rs_knob::hal::{HidEvent, MockHid};
/// use rs_knob::keycodes::Keycode;
/// use rs_knob::traits::HidTransport;
///
/// let mut hid = MockHid::new();
/// hid.send_keys(&[Keycode::LEFT_CONTROL, Keycode::Z]).unwrap();
/// assert_eq!(
///     hid.events,
///     vec![
///         HidEvent::Press(vec![Keycode::LEFT_CONTROL, Keycode::Z]),
///         HidEvent::ReleaseAll,
///     ]
/// );
///
/// hid.fail_after = Some(2);
/// assert!(hid.release_all().is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockHid {
    /// Writes in order.
    pub events: Vec<HidEvent>,
    /// Fail every `press_keys` call.
    pub fail_press: bool,
    /// Fail every write once this many events have been recorded.
    pub fail_after: Option<usize>,
}

impl MockHid {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a consumer usage was sent.
    pub fn consumer_count(&self, code: ConsumerCode) -> usize {
        self.events
            .iter()
            .filter(|e| **e == HidEvent::Consumer(code))
            .count()
    }

    /// Forget recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: HidEvent) -> Result<(), ()> {
        if self.fail_after.is_some_and(|n| self.events.len() >= n) {
            return Err(());
        }
        self.events.push(event);
        Ok(())
    }
}

impl HidTransport for MockHid {
    type Error = ();

    fn send_consumer(&mut self, code: ConsumerCode) -> Result<(), ()> {
        self.record(HidEvent::Consumer(code))
    }

    fn press_keys(&mut self, keys: &[Keycode]) -> Result<(), ()> {
        if self.fail_press {
            return Err(());
        }
        self.record(HidEvent::Press(keys.to_vec()))
    }

    fn release_all(&mut self) -> Result<(), ()> {
        self.record(HidEvent::ReleaseAll)
    }

    fn mouse_move(&mut self, x: i8, y: i8, wheel: i8, pan: i8) -> Result<(), ()> {
        self.record(HidEvent::MouseMove { x, y, wheel, pan })
    }

    fn mouse_click(&mut self, button: MouseButton) -> Result<(), ()> {
        self.record(HidEvent::Click(button))
    }
}

// ============================================================================
// Platform Mocks
// ============================================================================

/// Mock command channel.
///
/// Bytes pushed by the test are returned by the next read, all at once.
#[derive(Debug, Default)]
pub struct MockChannel {
    /// Bytes waiting to be read.
    pub pending: Vec<u8>,
    /// Fail every read.
    pub fail: bool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes from the host.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }
}

impl CommandChannel for MockChannel {
    type Error = ();

    fn read_available(&mut self, buf: &mut Vec<u8>) -> Result<usize, ()> {
        if self.fail {
            return Err(());
        }
        let n = self.pending.len();
        buf.append(&mut self.pending);
        Ok(n)
    }
}

/// Mock platform reset. Counts calls and returns.
#[derive(Debug, Default)]
pub struct MockReset {
    pub count: usize,
}

impl MockReset {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SystemReset for MockReset {
    fn reset(&mut self) {
        self.count += 1;
    }
}

/// Mock delay. Records each millisecond delay and never sleeps.
///
/// # Example
///
/// ```rust
/// use embedded_hal::delay::DelayNs;
/// use rs_knob::hal::MockDelay;
///
/// let mut delay = MockDelay::new();
/// delay.delay_ms(15);
/// delay.delay_us(500);
/// assert_eq!(delay.calls_ms, vec![15]);
/// assert_eq!(delay.total_ns, 15_500_000);
/// ```
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Arguments of every `delay_ms` call.
    pub calls_ms: Vec<u32>,
    /// Sum of all requested delays.
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in whole milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls_ms.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// In-memory configuration file.
#[derive(Debug, Default)]
pub struct MockConfigSource {
    /// File contents; `None` means no file.
    pub contents: Option<Vec<u8>>,
    /// Number of reads.
    pub reads: usize,
}

impl MockConfigSource {
    /// A source with no file.
    pub fn missing() -> Self {
        Self::default()
    }

    /// A source holding `text`.
    pub fn with_text(text: &str) -> Self {
        Self::with_bytes(text.as_bytes())
    }

    /// A source holding raw bytes.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            contents: Some(bytes.to_vec()),
            reads: 0,
        }
    }
}

impl ConfigSource for MockConfigSource {
    fn read_config(&mut self) -> Result<Vec<u8>, ConfigError> {
        self.reads += 1;
        self.contents
            .clone()
            .ok_or_else(|| ConfigError::NotFound("<memory>".into()))
    }
}

// ============================================================================
// Tests
// ============================================================================
