//! Encoder sampling on a dedicated thread.
//!
//! The control loop blocks for the whole of a repeat burst (up to a few tens
//! of milliseconds of spacing delays), and a polled quadrature decoder that
//! is only sampled by the loop misses edges in that time. [`SampledEncoder`]
//! moves the decoder onto its own thread that samples at a fixed short
//! period and publishes the latest position and button level.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::traits::EncoderInput;

/// Sampling period used by the firmware.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(1);

const SAMPLER_STACK_SIZE: usize = 8 * 1024;

struct Shared {
    position: AtomicI32,
    pressed: AtomicBool,
    stop: AtomicBool,
}

/// An [`EncoderInput`] read by a background thread.
///
/// Dropping it stops and joins the thread.
pub struct SampledEncoder {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl SampledEncoder {
    /// Move `inner` onto a sampling thread that reads it every `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<E>(mut inner: E, period: Duration) -> io::Result<Self>
    where
        E: EncoderInput + Send + 'static,
    {
        let shared = Arc::new(Shared {
            position: AtomicI32::new(inner.position()),
            pressed: AtomicBool::new(inner.button_pressed()),
            stop: AtomicBool::new(false),
        });

        let state = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("encoder".into())
            .stack_size(SAMPLER_STACK_SIZE)
            .spawn(move || {
                while !state.stop.load(Ordering::Relaxed) {
                    state.position.store(inner.position(), Ordering::Relaxed);
                    state.pressed.store(inner.button_pressed(), Ordering::Relaxed);
                    thread::sleep(period);
                }
                debug!("encoder sampler stopped");
            })?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }
}

impl EncoderInput for SampledEncoder {
    fn position(&mut self) -> i32 {
        self.shared.position.load(Ordering::Relaxed)
    }

    fn button_pressed(&mut self) -> bool {
        self.shared.pressed.load(Ordering::Relaxed)
    }
}

impl Drop for SampledEncoder {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    /// Encoder whose readings the test changes from outside the sampler.
    #[derive(Clone, Default)]
    struct SharedEncoder {
        position: Arc<AtomicI32>,
        pressed: Arc<AtomicBool>,
        reads: Arc<AtomicI32>,
    }

    impl EncoderInput for SharedEncoder {
        fn position(&mut self) -> i32 {
            self.reads.fetch_add(1, Ordering::Relaxed);
            self.position.load(Ordering::Relaxed)
        }

        fn button_pressed(&mut self) -> bool {
            self.pressed.load(Ordering::Relaxed)
        }
    }

    fn wait_until(mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn starts_from_current_reading() {
        let inner = SharedEncoder::default();
        inner.position.store(7, Ordering::Relaxed);
        let mut enc = SampledEncoder::spawn(inner, DEFAULT_SAMPLE_PERIOD).unwrap();
        assert_eq!(enc.position(), 7);
        assert!(!enc.button_pressed());
    }

    #[test]
    fn follows_inner_without_being_polled() {
        let inner = SharedEncoder::default();
        let mut enc = SampledEncoder::spawn(inner.clone(), DEFAULT_SAMPLE_PERIOD).unwrap();

        inner.position.store(-3, Ordering::Relaxed);
        inner.pressed.store(true, Ordering::Relaxed);

        assert!(wait_until(|| enc.position() == -3 && enc.button_pressed()));
    }

    #[test]
    fn drop_stops_sampling() {
        let inner = SharedEncoder::default();
        let enc = SampledEncoder::spawn(inner.clone(), DEFAULT_SAMPLE_PERIOD).unwrap();
        assert!(wait_until(|| inner.reads.load(Ordering::Relaxed) > 2));

        drop(enc);
        let after_drop = inner.reads.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(inner.reads.load(Ordering::Relaxed), after_drop);
    }
}
