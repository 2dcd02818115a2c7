//! The capture thread and the state it shares with the game loop.
//!
//! ```text
//!  pose-capture thread                         game loop (fixed tick)
//!  ───────────────────                         ──────────────────────
//!  camera.read_frame()
//!  estimator.estimate()
//!  classify() ─► gesture lock ─► GestureState ◄─ poll_* / is_*_held
//!  annotate() ─► frame lock   ─► DisplayFrame ◄─ latest_display_frame
//! ```
//!
//! The two locks are independent so publishing a frame never delays a
//! gesture read.  Every critical section is a handful of field copies; the
//! game loop never waits for camera progress.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::classifier::{classify, GestureLevels, GestureThresholds, InputMode};
use crate::device::{Camera, PoseEstimator};
use crate::error::{CaptureError, GestureError};
use crate::overlay::{annotate, DisplayFrame};
use crate::trigger::EdgeTrigger;

// ════════════════════════════════════════════════════════════════════════════
// GestureInput — what the game loop sees
// ════════════════════════════════════════════════════════════════════════════

/// Consumer-side view of gesture input.
///
/// All methods take `&self`; implementations use interior mutability so a
/// single-threaded game loop can hold a plain shared reference.
pub trait GestureInput {
    /// Rising edge of "jumping".  Consumed by the read.
    fn poll_jump_just_pressed(&self) -> bool;
    fn is_jump_held(&self) -> bool;
    fn is_duck_held(&self) -> bool;
    /// Rising edge of "hand raised".  Consumed by the read.
    fn poll_hand_raise_just_detected(&self) -> bool;
    /// Switch classification mode; effective from the next capture cycle.
    fn set_awaiting_reset(&self, awaiting: bool);
    /// Clear every level and trigger and return to [`InputMode::Normal`].
    fn reset(&self);
}

// ════════════════════════════════════════════════════════════════════════════
// CaptureConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub thresholds:          GestureThresholds,
    /// Pause after a failed camera read.
    pub retry_delay_ms:      u64,
    /// How long `shutdown` waits for the capture thread.
    pub shutdown_timeout_ms: u64,
    /// Flip the preview (and landmarks) into selfie view.
    pub mirror:              bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            thresholds:          GestureThresholds::default(),
            retry_delay_ms:      10,
            shutdown_timeout_ms: 1000,
            mirror:              true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// Latest classification plus the two one-shot triggers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureState {
    levels:     GestureLevels,
    jump:       EdgeTrigger,
    hand_raise: EdgeTrigger,
    mode:       InputMode,
}

impl GestureState {
    /// Fold one frame's levels in.
    fn apply(&mut self, levels: GestureLevels) {
        self.jump.update(levels.jumping);
        self.hand_raise.update(levels.hand_raised);
        self.levels = levels;
    }

    fn clear(&mut self) {
        *self = GestureState::default();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Shared — everything both threads touch
// ════════════════════════════════════════════════════════════════════════════

struct Shared {
    gesture:   Mutex<GestureState>,
    frame:     Mutex<Option<Arc<DisplayFrame>>>,
    /// The camera lives here so `shutdown` can release it even if the
    /// capture thread does not come back in time.
    device:    Mutex<Option<Box<dyn Camera>>>,
    running:   AtomicBool,
    processed: AtomicU64,
}

/// Poisoning only means the other thread panicked mid-update; the data is
/// plain bools and an `Arc` swap, so keep going with it.
fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn new(camera: Option<Box<dyn Camera>>) -> Self {
        Shared {
            gesture:   Mutex::new(GestureState::default()),
            frame:     Mutex::new(None),
            device:    Mutex::new(camera),
            running:   AtomicBool::new(true),
            processed: AtomicU64::new(0),
        }
    }

    fn publish(&self, levels: GestureLevels, display: DisplayFrame) {
        lock(&self.gesture).apply(levels);
        *lock(&self.frame) = Some(Arc::new(display));
        self.processed.fetch_add(1, Ordering::Release);
    }

    /// Drop the camera if nobody is mid-read.  Returns whether it was
    /// released by this call.
    fn release_device(&self, blocking: bool) -> bool {
        let slot = if blocking {
            Some(lock(&self.device))
        } else {
            match self.device.try_lock() {
                Ok(g) => Some(g),
                Err(std::sync::TryLockError::Poisoned(p)) => Some(p.into_inner()),
                Err(std::sync::TryLockError::WouldBlock) => None,
            }
        };
        match slot.and_then(|mut s| s.take()) {
            Some(camera) => {
                info!("[capture] releasing {}", camera.describe());
                drop(camera);
                true
            }
            None => false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInputSource
// ════════════════════════════════════════════════════════════════════════════

struct Worker {
    handle: JoinHandle<()>,
    done:   Receiver<()>,
}

/// Owns the capture thread and exposes its results to the game loop.
///
/// Call [`shutdown`](Self::shutdown) before exit; dropping the source does
/// the same.
pub struct GestureInputSource {
    shared:  Arc<Shared>,
    worker:  Mutex<Option<Worker>>,
    timeout: Duration,
}

impl GestureInputSource {
    /// Validate the config and start the `pose-capture` thread.
    pub fn spawn<E>(camera: Box<dyn Camera>, estimator: E, config: CaptureConfig) -> Result<Self, GestureError>
    where
        E: PoseEstimator + 'static,
    {
        config.thresholds.validate()?;
        info!("[capture] starting on {}", camera.describe());

        let shared = Arc::new(Shared::new(Some(camera)));
        let (done_tx, done_rx) = mpsc::channel();
        let timeout = Duration::from_millis(config.shutdown_timeout_ms);

        let loop_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("pose-capture".to_string())
            .spawn(move || capture_loop(loop_shared, estimator, config, done_tx))?;

        Ok(GestureInputSource {
            shared,
            worker: Mutex::new(Some(Worker { handle, done: done_rx })),
            timeout,
        })
    }

    /// Most recently published annotated frame, if any.
    pub fn latest_display_frame(&self) -> Option<Arc<DisplayFrame>> {
        lock(&self.shared.frame).clone()
    }

    /// Current levels (non-consuming).
    pub fn levels(&self) -> GestureLevels { lock(&self.shared.gesture).levels }

    pub fn mode(&self) -> InputMode { lock(&self.shared.gesture).mode }

    /// Number of completed capture cycles.
    pub fn frames_processed(&self) -> u64 { self.shared.processed.load(Ordering::Acquire) }

    pub fn is_running(&self) -> bool { self.shared.running.load(Ordering::Acquire) }

    /// Stop the capture thread and release the camera.  Safe to call more
    /// than once.
    pub fn shutdown(&self) {
        let Some(worker) = lock(&self.worker).take() else { return };
        self.shared.running.store(false, Ordering::Release);

        match worker.done.recv_timeout(self.timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if worker.handle.join().is_err() {
                    warn!("[capture] thread panicked");
                }
                // Normally already released by the loop itself.
                self.shared.release_device(true);
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("[capture] thread did not stop within {:?}; detaching", self.timeout);
                if !self.shared.release_device(false) {
                    warn!("[capture] camera busy; it will be released when the read returns");
                }
            }
        }
        info!("[capture] stopped");
    }
}

impl GestureInput for GestureInputSource {
    fn poll_jump_just_pressed(&self) -> bool {
        lock(&self.shared.gesture).jump.consume()
    }

    fn is_jump_held(&self) -> bool { lock(&self.shared.gesture).levels.jumping }

    fn is_duck_held(&self) -> bool { lock(&self.shared.gesture).levels.ducking }

    fn poll_hand_raise_just_detected(&self) -> bool {
        lock(&self.shared.gesture).hand_raise.consume()
    }

    fn set_awaiting_reset(&self, awaiting: bool) {
        lock(&self.shared.gesture).mode = if awaiting {
            InputMode::AwaitingReset
        } else {
            InputMode::Normal
        };
    }

    fn reset(&self) {
        lock(&self.shared.gesture).clear();
    }
}

impl Drop for GestureInputSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// capture_loop — runs on the pose-capture thread
// ════════════════════════════════════════════════════════════════════════════

/// Clears the running flag when the loop ends, including by panic.
struct ClearOnExit<'a>(&'a AtomicBool);

impl Drop for ClearOnExit<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn capture_loop<E: PoseEstimator>(
    shared:        Arc<Shared>,
    mut estimator: E,
    config:        CaptureConfig,
    done:          Sender<()>,
) {
    let exit = ClearOnExit(&shared.running);
    let retry = Duration::from_millis(config.retry_delay_ms);
    let mut failures = 0u64;
    let mut sequence = 0u64;

    while shared.running.load(Ordering::Acquire) {
        // ── read ──────────────────────────────────────────────────────────
        let read = {
            let mut slot = lock(&shared.device);
            match slot.as_mut() {
                Some(camera) => camera.read_frame(),
                None => break,
            }
        };
        let frame = match read {
            Ok(f) => {
                if failures > 0 {
                    debug!("[capture] camera recovered after {} failed reads", failures);
                }
                failures = 0;
                f
            }
            Err(e) => {
                if failures == 0 && e != CaptureError::NotReady {
                    warn!("[capture] {}; retrying", e);
                } else {
                    debug!("[capture] {}", e);
                }
                failures += 1;
                thread::sleep(retry);
                continue;
            }
        };

        // ── classify ──────────────────────────────────────────────────────
        let mode = lock(&shared.gesture).mode;
        let observation = match estimator.estimate(&frame) {
            Ok(obs) => obs,
            Err(e) => {
                debug!("[capture] {}; treating frame as neutral", e);
                None
            }
        };
        let levels = classify(observation.as_ref(), &config.thresholds, mode);

        // ── annotate + publish ────────────────────────────────────────────
        sequence += 1;
        let (image, observation) = if config.mirror {
            (frame.mirrored(), observation.map(|o| o.mirrored()))
        } else {
            (frame, observation)
        };
        let display = annotate(image, observation.as_ref(), levels, mode, &config.thresholds, sequence);
        shared.publish(levels, display);
    }

    shared.release_device(true);
    drop(exit);
    let _ = done.send(());
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
