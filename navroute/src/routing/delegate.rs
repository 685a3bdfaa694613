//! Engine-facing request delegate.
//!
//! A [`RouterDelegate`] travels with one request into the engine. The
//! engine polls `is_cancelled()` between search expansions and reports
//! progress (and, in debug builds, candidate points) through it. The
//! delegate proxy owns the delegate and wires the listeners back to
//! itself.

use crate::coord::PointD;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub(crate) type ProgressListener = Box<dyn Fn(f32) + Send + Sync>;
pub(crate) type PointListener = Box<dyn Fn(PointD) + Send + Sync>;

/// Cancellation, timeout, and in-flight event channel for one engine run.
pub struct RouterDelegate {
    cancelled: AtomicBool,
    /// Armed once a non-zero timeout is set; folded into `is_cancelled`
    deadline: Mutex<Option<Instant>>,
    progress: Mutex<Option<ProgressListener>>,
    point_check: Mutex<Option<PointListener>>,
}

impl RouterDelegate {
    pub(crate) fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            deadline: Mutex::new(None),
            progress: Mutex::new(None),
            point_check: Mutex::new(None),
        }
    }

    /// Arms the wall-clock deadline; a timeout of zero disarms it and the
    /// engine runs until it finishes or is cancelled.
    pub(crate) fn set_timeout(&self, timeout_secs: u32) {
        let mut deadline = self.deadline.lock().unwrap();
        *deadline = if timeout_secs == 0 {
            None
        } else {
            Some(Instant::now() + Duration::from_secs(u64::from(timeout_secs)))
        };
    }

    pub(crate) fn set_progress_listener(&self, listener: ProgressListener) {
        *self.progress.lock().unwrap() = Some(listener);
    }

    pub(crate) fn set_point_check_listener(&self, listener: PointListener) {
        *self.point_check.lock().unwrap() = Some(listener);
    }

    /// Clears the cancellation flag, deadline, and listeners.
    pub(crate) fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
        *self.deadline.lock().unwrap() = None;
        *self.progress.lock().unwrap() = None;
        *self.point_check.lock().unwrap() = None;
    }

    /// Requests the engine to abandon the computation. Idempotent.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Polled by the engine between search expansions.
    ///
    /// Reports true once the request is cancelled or the armed deadline
    /// has passed, so engines watch a single predicate for both.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        match *self.deadline.lock().unwrap() {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Called by the engine to report progress in `[0.0, 1.0]`.
    pub fn on_progress(&self, progress: f32) {
        if let Some(listener) = self.progress.lock().unwrap().as_ref() {
            listener(progress);
        }
    }

    /// Called by the engine when it settles a candidate point.
    pub fn on_point_check(&self, point: PointD) {
        if let Some(listener) = self.point_check.lock().unwrap().as_ref() {
            listener(point);
        }
    }
}
