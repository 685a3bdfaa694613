//! UI-thread task scheduling.
//!
//! User-facing callbacks must execute on the thread that owns the user
//! interface. The dispatcher never assumes what that thread looks like: it
//! schedules fire-and-forget tasks through the [`GuiRunner`] trait and the
//! embedding application decides how they reach its UI loop.
//!
//! [`GuiThread`] is a ready-made implementation backed by a dedicated OS
//! thread draining a channel, suitable for tests and headless embeddings.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// A task scheduled onto the UI thread.
pub type GuiTask = Box<dyn FnOnce() + Send>;

/// Scheduler for fire-and-forget tasks on the UI thread.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the routing worker schedules
/// tasks from its own thread while the UI thread submits requests.
///
/// # Ordering
///
/// Tasks scheduled from a single thread must run in submission order.
/// The dispatcher relies on this to deliver statistics before the result
/// callback of the same request.
pub trait GuiRunner: Send + Sync {
    /// Schedules a task onto the UI thread. Never blocks.
    fn run(&self, task: GuiTask);
}

/// Name of the thread spawned by [`GuiThread`].
pub const GUI_THREAD_NAME: &str = "gui-runner";

/// A dedicated UI thread draining scheduled tasks in FIFO order.
///
/// The thread can be cleanly shut down by calling `shutdown()` followed by
/// `join()`, or by dropping the `GuiThread` instance. Tasks scheduled
/// after shutdown are dropped with a warning.
pub struct GuiThread {
    /// Sending half of the task channel; `None` once shut down
    sender: Mutex<Option<mpsc::Sender<GuiTask>>>,
    /// Handle to the UI thread
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl GuiThread {
    /// Starts the UI thread.
    pub fn start() -> Self {
        let (sender, receiver) = mpsc::channel::<GuiTask>();

        let thread_handle = thread::Builder::new()
            .name(GUI_THREAD_NAME.to_string())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    task();
                }
                debug!("GUI runner stopped");
            })
            .expect("Failed to spawn GUI runner thread");

        Self {
            sender: Mutex::new(Some(sender)),
            thread_handle: Mutex::new(Some(thread_handle)),
        }
    }

    /// Stops accepting tasks and lets the thread drain what is queued.
    ///
    /// This is non-blocking. Call `join()` afterwards to wait for the
    /// thread to finish.
    pub fn shutdown(&self) {
        self.sender.lock().unwrap().take();
    }

    /// Waits for the UI thread to finish.
    ///
    /// Should be called after `shutdown()` to ensure clean termination.
    pub fn join(&self) {
        if let Some(handle) = self.thread_handle.lock().unwrap().take() {
            if let Err(e) = handle.join() {
                warn!("GUI runner thread panicked: {:?}", e);
            }
        }
    }

    /// Check if the UI thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .lock()
            .unwrap()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl GuiRunner for GuiThread {
    fn run(&self, task: GuiTask) {
        match self.sender.lock().unwrap().as_ref() {
            Some(sender) => {
                if sender.send(task).is_err() {
                    warn!("GUI runner thread is gone, dropping task");
                }
            }
            None => warn!("GUI runner is shut down, dropping task"),
        }
    }
}

impl Drop for GuiThread {
    fn drop(&mut self) {
        self.shutdown();
        self.join();
    }
}
