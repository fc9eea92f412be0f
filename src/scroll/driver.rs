//! # Scroll Driver
//!
//! Continuous drag-to-scroll and single scroll steps through a [`GestureDispatcher`].
//!
//! ## State Ownership
//!
//! The running flag is an `AtomicBool` written only by the driver. The selection
//! state machine and the orchestrator read it through [`ScrollDriver::state`],
//! which is a single relaxed-cost load.
//!
//! ## Periodic Task
//!
//! `start()` spawns one task on the current tokio runtime that dispatches a swipe every
//! [`SCROLL_INTERVAL`], the first one immediately. `stop()` clears the flag and
//! aborts that task, so no dispatch happens after the next interval boundary.
//! Dropping the driver stops it as well.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::gesture::{GestureDispatcher, SwipeGesture};
use crate::core::ScreenSize;

/// Period between swipes while continuous scrolling is running.
pub const SCROLL_INTERVAL: Duration = Duration::from_millis(100);

/// Observable scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Stopped,
    Running,
}

/// Issues scroll gestures on behalf of the selection and capture stages.
pub struct ScrollDriver {
    dispatcher: Arc<dyn GestureDispatcher>,
    gesture: SwipeGesture,
    running: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ScrollDriver {
    /// Create a stopped driver for a display of the given size.
    pub fn new(dispatcher: Arc<dyn GestureDispatcher>, screen: ScreenSize) -> Self {
        Self {
            dispatcher,
            gesture: SwipeGesture::scroll_step(screen),
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    /// Whether the gesture capability is connected.
    pub fn is_available(&self) -> bool {
        self.dispatcher.is_available()
    }

    pub fn state(&self) -> ScrollState {
        if self.running.load(Ordering::Acquire) {
            ScrollState::Running
        } else {
            ScrollState::Stopped
        }
    }

    /// Begin continuous scrolling.
    ///
    /// No-op when already running or when the capability is unavailable. The
    /// periodic task runs on the current tokio runtime; called outside one, this
    /// logs a warning and leaves the driver stopped.
    pub fn start(&self) {
        if !self.dispatcher.is_available() {
            tracing::debug!("scroll capability unavailable, ignoring start");
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime, continuous scroll not started");
            return;
        };
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let running = Arc::clone(&self.running);
        let gesture = self.gesture;
        let handle = runtime.spawn(async move {
            let mut ticker = time::interval(SCROLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !running.load(Ordering::Acquire) {
                    break;
                }
                // best effort: the next tick tries again
                if let Err(err) = dispatcher.dispatch(&gesture).await {
                    tracing::debug!(error = %err, "scroll gesture rejected");
                }
            }
        });

        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
        tracing::debug!("continuous scroll started");
    }

    /// Stop continuous scrolling. Safe to call in any state.
    pub fn stop(&self) {
        let was_running = self.running.swap(false, Ordering::AcqRel);
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
        if was_running {
            tracing::debug!("continuous scroll stopped");
        }
    }

    /// Dispatch exactly one scroll swipe and report whether the platform took it.
    pub async fn step(&self) -> bool {
        if !self.dispatcher.is_available() {
            return false;
        }
        match self.dispatcher.dispatch(&self.gesture).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "scroll step failed");
                false
            }
        }
    }
}

impl Drop for ScrollDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
