//! # Cancellable Deadline Timer
//!
//! The selection overlay closes itself a fixed time after the last pointer event.
//! [`AutoFinalizeTimer`] models that as a single optional deadline: `reset()`
//! replaces it, `cancel()` clears it. Because there is only ever one deadline,
//! a reset can never leave a second timer instance behind.
//!
//! The timer does not spawn anything. Callers await [`AutoFinalizeTimer::expired`]
//! alongside their event source, typically inside `tokio::select!`.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant};

/// Restartable one-shot deadline.
#[derive(Debug, Clone)]
pub struct AutoFinalizeTimer {
    duration: Duration,
    deadline: Option<Instant>,
}

impl AutoFinalizeTimer {
    /// Create a disarmed timer that fires `duration` after each reset.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Cancel any pending deadline and schedule a new one `duration` from now.
    pub fn reset(&mut self) {
        self.deadline = Some(Instant::now() + self.duration);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves when the current deadline passes; never resolves while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => time::sleep_until(deadline).await,
            None => future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reset_pushes_deadline_back() {
        let mut timer = AutoFinalizeTimer::new(Duration::from_millis(5000));
        assert!(!timer.is_armed());

        let start = Instant::now();
        timer.reset();
        time::sleep(Duration::from_millis(3000)).await;
        timer.reset();
        timer.expired().await;

        assert_eq!(start.elapsed(), Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let mut timer = AutoFinalizeTimer::new(Duration::from_millis(100));
        timer.reset();
        timer.cancel();
        assert!(!timer.is_armed());

        let fired = time::timeout(Duration::from_secs(60), timer.expired()).await;
        assert!(fired.is_err());
    }
}
