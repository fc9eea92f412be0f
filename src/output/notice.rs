//! User-visible notices raised by the pipeline.

use std::fmt;

/// Short message the presentation layer shows to the user (a toast, typically).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Long capture was granted; content will scroll on its own.
    AutoScrolling,
    /// The selection reached the bottom edge but no gesture capability is connected.
    ScrollUnavailable,
    /// The capture session was aborted.
    CaptureFailed { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::AutoScrolling => write!(f, "Auto-scrolling..."),
            Notice::ScrollUnavailable => write!(f, "Enable accessibility access for scrolling"),
            Notice::CaptureFailed { reason } => write!(f, "Capture failed: {}", reason),
        }
    }
}

/// Receives notices; implemented by the overlay layer.
pub trait UserNotifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Notifier that only logs. Used when no presentation layer is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(%notice, "user notice");
    }
}
