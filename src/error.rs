//! # Error Handling
//!
//! Error types for the scroll-capture pipeline, with classification traits that
//! encode the session's propagation policy.
//!
//! ## Propagation Policy
//!
//! Only failures of the capture surface itself (initialization, frame acquisition)
//! and rejected result delivery end a session with an error. Resource exhaustion
//! while compositing and ambiguous overlap detection degrade inside the stitcher and
//! never reach this type. A selection that covers no pixels ends the session as
//! [`CaptureError::EmptyCrop`], which is not fatal and is never shown to the user.
//!
//! ## Error Classification
//!
//! - `Retryable`: none of the session-ending errors are retried; a stale capture
//!   surface cannot be resumed safely
//! - `HasSeverity` / `HasRecoverySuggestion`: metadata for user notification
//!
//! ## Usage
//!
//! ```rust
//! use scroll_capture::error::{CaptureError, Retryable};
//!
//! let error = CaptureError::frame_capture("image reader closed")
//!     .with_operation("capture page 3")
//!     .with_recovery_suggestion("Start a new selection");
//!
//! assert!(!error.is_retryable());
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt, time::SystemTime};

use crate::core::Region;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Debug,
    Info,
    Warning,
    /// Errors that affect operation but can be recovered from
    Error,
    /// Errors the user should be told about
    Critical,
    /// Errors that end the current session
    Fatal,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    pub context: Option<String>,
    pub recovery_suggestion: Option<String>,
    pub severity: ErrorSeverity,
    pub retryable: bool,
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            retryable: false,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Base error type for the scroll-capture pipeline
#[derive(Debug)]
pub enum CaptureError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// The frame source could not be opened
    CaptureInit {
        source_name: String,
        reason: String,
        context: ErrorContext,
    },
    /// A frame could not be acquired from an open source
    FrameCapture {
        reason: String,
        context: ErrorContext,
    },
    /// A captured frame could not be turned into a page
    Processing {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// The selection left nothing of the frame after clamping
    EmptyCrop {
        region: Region,
        frame_width: u32,
        frame_height: u32,
        context: ErrorContext,
    },
    /// The OCR collaborator rejected the composite
    Delivery {
        target: String,
        reason: String,
        context: ErrorContext,
    },
}

impl CaptureError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create a capture initialization error
    pub fn capture_init(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CaptureInit {
            source_name: source_name.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Critical),
        }
    }

    /// Create a frame capture error
    pub fn frame_capture(reason: impl Into<String>) -> Self {
        Self::FrameCapture {
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Critical),
        }
    }

    /// Create a processing error
    pub fn processing(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Processing {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an empty-crop error for a region that misses a frame of this size
    pub fn empty_crop(region: Region, frame_width: u32, frame_height: u32) -> Self {
        Self::EmptyCrop {
            region,
            frame_width,
            frame_height,
            context: ErrorContext::new().with_severity(ErrorSeverity::Info),
        }
    }

    /// Create a delivery error
    pub fn delivery(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Delivery {
            target: target.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.context_mut().retryable = true;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::CaptureInit { context, .. } => context,
            Self::FrameCapture { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::EmptyCrop { context, .. } => context,
            Self::Delivery { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::CaptureInit { context, .. } => context,
            Self::FrameCapture { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::EmptyCrop { context, .. } => context,
            Self::Delivery { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::CaptureInit { .. } => "capture_init",
            Self::FrameCapture { .. } => "frame_capture",
            Self::Processing { .. } => "processing",
            Self::EmptyCrop { .. } => "empty_crop",
            Self::Delivery { .. } => "delivery",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Config {
                field,
                value,
                reason,
                ..
            } => write!(
                f,
                "Configuration error in '{}': {} (value: {})",
                field, reason, value
            ),
            CaptureError::CaptureInit {
                source_name,
                reason,
                ..
            } => write!(f, "Failed to open capture source {}: {}", source_name, reason),
            CaptureError::FrameCapture { reason, .. } => {
                write!(f, "Frame capture failed: {}", reason)
            }
            CaptureError::Processing {
                operation, reason, ..
            } => write!(f, "Processing failed during {}: {}", operation, reason),
            CaptureError::EmptyCrop {
                region,
                frame_width,
                frame_height,
                ..
            } => write!(
                f,
                "Selection {},{},{},{} covers no pixels of a {}x{} frame",
                region.left, region.top, region.right, region.bottom, frame_width, frame_height
            ),
            CaptureError::Delivery { target, reason, .. } => {
                write!(f, "Delivering result to {} failed: {}", target, reason)
            }
        }
    }
}

impl StdError for CaptureError {}

/// Result type alias using our custom error type
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Trait for errors that can be retried
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for CaptureError {
    fn is_retryable(&self) -> bool {
        // A capture surface that failed once is not resumable.
        self.context().retryable && !matches!(self, Self::FrameCapture { .. })
    }
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for CaptureError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for CaptureError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Whether the error ends the current capture session
    pub fn is_session_fatal(error: &CaptureError) -> bool {
        matches!(
            error,
            CaptureError::Config { .. }
                | CaptureError::CaptureInit { .. }
                | CaptureError::FrameCapture { .. }
                | CaptureError::Processing { .. }
        ) || error.severity() == ErrorSeverity::Fatal
    }

    /// Whether the selection simply covered nothing, as after an accidental tap
    pub fn is_empty_selection(error: &CaptureError) -> bool {
        matches!(error, CaptureError::EmptyCrop { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_capture_is_not_retryable() {
        let error = CaptureError::frame_capture("surface lost");
        assert_eq!(error.category(), "frame_capture");
        assert!(!error.is_retryable());
        assert!(classify::is_session_fatal(&error));
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn error_carries_context() {
        let error = CaptureError::processing("crop", "short buffer")
            .with_context("page 2")
            .with_recovery_suggestion("select a region inside the screen")
            .with_metadata("page", "2");

        assert_eq!(error.context().context.as_deref(), Some("page 2"));
        assert_eq!(
            error.recovery_suggestion(),
            Some("select a region inside the screen")
        );
        assert_eq!(error.context().metadata.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn empty_selection_is_quiet() {
        let region = Region {
            left: 0,
            top: 300,
            right: 200,
            bottom: 300,
        };
        let error = CaptureError::empty_crop(region, 200, 600);

        assert_eq!(error.category(), "empty_crop");
        assert!(classify::is_empty_selection(&error));
        assert!(!classify::is_session_fatal(&error));
        assert!(!error.is_retryable());
        assert_eq!(error.severity(), ErrorSeverity::Info);
        assert_eq!(
            error.to_string(),
            "Selection 0,300,200,300 covers no pixels of a 200x600 frame"
        );
    }

    #[test]
    fn frame_capture_stays_unretryable_when_marked() {
        let error = CaptureError::frame_capture("surface lost").retryable();
        assert!(!error.is_retryable());

        let delivery = CaptureError::delivery("ocr", "busy").retryable();
        assert!(delivery.is_retryable());
    }
}
