//! # Output Module
//!
//! Everything that leaves the pipeline: the composite (through [`OcrSink`]),
//! user notices (through [`UserNotifier`]) and diagnostic state.

pub mod diagnostics;
pub mod notice;
pub mod sink;

pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};
pub use notice::{LogNotifier, Notice, UserNotifier};
pub use sink::{OcrSink, PngFileSink};
