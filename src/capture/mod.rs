//! # Capture Module
//!
//! The frame-source seam, per-selection capture sessions, the orchestrator that
//! runs them, and replay implementations of the platform collaborators.

pub mod orchestrator;
pub mod replay;
pub mod session;
pub mod source;

pub use orchestrator::{CaptureOrchestrator, CaptureSummary, SETTLE_DELAY};
pub use replay::{ImageSequenceSource, ReplayDispatcher};
pub use session::{CaptureMode, CaptureSession, MAX_PAGES};
pub use source::{FrameSource, RawFrame};
