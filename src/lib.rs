//! # Scroll Capture Library
//!
//! Captures a user-selected screen region across automated scroll steps and merges
//! the pages into one tall image for downstream text recognition.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `selection`: Pointer-driven region selection with an auto-finalize timer
//! - `scroll`: Scroll gestures, continuous and single-step
//! - `capture`: Frame sources and the page-collecting orchestrator
//! - `output`: Result sink, user notices and diagnostics
//! - `core`: Geometry and timer primitives
//! - `config`: Configuration management and validation
//! - `pipeline`: Builder that wires everything together
//!
//! Overlap detection and compositing live in the `cap-stitch` crate and are
//! re-exported here.
//!
//! ## Example
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use scroll_capture::{stitch, Page};
//!
//! let pages = vec![
//!     Page::new(0, RgbaImage::from_pixel(8, 40, Rgba([255, 255, 255, 255]))),
//!     Page::new(1, RgbaImage::from_pixel(8, 40, Rgba([0, 0, 0, 255]))),
//! ];
//! let result = stitch(pages).unwrap();
//! assert_eq!(result.width(), 8);
//! ```

pub mod capture;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod scroll;
pub mod selection;

/// Re-export error types for convenience
pub use error::{
    CaptureError, CaptureResult, HasRecoverySuggestion, HasSeverity, Retryable,
};

/// Re-export the stitching engine
pub use cap_stitch::{detect_overlap, merge, stitch, Page, StitchReport, StitchResult};

pub use pipeline::{ScrollCapture, ScrollCaptureBuilder};
