//! # Core Infrastructure Module
//!
//! Geometry shared by every stage of the pipeline and the cancellable timer used
//! by the selection state machine.

pub mod geometry;
pub mod timer;

pub use geometry::{Point, Region, ScreenSize};
pub use timer::AutoFinalizeTimer;
