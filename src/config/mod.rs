//! # Configuration Module
//!
//! Capture configuration and the allowed selection timeouts.

pub mod config;

pub use config::{CaptureConfig, SelectionTimeout};
