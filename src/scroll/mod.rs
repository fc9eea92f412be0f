//! # Scroll Module
//!
//! Automated scrolling of the foreground content: the gesture seam and the driver
//! that issues gestures periodically or one step at a time.

pub mod driver;
pub mod gesture;

pub use driver::{ScrollDriver, ScrollState, SCROLL_INTERVAL};
pub use gesture::{GestureDispatcher, SwipeGesture, GESTURE_DURATION};
