//! # Gesture Dispatch
//!
//! The scroll driver never touches input injection directly. It describes a swipe
//! as a [`SwipeGesture`] and hands it to a [`GestureDispatcher`], which models an
//! elevated-privilege accessibility service that may or may not be connected.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{Point, ScreenSize};

/// How long one scroll swipe takes from touch-down to lift.
pub const GESTURE_DURATION: Duration = Duration::from_millis(300);

/// Swipe start, as a fraction of screen height.
const SWIPE_START_FRACTION: f32 = 0.80;
/// Swipe end, as a fraction of screen height.
const SWIPE_END_FRACTION: f32 = 0.60;

/// A single straight-line stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGesture {
    pub start: Point,
    pub end: Point,
    pub duration: Duration,
}

impl SwipeGesture {
    /// The short upward swipe that advances content by one scroll step:
    /// horizontally centered, from 80% to 60% of the screen height.
    pub fn scroll_step(screen: ScreenSize) -> Self {
        let x = screen.width as f32 / 2.0;
        let height = screen.height as f32;
        Self {
            start: Point::new(x, height * SWIPE_START_FRACTION),
            end: Point::new(x, height * SWIPE_END_FRACTION),
            duration: GESTURE_DURATION,
        }
    }
}

/// Platform capability that injects gestures into the foreground application.
#[async_trait]
pub trait GestureDispatcher: Send + Sync {
    /// Whether the capability is currently connected and permitted.
    fn is_available(&self) -> bool;

    /// Inject one gesture.
    ///
    /// Returns once the platform has accepted the gesture, not when it finishes
    /// animating.
    async fn dispatch(&self, gesture: &SwipeGesture) -> Result<()>;
}
