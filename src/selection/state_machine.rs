//! # Selection State Machine
//!
//! Turns the pointer stream of the crop overlay into one finalized [`Region`] and
//! a long-capture decision.
//!
//! ## States
//!
//! ```text
//!            down            up
//!   Idle ─────────▶ Dragging ────▶ Armed ──(timer)──▶ Finalized
//!                     ▲  │ cancel    │
//!                     │  ▼           │ move / down
//!                    Paused ◀────────┘ cancel
//! ```
//!
//! Every down or move re-arms the auto-finalize timer. A cancel (the platform
//! taking over the touch stream mid-scroll) disarms it and keeps the corners.
//! The selection only ever finalizes through timer expiry.
//!
//! ## Drag-to-Scroll
//!
//! While the pointer sits within [`SCROLL_THRESHOLD`] pixels of the bottom edge the
//! end corner is pinned to the bottom of the screen and the [`ScrollDriver`] scrolls
//! continuously. Moving away stops it.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::CaptureConfig;
use crate::core::{AutoFinalizeTimer, Point, Region, ScreenSize};
use crate::output::Notice;
use crate::scroll::ScrollDriver;

/// Distance from the bottom edge that triggers drag-to-scroll.
pub const SCROLL_THRESHOLD: f32 = 150.0;
/// Selections narrower or shorter than this are treated as accidental taps.
pub const MIN_SELECTION_SIZE: f32 = 10.0;
/// A finalized bottom edge this close to the screen bottom requests long capture.
pub const LONG_CAPTURE_BOTTOM_MARGIN: i32 = 50;

/// Raw pointer input from the overlay, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    Cancel(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Dragging,
    /// Pointer lifted, waiting for the timer.
    Armed,
    /// Touch stream cancelled; corners kept, timer disarmed.
    Paused,
    Finalized,
}

/// Result of a completed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub region: Region,
    pub long_capture: bool,
    /// Notice to surface alongside the outcome, if any.
    pub notice: Option<Notice>,
}

pub struct SelectionStateMachine {
    screen: ScreenSize,
    driver: Arc<ScrollDriver>,
    timer: AutoFinalizeTimer,
    state: SelectionState,
    start: Point,
    end: Point,
}

impl SelectionStateMachine {
    pub fn new(config: &CaptureConfig, driver: Arc<ScrollDriver>) -> Self {
        Self {
            screen: config.screen,
            driver,
            timer: AutoFinalizeTimer::new(config.selection_timeout.as_duration()),
            state: SelectionState::Idle,
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, 0.0),
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn timer(&self) -> &AutoFinalizeTimer {
        &self.timer
    }

    /// The region currently outlined, before any degenerate-size correction.
    pub fn current_region(&self) -> Option<Region> {
        match self.state {
            SelectionState::Idle => None,
            _ => Some(Region::from_corners(self.start, self.end)),
        }
    }

    /// Feed one pointer event. Events after finalization are ignored.
    ///
    /// A drag into the bottom band starts continuous scrolling, which needs a
    /// tokio runtime. Without one the drag still updates the selection but the
    /// content does not scroll.
    pub fn handle(&mut self, event: PointerEvent) {
        if self.state == SelectionState::Finalized {
            return;
        }
        match event {
            PointerEvent::Down(point) => self.on_pointer_down(point),
            PointerEvent::Move(point) => self.on_pointer_move(point),
            PointerEvent::Up(_) => self.on_pointer_up(),
            PointerEvent::Cancel(_) => self.on_pointer_cancel(),
        }
    }

    pub fn on_pointer_down(&mut self, point: Point) {
        self.start = point;
        self.end = point;
        self.state = SelectionState::Dragging;
        self.timer.reset();
    }

    pub fn on_pointer_move(&mut self, point: Point) {
        let scroll_edge = self.screen.height as f32 - SCROLL_THRESHOLD;
        self.end = point;
        if point.y >= scroll_edge {
            self.end.y = self.screen.height as f32;
            self.driver.start();
        } else {
            self.driver.stop();
        }
        self.state = SelectionState::Dragging;
        self.timer.reset();
    }

    pub fn on_pointer_up(&mut self) {
        self.driver.stop();
        self.state = SelectionState::Armed;
    }

    pub fn on_pointer_cancel(&mut self) {
        self.driver.stop();
        self.timer.cancel();
        self.state = SelectionState::Paused;
    }

    /// Close the selection and decide whether long capture applies.
    ///
    /// Called on timer expiry. Stops any running scroll, normalizes the corners and
    /// widens a degenerate selection to the full screen width.
    pub fn finalize(&mut self) -> SelectionOutcome {
        self.driver.stop();
        self.timer.cancel();
        self.state = SelectionState::Finalized;

        let width = (self.start.x - self.end.x).abs();
        let height = (self.start.y - self.end.y).abs();
        let mut region = Region::from_corners(self.start, self.end);
        if width < MIN_SELECTION_SIZE || height < MIN_SELECTION_SIZE {
            tracing::debug!(width, height, "degenerate selection, spanning full width");
            region = region.spanning_width(self.screen);
        }

        let at_bottom = region.bottom >= self.screen.height as i32 - LONG_CAPTURE_BOTTOM_MARGIN;
        let (long_capture, notice) = match (at_bottom, self.driver.is_available()) {
            (true, true) => (true, Some(Notice::AutoScrolling)),
            (true, false) => (false, Some(Notice::ScrollUnavailable)),
            (false, _) => (false, None),
        };

        tracing::info!(
            left = region.left,
            top = region.top,
            right = region.right,
            bottom = region.bottom,
            long_capture,
            "selection finalized"
        );
        SelectionOutcome {
            region,
            long_capture,
            notice,
        }
    }

    /// Drive the machine from an event channel until the timer fires.
    ///
    /// If the channel closes while the timer is armed the selection still
    /// finalizes at expiry. If it closes with no armed timer the selection is
    /// abandoned and `None` is returned.
    pub async fn run(&mut self, mut events: mpsc::Receiver<PointerEvent>) -> Option<SelectionOutcome> {
        let mut open = true;
        loop {
            if !open && !self.timer.is_armed() {
                self.driver.stop();
                tracing::info!(state = ?self.state, "pointer stream closed, selection abandoned");
                return None;
            }
            tokio::select! {
                event = events.recv(), if open => match event {
                    Some(event) => self.handle(event),
                    None => open = false,
                },
                () = self.timer.expired() => return Some(self.finalize()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::{GestureDispatcher, ScrollState, SwipeGesture};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{self, Instant};

    struct Dispatcher {
        available: bool,
        dispatched: AtomicUsize,
    }

    #[async_trait]
    impl GestureDispatcher for Dispatcher {
        fn is_available(&self) -> bool {
            self.available
        }

        async fn dispatch(&self, _gesture: &SwipeGesture) -> Result<()> {
            self.dispatched.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn machine(available: bool) -> (SelectionStateMachine, Arc<ScrollDriver>) {
        let config = CaptureConfig::default();
        let dispatcher = Arc::new(Dispatcher {
            available,
            dispatched: AtomicUsize::new(0),
        });
        let driver = Arc::new(ScrollDriver::new(dispatcher, config.screen));
        (SelectionStateMachine::new(&config, driver.clone()), driver)
    }

    #[tokio::test(start_paused = true)]
    async fn drag_then_lift_arms_without_finalizing() {
        let (mut machine, _driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(100.0, 300.0)));
        machine.handle(PointerEvent::Move(Point::new(900.0, 1200.0)));
        machine.handle(PointerEvent::Up(Point::new(900.0, 1200.0)));

        assert_eq!(machine.state(), SelectionState::Armed);
        assert!(machine.timer().is_armed());
        assert_eq!(
            machine.current_region(),
            Some(Region {
                left: 100,
                top: 300,
                right: 900,
                bottom: 1200
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn bottom_edge_pins_corner_and_scrolls() {
        let (mut machine, driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(100.0, 300.0)));
        machine.handle(PointerEvent::Move(Point::new(900.0, 2300.0)));

        assert_eq!(driver.state(), ScrollState::Running);
        assert_eq!(machine.current_region().map(|r| r.bottom), Some(2400));

        machine.handle(PointerEvent::Move(Point::new(900.0, 2000.0)));
        assert_eq!(driver.state(), ScrollState::Stopped);
        assert_eq!(machine.current_region().map(|r| r.bottom), Some(2000));
    }

    #[test]
    fn edge_drag_without_runtime_keeps_selecting() {
        let (mut machine, driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(100.0, 300.0)));
        machine.handle(PointerEvent::Move(Point::new(900.0, 2300.0)));

        assert_eq!(driver.state(), ScrollState::Stopped);
        assert_eq!(machine.state(), SelectionState::Dragging);
        assert_eq!(machine.current_region().map(|r| r.bottom), Some(2400));
        assert!(machine.timer().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn lift_and_cancel_stop_scrolling() {
        let (mut machine, driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(100.0, 300.0)));
        machine.handle(PointerEvent::Move(Point::new(900.0, 2390.0)));
        machine.handle(PointerEvent::Up(Point::new(900.0, 2390.0)));
        assert_eq!(driver.state(), ScrollState::Stopped);

        machine.handle(PointerEvent::Move(Point::new(900.0, 2390.0)));
        assert_eq!(driver.state(), ScrollState::Running);
        machine.handle(PointerEvent::Cancel(Point::new(900.0, 2390.0)));
        assert_eq!(driver.state(), ScrollState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_keeps_corners_and_disarms() {
        let (mut machine, _driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(10.0, 20.0)));
        machine.handle(PointerEvent::Move(Point::new(500.0, 800.0)));
        let before = machine.current_region();

        machine.handle(PointerEvent::Cancel(Point::new(0.0, 0.0)));
        assert_eq!(machine.state(), SelectionState::Paused);
        assert!(!machine.timer().is_armed());
        assert_eq!(machine.current_region(), before);

        machine.handle(PointerEvent::Move(Point::new(600.0, 900.0)));
        assert_eq!(machine.state(), SelectionState::Dragging);
        assert!(machine.timer().is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn tap_widens_to_full_width() {
        let (mut machine, _driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(400.0, 500.0)));
        machine.handle(PointerEvent::Move(Point::new(404.0, 900.0)));

        let outcome = machine.finalize();
        assert_eq!(
            outcome.region,
            Region {
                left: 0,
                top: 500,
                right: 1080,
                bottom: 900
            }
        );
        assert!(!outcome.long_capture);
        assert_eq!(outcome.notice, None);
        assert_eq!(machine.state(), SelectionState::Finalized);
    }

    #[tokio::test(start_paused = true)]
    async fn bottom_selection_requests_long_capture() {
        let (mut machine, _driver) = machine(true);
        machine.handle(PointerEvent::Down(Point::new(0.0, 400.0)));
        machine.handle(PointerEvent::Move(Point::new(1080.0, 2360.0)));

        let outcome = machine.finalize();
        assert!(outcome.long_capture);
        assert_eq!(outcome.notice, Some(Notice::AutoScrolling));
    }

    #[tokio::test(start_paused = true)]
    async fn bottom_selection_without_capability_is_single_page() {
        let (mut machine, _driver) = machine(false);
        machine.handle(PointerEvent::Down(Point::new(0.0, 400.0)));
        machine.handle(PointerEvent::Move(Point::new(1080.0, 2360.0)));

        let outcome = machine.finalize();
        assert!(!outcome.long_capture);
        assert_eq!(outcome.notice, Some(Notice::ScrollUnavailable));
    }

    #[tokio::test(start_paused = true)]
    async fn run_finalizes_after_last_event() {
        let (mut machine, _driver) = machine(true);
        let (tx, rx) = mpsc::channel(8);
        tx.send(PointerEvent::Down(Point::new(100.0, 100.0))).await.unwrap();
        tx.send(PointerEvent::Move(Point::new(700.0, 900.0))).await.unwrap();
        tx.send(PointerEvent::Up(Point::new(700.0, 900.0))).await.unwrap();
        drop(tx);

        let started = Instant::now();
        let outcome = machine.run(rx).await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(5000));
        assert_eq!(outcome.region.right, 700);
    }

    #[tokio::test(start_paused = true)]
    async fn run_abandons_paused_selection_when_stream_closes() {
        let (mut machine, _driver) = machine(true);
        let (tx, rx) = mpsc::channel(8);
        tx.send(PointerEvent::Down(Point::new(100.0, 100.0))).await.unwrap();
        tx.send(PointerEvent::Cancel(Point::new(100.0, 100.0))).await.unwrap();
        drop(tx);

        assert!(machine.run(rx).await.is_none());
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(machine.state(), SelectionState::Paused);
    }
}
