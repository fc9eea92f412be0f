//! # Scroll-Capture Pipeline
//!
//! Top-level wiring of selection and capture. All collaborators are passed in
//! through [`ScrollCaptureBuilder`] and owned by the pipeline; nothing is reached
//! through globals.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scroll_capture::capture::{ImageSequenceSource, ReplayDispatcher};
//! use scroll_capture::output::PngFileSink;
//! use scroll_capture::selection::PointerEvent;
//! use scroll_capture::ScrollCapture;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut capture = ScrollCapture::builder()
//!     .with_frame_source(ImageSequenceSource::from_paths(["screen.png"]))
//!     .with_gesture_dispatcher(ReplayDispatcher)
//!     .with_sink(PngFileSink::new("composite.png"))
//!     .build()?;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel::<PointerEvent>(64);
//! // hand `tx` to the overlay
//! # drop(tx);
//! if let Some(summary) = capture.run(rx).await? {
//!     println!("{} pages, {}x{}", summary.page_count, summary.width, summary.height);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::capture::{CaptureOrchestrator, CaptureSummary, FrameSource};
use crate::config::CaptureConfig;
use crate::core::Region;
use crate::error::{classify, CaptureError, CaptureResult};
use crate::output::{Diagnostics, LogNotifier, OcrSink, UserNotifier};
use crate::scroll::{GestureDispatcher, ScrollDriver, SwipeGesture};
use crate::selection::{PointerEvent, SelectionStateMachine};

/// Selection followed by capture, with every collaborator wired in.
pub struct ScrollCapture {
    config: CaptureConfig,
    driver: Arc<ScrollDriver>,
    notifier: Arc<dyn UserNotifier>,
    orchestrator: CaptureOrchestrator,
}

impl ScrollCapture {
    pub fn builder() -> ScrollCaptureBuilder {
        ScrollCaptureBuilder::new()
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn scroll_driver(&self) -> &Arc<ScrollDriver> {
        &self.driver
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        self.orchestrator.diagnostics()
    }

    /// Run one selection from `events` and capture the result.
    ///
    /// Returns `Ok(None)` when the selection is abandoned before it finalizes, or
    /// when it finalizes to a region that covers no pixels, as a tap does. The
    /// empty session is still recorded in diagnostics.
    pub async fn run(&mut self, events: mpsc::Receiver<PointerEvent>) -> CaptureResult<Option<CaptureSummary>> {
        let mut selection = SelectionStateMachine::new(&self.config, Arc::clone(&self.driver));
        let Some(outcome) = selection.run(events).await else {
            return Ok(None);
        };
        if let Some(notice) = &outcome.notice {
            self.notifier.notify(notice);
        }
        match self.capture(outcome.region, outcome.long_capture).await {
            Ok(summary) => Ok(Some(summary)),
            Err(error) if classify::is_empty_selection(&error) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Capture an already finalized region, skipping interactive selection.
    pub async fn capture(&mut self, region: Region, long_capture: bool) -> CaptureResult<CaptureSummary> {
        self.orchestrator.start(region, long_capture).await
    }
}

/// Stand-in used when no gesture capability is connected.
struct NoGestureCapability;

#[async_trait]
impl GestureDispatcher for NoGestureCapability {
    fn is_available(&self) -> bool {
        false
    }

    async fn dispatch(&self, _gesture: &SwipeGesture) -> Result<()> {
        anyhow::bail!("no gesture capability connected")
    }
}

/// Builder for [`ScrollCapture`].
///
/// A frame source and a sink are required. Without a gesture dispatcher the
/// pipeline behaves as if the scroll capability were disabled.
pub struct ScrollCaptureBuilder {
    config: CaptureConfig,
    frame_source: Option<Box<dyn FrameSource>>,
    dispatcher: Option<Arc<dyn GestureDispatcher>>,
    sink: Option<Arc<dyn OcrSink>>,
    notifier: Arc<dyn UserNotifier>,
    diagnostics: Arc<Diagnostics>,
    settle_delay: Option<Duration>,
}

impl Default for ScrollCaptureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollCaptureBuilder {
    pub fn new() -> Self {
        Self {
            config: CaptureConfig::default(),
            frame_source: None,
            dispatcher: None,
            sink: None,
            notifier: Arc::new(LogNotifier),
            diagnostics: Arc::new(Diagnostics::new()),
            settle_delay: None,
        }
    }

    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_frame_source<S: FrameSource + 'static>(mut self, source: S) -> Self {
        self.frame_source = Some(Box::new(source));
        self
    }

    pub fn with_gesture_dispatcher<D: GestureDispatcher + 'static>(self, dispatcher: D) -> Self {
        self.with_shared_dispatcher(Arc::new(dispatcher))
    }

    /// Use a dispatcher the caller keeps a handle to.
    pub fn with_shared_dispatcher(mut self, dispatcher: Arc<dyn GestureDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_sink<S: OcrSink + 'static>(self, sink: S) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    pub fn with_shared_sink(mut self, sink: Arc<dyn OcrSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn UserNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    /// Validate the configuration and assemble the pipeline.
    pub fn build(self) -> CaptureResult<ScrollCapture> {
        self.config.validate()?;
        let source = self.frame_source.ok_or_else(|| {
            CaptureError::config("frame_source", "none", "a frame source is required")
        })?;
        let sink = self
            .sink
            .ok_or_else(|| CaptureError::config("sink", "none", "a result sink is required"))?;
        let dispatcher = self
            .dispatcher
            .unwrap_or_else(|| Arc::new(NoGestureCapability));

        let driver = Arc::new(ScrollDriver::new(dispatcher, self.config.screen));
        let mut orchestrator = CaptureOrchestrator::new(
            self.config.screen,
            source,
            Arc::clone(&driver),
            sink,
            Arc::clone(&self.notifier),
            self.diagnostics,
        );
        if let Some(delay) = self.settle_delay {
            orchestrator = orchestrator.with_settle_delay(delay);
        }

        Ok(ScrollCapture {
            config: self.config,
            driver,
            notifier: self.notifier,
            orchestrator,
        })
    }
}
