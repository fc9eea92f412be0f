//! # Capture Orchestrator
//!
//! Runs one capture session for a finalized selection: open the frame source,
//! collect cropped pages (scrolling between them in long-capture mode), release
//! the source, stitch, and hand the composite to the OCR sink.
//!
//! ## Sequencing
//!
//! Capture is strictly sequential. `start` takes `&mut self`, so a second session
//! cannot begin while one is in flight. Between pages the orchestrator issues one
//! scroll step and waits [`SETTLE_DELAY`] for the content to come to rest before
//! acquiring the next frame.
//!
//! ## Failure Handling
//!
//! A frame that cannot be acquired or cropped aborts the session. The source is
//! released, collected pages are dropped and the error is recorded in diagnostics.
//! Fatal errors also raise a [`Notice::CaptureFailed`]. A selection that covers no
//! pixels (a tap, or a region off the frame) is recorded without a notice. The sink
//! is never called for an aborted session.

use std::sync::Arc;
use std::time::Duration;

use cap_stitch::StitchReport;

use super::session::{CaptureMode, CaptureSession};
use super::source::FrameSource;
use crate::core::{Region, ScreenSize};
use crate::error::{classify, CaptureError, CaptureResult};
use crate::output::{Diagnostics, Notice, OcrSink, UserNotifier};
use crate::scroll::ScrollDriver;

/// Wait after a scroll step before the next frame is acquired.
pub const SETTLE_DELAY: Duration = Duration::from_millis(800);

/// What a completed session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSummary {
    pub page_count: usize,
    pub width: u32,
    pub height: u32,
    pub report: StitchReport,
}

pub struct CaptureOrchestrator {
    screen: ScreenSize,
    source: Box<dyn FrameSource>,
    driver: Arc<ScrollDriver>,
    sink: Arc<dyn OcrSink>,
    notifier: Arc<dyn UserNotifier>,
    diagnostics: Arc<Diagnostics>,
    settle_delay: Duration,
}

impl CaptureOrchestrator {
    pub fn new(
        screen: ScreenSize,
        source: Box<dyn FrameSource>,
        driver: Arc<ScrollDriver>,
        sink: Arc<dyn OcrSink>,
        notifier: Arc<dyn UserNotifier>,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        Self {
            screen,
            source,
            driver,
            sink,
            notifier,
            diagnostics,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the wait between a scroll step and the next frame.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Capture `region`, scrolling between pages when `long_capture` is set, and
    /// deliver the composite to the sink exactly once.
    pub async fn start(&mut self, region: Region, long_capture: bool) -> CaptureResult<CaptureSummary> {
        self.diagnostics.record_region(region);
        let mode = CaptureMode::for_request(long_capture);
        tracing::info!(?mode, source = self.source.name(), "capture session started");

        match self.run_session(region, mode).await {
            Ok(summary) => {
                tracing::info!(
                    pages = summary.page_count,
                    width = summary.width,
                    height = summary.height,
                    overlaps = ?summary.report.overlaps,
                    "capture session complete"
                );
                Ok(summary)
            }
            Err(error) => {
                self.report_failure(&error);
                Err(error)
            }
        }
    }

    async fn run_session(&mut self, region: Region, mode: CaptureMode) -> CaptureResult<CaptureSummary> {
        let source_name = self.source.name().to_string();
        self.source.initialize(self.screen).await.map_err(|e| {
            CaptureError::capture_init(source_name, format!("{e:#}"))
                .with_recovery_suggestion("Grant screen capture permission and retry")
        })?;

        let collected = self.collect_pages(region, mode).await;
        self.release().await;
        let session = collected?;

        let page_count = session.page_count();
        let result = cap_stitch::stitch(session.into_pages())
            .ok_or_else(|| CaptureError::processing("stitch", "no pages were captured"))?;
        self.diagnostics.record_composite(page_count, &result);

        let summary = CaptureSummary {
            page_count,
            width: result.width(),
            height: result.height(),
            report: result.report.clone(),
        };

        self.sink.deliver(result).await.map_err(|e| {
            CaptureError::delivery("ocr sink", format!("{e:#}"))
                .retryable()
                .with_metadata("pages", page_count.to_string())
        })?;

        Ok(summary)
    }

    async fn collect_pages(&mut self, region: Region, mode: CaptureMode) -> CaptureResult<CaptureSession> {
        let mut session = CaptureSession::new(region, mode);
        loop {
            let page_number = session.page_count() + 1;
            let frame = self.source.capture_frame().await.map_err(|e| {
                CaptureError::frame_capture(format!("{e:#}"))
                    .with_operation(format!("capture page {page_number}"))
                    .with_recovery_suggestion("Start a new selection")
            })?;
            let image = frame
                .crop(region)
                .map_err(|e| e.with_operation(format!("crop page {page_number}")))?;

            let count = session.push(image);
            tracing::debug!(page = count, "page captured");

            if !session.wants_more() {
                break;
            }
            if !self.driver.step().await {
                tracing::warn!(pages = count, "scroll step rejected, finishing with captured pages");
                break;
            }
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(session)
    }

    async fn release(&mut self) {
        if let Err(e) = self.source.shutdown().await {
            tracing::warn!(error = %e, source = self.source.name(), "failed to release frame source");
        }
    }

    fn report_failure(&self, error: &CaptureError) {
        self.diagnostics.record_error(error);
        if classify::is_empty_selection(error) {
            tracing::debug!(%error, "selection covered nothing, session dropped");
        } else if classify::is_session_fatal(error) {
            tracing::error!(category = error.category(), %error, "capture session failed");
            self.notifier.notify(&Notice::CaptureFailed {
                reason: error.to_string(),
            });
        } else {
            tracing::warn!(category = error.category(), %error, "capture session failed");
        }
    }
}
