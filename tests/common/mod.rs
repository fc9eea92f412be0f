//! Common test utilities for the scroll-capture integration tests
//!
//! Scripted stand-ins for every collaborator the pipeline talks to, plus a
//! synthetic document whose rows are all distinct so overlaps are unambiguous.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use scroll_capture::capture::{FrameSource, RawFrame};
use scroll_capture::core::ScreenSize;
use scroll_capture::output::{Notice, OcrSink, UserNotifier};
use scroll_capture::scroll::{GestureDispatcher, SwipeGesture};
use scroll_capture::StitchResult;

/// Pixel of the synthetic document at absolute row `gy`, column `x`.
pub fn document_pixel(gy: u32, x: u32) -> Rgba<u8> {
    Rgba([(gy % 256) as u8, (gy / 256) as u8, (x % 256) as u8, 255])
}

/// Full-screen view of the document scrolled down by `scroll` rows.
pub fn document_frame(screen: ScreenSize, scroll: u32) -> RgbaImage {
    RgbaImage::from_fn(screen.width, screen.height, |x, y| {
        document_pixel(scroll + y, x)
    })
}

/// Observations shared between a [`ScriptedSource`] and the test body.
#[derive(Default)]
pub struct SourceProbe {
    pub initialized: AtomicUsize,
    pub captures: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub screen: Mutex<Option<ScreenSize>>,
}

impl SourceProbe {
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

/// Frame source that returns prepared frames and can fail on demand.
pub struct ScriptedSource {
    frames: Vec<RgbaImage>,
    fail_init: bool,
    fail_on_capture: Option<usize>,
    probe: Arc<SourceProbe>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<RgbaImage>) -> (Self, Arc<SourceProbe>) {
        let probe = Arc::new(SourceProbe::default());
        let source = Self {
            frames,
            fail_init: false,
            fail_on_capture: None,
            probe: probe.clone(),
        };
        (source, probe)
    }

    /// Fail the `n`-th capture, counting from 1.
    pub fn failing_on_capture(mut self, n: usize) -> Self {
        self.fail_on_capture = Some(n);
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initialize(&mut self, screen: ScreenSize) -> Result<()> {
        self.probe.initialized.fetch_add(1, Ordering::SeqCst);
        *self.probe.screen.lock().unwrap() = Some(screen);
        if self.fail_init {
            bail!("projection permission revoked");
        }
        Ok(())
    }

    async fn capture_frame(&mut self) -> Result<RawFrame> {
        let n = self.probe.captures.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_capture == Some(n) {
            bail!("image reader closed");
        }
        let index = (n - 1).min(self.frames.len() - 1);
        Ok(RawFrame::from_image(self.frames[index].clone()))
    }

    fn input_size(&self) -> ScreenSize {
        ScreenSize::new(self.frames[0].width(), self.frames[0].height())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.probe.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Gesture capability that counts dispatches and can stop accepting after a limit.
pub struct CountingDispatcher {
    available: bool,
    accept_limit: Option<usize>,
    dispatched: AtomicUsize,
}

impl CountingDispatcher {
    pub fn available() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            accept_limit: None,
            dispatched: AtomicUsize::new(0),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            accept_limit: None,
            dispatched: AtomicUsize::new(0),
        })
    }

    /// Accept `limit` gestures, then reject every following one.
    pub fn accepting(limit: usize) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            accept_limit: Some(limit),
            dispatched: AtomicUsize::new(0),
        })
    }

    pub fn count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GestureDispatcher for CountingDispatcher {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn dispatch(&self, _gesture: &SwipeGesture) -> Result<()> {
        let n = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        match self.accept_limit {
            Some(limit) if n > limit => Err(anyhow!("end of scrollable content")),
            _ => Ok(()),
        }
    }
}

/// Sink that keeps every delivered composite.
#[derive(Default)]
pub struct CollectingSink {
    reject: bool,
    results: Mutex<Vec<StitchResult>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject: true,
            results: Mutex::new(Vec::new()),
        })
    }

    pub fn results(&self) -> Vec<StitchResult> {
        self.results.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrSink for CollectingSink {
    async fn deliver(&self, result: StitchResult) -> Result<()> {
        self.results.lock().unwrap().push(result);
        if self.reject {
            bail!("recognizer busy");
        }
        Ok(())
    }
}

/// Notifier that records every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl UserNotifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
