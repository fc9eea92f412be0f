//! # Diagnostics
//!
//! Fields an external debug view renders after each capture: the last region, the
//! composite size and stitch report, OCR text placeholders filled in by the
//! text-recognition stage, and a bounded error log.
//!
//! The pipeline only populates these. Rendering is limited to a plain-text report
//! and a JSON export.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cap_stitch::{StitchReport, StitchResult};
use serde_json::{json, Value};

use crate::core::Region;
use crate::error::CaptureError;

/// Oldest entries are dropped beyond this many errors.
pub const MAX_ERROR_LOG: usize = 32;

/// Point-in-time copy of the diagnostic fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticsSnapshot {
    pub last_region: Option<Region>,
    pub composite_size: Option<(u32, u32)>,
    pub page_count: usize,
    pub last_report: Option<StitchReport>,
    pub raw_text: String,
    pub filtered_text: String,
    pub errors: VecDeque<String>,
}

/// Shared, internally synchronized diagnostic state.
#[derive(Debug, Default)]
pub struct Diagnostics {
    inner: Mutex<DiagnosticsSnapshot>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DiagnosticsSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start of a capture: remember the region and forget the previous composite.
    pub fn record_region(&self, region: Region) {
        let mut inner = self.lock();
        inner.last_region = Some(region);
        inner.composite_size = None;
        inner.page_count = 0;
        inner.last_report = None;
    }

    pub fn record_composite(&self, page_count: usize, result: &StitchResult) {
        let mut inner = self.lock();
        inner.composite_size = Some((result.width(), result.height()));
        inner.page_count = page_count;
        inner.last_report = Some(result.report.clone());
    }

    pub fn record_error(&self, error: &CaptureError) {
        let mut inner = self.lock();
        if inner.errors.len() == MAX_ERROR_LOG {
            inner.errors.pop_front();
        }
        inner.errors.push_back(format!("[{}] {}", error.category(), error));
    }

    /// Filled in by the text-recognition stage once it has run on the composite.
    pub fn record_text(&self, raw: impl Into<String>, filtered: impl Into<String>) {
        let mut inner = self.lock();
        inner.raw_text = raw.into();
        inner.filtered_text = filtered.into();
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        self.lock().clone()
    }

    /// JSON export for debug tooling.
    pub fn to_json(&self) -> Value {
        let inner = self.lock();
        json!({
            "region": inner.last_region.map(|r| json!({
                "left": r.left,
                "top": r.top,
                "right": r.right,
                "bottom": r.bottom,
            })),
            "composite": inner.composite_size.map(|(w, h)| json!({ "width": w, "height": h })),
            "pages": inner.page_count,
            "overlaps": inner.last_report.as_ref().map(|r| r.overlaps.clone()),
            "dropped_pages": inner.last_report.as_ref().map(|r| r.dropped_pages),
            "truncated": inner.last_report.as_ref().map(|r| r.truncated),
            "raw_text": inner.raw_text,
            "filtered_text": inner.filtered_text,
            "errors": inner.errors,
        })
    }

    /// Human-readable report in the layout of the debug console.
    pub fn render_report(&self) -> String {
        let inner = self.lock();
        let mut out = String::from("=== DEBUG REPORT ===\n");
        if !inner.errors.is_empty() {
            out.push_str("!! ERRORS FOUND !!\n");
            for error in &inner.errors {
                out.push_str(error);
                out.push('\n');
            }
            out.push('\n');
        }
        if let Some(region) = inner.last_region {
            out.push_str(&format!(
                "Crop lines: top Y={} | bottom Y={}\n",
                region.top, region.bottom
            ));
        }
        match inner.composite_size {
            Some((w, h)) => out.push_str(&format!(
                "Image size: W={} x H={} ({} pages)\n",
                w, h, inner.page_count
            )),
            None => out.push_str("Image: none (capture failed)\n"),
        }
        out.push_str("----------------------------\n");
        out.push_str(&format!("FILTERED RESULT:\n[{}]\n", inner.filtered_text));
        out.push_str("----------------------------\n");
        out.push_str(&format!("RAW OCR TEXT:\n{}", inner.raw_text));
        out
    }
}
