// SPDX-License-Identifier: MIT
//! # Page Buffers and Stitch Outputs
//!
//! A [`Page`] is one cropped capture, stored as tightly packed RGBA8. Pages are
//! immutable once created; compositing always produces a new buffer.

use image::RgbaImage;

/// One captured, cropped pixel buffer with its position in the capture sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    index: usize,
    image: RgbaImage,
}

impl Page {
    /// Wrap an RGBA buffer as the `index`-th page of a capture.
    pub fn new(index: usize, image: RgbaImage) -> Self {
        Self { index, image }
    }

    /// Sequence index assigned at capture time.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the pixel data.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Release the page and take its pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// What happened while folding a page sequence into one composite.
///
/// Purely informational: nothing here changes the composite itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StitchReport {
    /// Overlap detected for each merged pair, in merge order.
    pub overlaps: Vec<u32>,
    /// Pages skipped because the composite canvas could not be allocated.
    pub dropped_pages: usize,
    /// Whether the height cap cut off part of at least one page.
    pub truncated: bool,
}

/// Final composite of a capture session.
#[derive(Clone, Debug, PartialEq)]
pub struct StitchResult {
    pub page: Page,
    pub report: StitchReport,
}

impl StitchResult {
    pub fn width(&self) -> u32 {
        self.page.width()
    }

    pub fn height(&self) -> u32 {
        self.page.height()
    }

    /// Total rows removed as duplicates across all merged pairs.
    pub fn total_overlap(&self) -> u64 {
        self.report.overlaps.iter().map(|&o| u64::from(o)).sum()
    }
}
