//! # Frame Sources
//!
//! The screen-capture surface is a platform collaborator. The orchestrator only
//! sees it through [`FrameSource`], the same acquire/release contract a
//! projection-backed image reader offers: open it at full-screen size, pull frames
//! one at a time, release it.
//!
//! Frames are full-screen RGBA8 with a row stride that may exceed `width * 4`.
//! Padding columns are treated as part of the frame when cropping, so a region
//! touching the right edge can include them.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use image::RgbaImage;

use crate::core::{Region, ScreenSize};
use crate::error::{CaptureError, CaptureResult};

const BYTES_PER_PIXEL: usize = 4;

/// One full-screen capture as delivered by the platform.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// RGBA8 pixel rows. Length must be at least `stride * height`.
    pub data: Arc<Vec<u8>>,
    /// Visible width in pixels.
    pub width: u32,
    pub height: u32,
    /// Bytes per row (may exceed `width * 4` due to padding)
    pub stride: usize,
}

impl RawFrame {
    pub fn new(data: Arc<Vec<u8>>, width: u32, height: u32, stride: usize) -> Self {
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    /// Wrap a packed image with no row padding.
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(
            Arc::new(image.into_raw()),
            width,
            height,
            width as usize * BYTES_PER_PIXEL,
        )
    }

    /// Width in pixels including row padding.
    pub fn padded_width(&self) -> u32 {
        u32::try_from(self.stride / BYTES_PER_PIXEL).unwrap_or(u32::MAX)
    }

    /// Copy the part of the frame covered by `region` into a packed image.
    ///
    /// The origin is clamped to zero and the size to what remains of the frame, so
    /// a region hanging off any edge is cut rather than rejected. A region that
    /// leaves nothing after clamping, such as the zero-height band of a tap, is
    /// [`CaptureError::EmptyCrop`].
    pub fn crop(&self, region: Region) -> CaptureResult<RgbaImage> {
        let left = i64::from(region.left.max(0));
        let top = i64::from(region.top.max(0));
        let width = i64::from(region.width()).min(i64::from(self.padded_width()) - left);
        let height = i64::from(region.height()).min(i64::from(self.height) - top);

        if width <= 0 || height <= 0 {
            return Err(CaptureError::empty_crop(
                region,
                self.padded_width(),
                self.height,
            ));
        }

        // all four values are non-negative and bounded by the frame here
        let (left, top) = (left as usize, top as usize);
        let (width, height) = (width as usize, height as usize);
        let row_bytes = width * BYTES_PER_PIXEL;
        let needed = (top + height - 1) * self.stride + left * BYTES_PER_PIXEL + row_bytes;
        if needed > self.data.len() {
            return Err(CaptureError::processing(
                "crop",
                format!(
                    "frame buffer holds {} bytes, crop needs {}",
                    self.data.len(),
                    needed
                ),
            ));
        }

        let mut pixels = Vec::with_capacity(row_bytes * height);
        for row in top..top + height {
            let start = row * self.stride + left * BYTES_PER_PIXEL;
            pixels.extend_from_slice(&self.data[start..start + row_bytes]);
        }

        RgbaImage::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| CaptureError::processing("crop", "pixel buffer size mismatch"))
    }
}

/// Abstract interface for the screen-capture surface.
#[async_trait]
pub trait FrameSource: Send {
    /// Short name used in errors and logs.
    fn name(&self) -> &str {
        "frame source"
    }

    /// Opens the surface at the given full-screen size.
    async fn initialize(&mut self, screen: ScreenSize) -> Result<()>;

    /// Acquires the latest frame.
    async fn capture_frame(&mut self) -> Result<RawFrame>;

    /// Native size of the frames this source produces.
    fn input_size(&self) -> ScreenSize;

    /// Releases the surface. Called once per session, on success and on abort.
    async fn shutdown(&mut self) -> Result<()>;
}
