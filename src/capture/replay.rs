//! # Replay Sources
//!
//! Offline stand-ins for the platform collaborators, used by the `scrollcap replay`
//! command: full-screen screenshots on disk play the role of the capture surface,
//! and a dispatcher that accepts every gesture plays the role of the scroll
//! capability.
//!
//! Each call to `capture_frame` returns the next screenshot. Once the sequence is
//! exhausted the last screenshot repeats, which is what a real screen shows after
//! scrolling reaches the end of its content.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use image::RgbaImage;

use super::source::{FrameSource, RawFrame};
use crate::core::ScreenSize;
use crate::scroll::{GestureDispatcher, SwipeGesture};

enum Frames {
    Files(Vec<PathBuf>),
    Images(Vec<RgbaImage>),
}

/// Frame source that plays back a fixed sequence of screenshots.
pub struct ImageSequenceSource {
    pending: Frames,
    frames: Vec<RawFrame>,
    cursor: usize,
    open: bool,
}

impl ImageSequenceSource {
    /// Screenshots are read from disk when the source is initialized.
    pub fn from_paths(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self::with_frames(Frames::Files(paths.into_iter().map(Into::into).collect()))
    }

    pub fn from_images(images: Vec<RgbaImage>) -> Self {
        Self::with_frames(Frames::Images(images))
    }

    fn with_frames(pending: Frames) -> Self {
        Self {
            pending,
            frames: Vec::new(),
            cursor: 0,
            open: false,
        }
    }

    /// Frames handed out since the last initialize.
    pub fn frames_served(&self) -> usize {
        self.cursor
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    async fn load(&self) -> Result<Vec<RawFrame>> {
        match &self.pending {
            Frames::Images(images) => Ok(images.iter().cloned().map(RawFrame::from_image).collect()),
            Frames::Files(paths) => {
                let paths = paths.clone();
                tokio::task::spawn_blocking(move || {
                    paths
                        .iter()
                        .map(|path| {
                            image::open(path)
                                .with_context(|| format!("failed to read frame {}", path.display()))
                                .map(|img| RawFrame::from_image(img.to_rgba8()))
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .await
                .context("frame loader task panicked")?
            }
        }
    }
}

#[async_trait]
impl FrameSource for ImageSequenceSource {
    fn name(&self) -> &str {
        "image sequence"
    }

    async fn initialize(&mut self, screen: ScreenSize) -> Result<()> {
        let frames = self.load().await?;
        if frames.is_empty() {
            bail!("no frames to replay");
        }
        if let Some(frame) = frames
            .iter()
            .find(|f| f.width != screen.width || f.height != screen.height)
        {
            tracing::warn!(
                frame_width = frame.width,
                frame_height = frame.height,
                screen_width = screen.width,
                screen_height = screen.height,
                "replay frame does not match the screen size"
            );
        }
        self.frames = frames;
        self.cursor = 0;
        self.open = true;
        Ok(())
    }

    async fn capture_frame(&mut self) -> Result<RawFrame> {
        if !self.open {
            bail!("frame source is not initialized");
        }
        let index = self.cursor.min(self.frames.len().saturating_sub(1));
        let frame = self
            .frames
            .get(index)
            .cloned()
            .context("no frames to replay")?;
        self.cursor += 1;
        Ok(frame)
    }

    fn input_size(&self) -> ScreenSize {
        self.frames
            .first()
            .map(|f| ScreenSize::new(f.width, f.height))
            .unwrap_or(ScreenSize::new(0, 0))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}

/// Gesture capability that accepts every gesture without doing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayDispatcher;

#[async_trait]
impl GestureDispatcher for ReplayDispatcher {
    fn is_available(&self) -> bool {
        true
    }

    async fn dispatch(&self, gesture: &SwipeGesture) -> Result<()> {
        tracing::trace!(?gesture, "replayed scroll gesture");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[tokio::test]
    async fn replays_files_and_repeats_last_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (i, shade) in [10u8, 20].into_iter().enumerate() {
            let path = dir.path().join(format!("frame{i}.png"));
            RgbaImage::from_pixel(4, 6, Rgba([shade, 0, 0, 255]))
                .save(&path)
                .unwrap();
            paths.push(path);
        }

        let mut source = ImageSequenceSource::from_paths(paths);
        source.initialize(ScreenSize::new(4, 6)).await.unwrap();
        assert_eq!(source.input_size(), ScreenSize::new(4, 6));

        let mut shades = Vec::new();
        for _ in 0..3 {
            shades.push(source.capture_frame().await.unwrap().data[0]);
        }
        assert_eq!(shades, vec![10, 20, 20]);
        assert_eq!(source.frames_served(), 3);

        source.shutdown().await.unwrap();
        assert!(!source.is_open());
        assert!(source.capture_frame().await.is_err());
    }

    #[tokio::test]
    async fn missing_file_fails_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageSequenceSource::from_paths([dir.path().join("absent.png")]);
        let error = source.initialize(ScreenSize::new(4, 6)).await.unwrap_err();
        assert!(format!("{error:#}").contains("absent.png"));
    }

    #[tokio::test]
    async fn empty_sequence_fails_initialization() {
        let mut source = ImageSequenceSource::from_images(Vec::new());
        assert!(source.initialize(ScreenSize::new(4, 6)).await.is_err());
    }
}
