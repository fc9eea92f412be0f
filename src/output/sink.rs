//! # Result Delivery
//!
//! The composite leaves the pipeline through an [`OcrSink`]. The text-recognition
//! stage that normally sits behind it is outside this crate; [`PngFileSink`]
//! writes the composite to disk instead, which is what the CLI uses.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use cap_stitch::StitchResult;

/// Downstream consumer of stitched captures.
#[async_trait]
pub trait OcrSink: Send + Sync {
    /// Take ownership of one composite. Called at most once per capture session.
    async fn deliver(&self, result: StitchResult) -> Result<()>;
}

/// Writes each delivered composite to a fixed image path.
#[derive(Debug, Clone)]
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    /// The output format follows the path's extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OcrSink for PngFileSink {
    async fn deliver(&self, result: StitchResult) -> Result<()> {
        let path = self.path.clone();
        let (width, height) = (result.width(), result.height());
        tokio::task::spawn_blocking(move || result.page.into_image().save(&path))
            .await
            .context("image writer task panicked")?
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), width, height, "composite written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_stitch::{stitch, Page};
    use image::{Rgba, RgbaImage};

    #[tokio::test]
    async fn png_sink_writes_composite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composite.png");
        let sink = PngFileSink::new(&path);

        let page = Page::new(0, RgbaImage::from_pixel(12, 30, Rgba([10, 20, 30, 255])));
        sink.deliver(stitch(vec![page]).unwrap()).await.unwrap();

        let written = image::open(&path).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (12, 30));
        assert_eq!(*written.get_pixel(5, 5), Rgba([10, 20, 30, 255]));
    }
}
