//! # Capture Session
//!
//! The pages accumulated for one finalized selection. A session owns its pages
//! exclusively until they are handed to the stitcher; dropping the session
//! discards them.

use cap_stitch::Page;
use image::RgbaImage;

use crate::core::Region;

/// Upper bound on pages collected in one long capture.
pub const MAX_PAGES: usize = 5;

/// How many pages a session collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// One page, no scrolling.
    SingleShot,
    /// Scroll between pages until `page_cap` pages are collected.
    LongCapture { page_cap: usize },
}

impl CaptureMode {
    /// Mode for a selection outcome's long-capture flag.
    pub fn for_request(long_capture: bool) -> Self {
        if long_capture {
            Self::LongCapture {
                page_cap: MAX_PAGES,
            }
        } else {
            Self::SingleShot
        }
    }

    pub fn page_cap(self) -> usize {
        match self {
            Self::SingleShot => 1,
            Self::LongCapture { page_cap } => page_cap,
        }
    }

    pub fn is_long(self) -> bool {
        matches!(self, Self::LongCapture { .. })
    }
}

#[derive(Debug)]
pub struct CaptureSession {
    region: Region,
    mode: CaptureMode,
    pages: Vec<Page>,
}

impl CaptureSession {
    pub fn new(region: Region, mode: CaptureMode) -> Self {
        Self {
            region,
            mode,
            pages: Vec::with_capacity(mode.page_cap()),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a cropped capture as the next page and return the new page count.
    pub fn push(&mut self, image: RgbaImage) -> usize {
        let index = self.pages.len();
        self.pages.push(Page::new(index, image));
        self.pages.len()
    }

    /// Whether another scroll-and-capture round is due.
    pub fn wants_more(&self) -> bool {
        self.mode.is_long() && self.pages.len() < self.mode.page_cap()
    }

    /// Hand the pages over for compositing.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region {
        Region {
            left: 0,
            top: 0,
            right: 10,
            bottom: 10,
        }
    }

    #[test]
    fn single_shot_stops_after_first_page() {
        let mut session = CaptureSession::new(region(), CaptureMode::for_request(false));
        assert!(!session.wants_more());
        assert_eq!(session.push(RgbaImage::new(10, 10)), 1);
        assert!(!session.wants_more());
    }

    #[test]
    fn long_capture_stops_at_page_cap() {
        let mut session = CaptureSession::new(region(), CaptureMode::for_request(true));
        assert_eq!(session.mode(), CaptureMode::LongCapture { page_cap: MAX_PAGES });

        for expected in 1..=MAX_PAGES {
            assert!(session.wants_more());
            assert_eq!(session.push(RgbaImage::new(10, 10)), expected);
        }
        assert!(!session.wants_more());

        let indices: Vec<usize> = session.into_pages().iter().map(Page::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}
