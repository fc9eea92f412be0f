// SPDX-License-Identifier: MIT
//! # Page Compositing
//!
//! Pairwise vertical merge of pages and the left fold that turns a capture
//! sequence into one composite:
//!
//! ```text
//! composite_0 = pages[0]
//! composite_i = merge_pair(composite_(i-1), pages[i])
//! ```
//!
//! ## Bounded Growth
//!
//! The composite height is clamped to [`MAX_COMPOSITE_HEIGHT`]. Once the cap is
//! reached, rows of later pages that fall below it are silently cut off.
//!
//! ## Allocation Failure
//!
//! Canvases are allocated with `try_reserve_exact`. If the allocator refuses, the
//! pair degrades to the unchanged `top` composite and the incoming page is dropped.

use image::{imageops, RgbaImage};

use crate::overlap::detect_overlap;
use crate::page::{Page, StitchReport, StitchResult};

/// Composites are never taller than this.
pub const MAX_COMPOSITE_HEIGHT: u32 = 8000;

/// Outcome of merging one pair, before it is folded into the report.
struct PairMerge {
    page: Page,
    overlap: u32,
    dropped: bool,
    truncated: bool,
}

/// Merge an ordered page sequence into one composite page.
///
/// Returns `None` for an empty sequence and the page itself for a single page.
pub fn merge(pages: impl IntoIterator<Item = Page>) -> Option<Page> {
    stitch(pages).map(|result| result.page)
}

/// Like [`merge`], but also reports the overlaps found and any degradation.
pub fn stitch(pages: impl IntoIterator<Item = Page>) -> Option<StitchResult> {
    let mut pages = pages.into_iter();
    let first = pages.next()?;
    let mut report = StitchReport::default();

    let page = pages.fold(first, |top, bottom| {
        let merged = merge_pair_with(top, &bottom, try_alloc_canvas);
        report.overlaps.push(merged.overlap);
        report.dropped_pages += usize::from(merged.dropped);
        report.truncated |= merged.truncated;
        merged.page
    });

    tracing::debug!(
        width = page.width(),
        height = page.height(),
        pairs = report.overlaps.len(),
        dropped = report.dropped_pages,
        "stitch complete"
    );
    Some(StitchResult { page, report })
}

/// Draw `bottom` under `top`, removing the rows they share.
///
/// The result is `min(top.width, bottom.width)` wide and
/// `min(top.height + bottom.height - overlap, MAX_COMPOSITE_HEIGHT)` tall, and keeps
/// the sequence index of `top`. On allocation failure `top` is returned unchanged.
pub fn merge_pair(top: Page, bottom: &Page) -> Page {
    merge_pair_with(top, bottom, try_alloc_canvas).page
}

fn merge_pair_with<A>(top: Page, bottom: &Page, alloc: A) -> PairMerge
where
    A: FnOnce(u32, u32) -> Option<RgbaImage>,
{
    let overlap = detect_overlap(top.image(), bottom.image());
    let width = top.width().min(bottom.width());
    let full_height = (u64::from(top.height()) + u64::from(bottom.height()))
        .saturating_sub(u64::from(overlap));
    let truncated = full_height > u64::from(MAX_COMPOSITE_HEIGHT);
    let height = full_height.min(u64::from(MAX_COMPOSITE_HEIGHT)) as u32;

    let Some(mut canvas) = alloc(width, height) else {
        tracing::warn!(
            width,
            height,
            page = bottom.index(),
            "composite allocation failed, dropping page"
        );
        return PairMerge {
            page: top,
            overlap,
            dropped: true,
            truncated: false,
        };
    };

    imageops::replace(&mut canvas, top.image(), 0, 0);
    let bottom_y = i64::from(top.height()) - i64::from(overlap);
    imageops::replace(&mut canvas, bottom.image(), 0, bottom_y);

    if truncated {
        tracing::debug!(full_height, "composite reached height cap");
    }

    PairMerge {
        page: Page::new(top.index(), canvas),
        overlap,
        dropped: false,
        truncated,
    }
}

/// Allocate a zeroed RGBA canvas, or `None` if the allocator refuses.
fn try_alloc_canvas(width: u32, height: u32) -> Option<RgbaImage> {
    let len = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)?;
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(len).ok()?;
    buffer.resize(len, 0);
    RgbaImage::from_raw(width, height, buffer)
}
