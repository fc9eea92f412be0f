// SPDX-License-Identifier: MIT
//! # Overlap Detection
//!
//! Finds how many rows at the bottom of one page reappear at the top of the next.
//!
//! A single reference row is lifted from `top`, a fixed distance above its bottom
//! edge so that sticky footers and navigation bars do not take part in the match.
//! That row is then searched for in the first third of `bottom`.
//!
//! ## Tuning Constants
//!
//! | Constant | Value | Meaning |
//! |----------|-------|---------|
//! | [`REFERENCE_OFFSET`] | 150px | Distance of the reference row from the bottom of `top` |
//! | [`SMALL_REFERENCE_OFFSET`] | 20px | Offset used when `top` is shorter than [`SMALL_PAGE_HEIGHT`] |
//! | [`SEARCH_FRACTION`] | 3 | Only the first `top.height / 3` rows of `bottom` are scanned |
//! | [`SAMPLE_STRIDE`] | 5 | Every 5th pixel of a row is compared |
//! | [`SIMILARITY_THRESHOLD`] | 0.9 | Fraction of sampled pixels that must match exactly |

use image::RgbaImage;

pub const REFERENCE_OFFSET: u32 = 150;
pub const SMALL_REFERENCE_OFFSET: u32 = 20;
pub const SMALL_PAGE_HEIGHT: u32 = 300;
pub const SEARCH_FRACTION: u32 = 3;
pub const SAMPLE_STRIDE: usize = 5;
pub const SIMILARITY_THRESHOLD: f64 = 0.9;

const BYTES_PER_PIXEL: usize = 4;

/// Distance between the reference row and the bottom edge of a page of this height.
pub fn reference_offset(top_height: u32) -> u32 {
    if top_height < SMALL_PAGE_HEIGHT {
        SMALL_REFERENCE_OFFSET
    } else {
        REFERENCE_OFFSET
    }
}

/// Height in pixels of the band shared by the bottom of `top` and the top of `bottom`.
///
/// Returns `reference_offset(top.height()) + y` for the first row `y` of `bottom`
/// that matches the reference row, or 0 when nothing in the search window matches.
/// Only the common width of the two pages is compared.
pub fn detect_overlap(top: &RgbaImage, bottom: &RgbaImage) -> u32 {
    let width = top.width().min(bottom.width());
    let search_height = (top.height() / SEARCH_FRACTION).min(bottom.height());
    let offset = reference_offset(top.height());

    // Pages shorter than the offset have no usable reference row.
    let Some(reference_y) = top.height().checked_sub(offset) else {
        return 0;
    };

    let reference = row(top, reference_y, width);
    for y in 0..search_height {
        if rows_similar(reference, row(bottom, y, width)) {
            tracing::debug!(reference_y, matched_y = y, overlap = offset + y, "overlap found");
            return offset + y;
        }
    }

    tracing::debug!(search_height, "no overlap found, stacking pages");
    0
}

/// Compare two RGBA rows by sampling every [`SAMPLE_STRIDE`]th pixel.
///
/// Rows are similar when strictly more than [`SIMILARITY_THRESHOLD`] of the sampled
/// positions hold identical pixels. Rows of different lengths are compared over the
/// shorter one. Empty rows are never similar.
pub fn rows_similar(a: &[u8], b: &[u8]) -> bool {
    let (sampled, matched) = a
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(b.chunks_exact(BYTES_PER_PIXEL))
        .step_by(SAMPLE_STRIDE)
        .fold((0usize, 0usize), |(sampled, matched), (pa, pb)| {
            (sampled + 1, matched + usize::from(pa == pb))
        });

    matched as f64 > sampled as f64 * SIMILARITY_THRESHOLD
}

/// The first `width` pixels of row `y`, as raw RGBA bytes.
fn row(image: &RgbaImage, y: u32, width: u32) -> &[u8] {
    let stride = image.width() as usize * BYTES_PER_PIXEL;
    let start = y as usize * stride;
    &image.as_raw()[start..start + width as usize * BYTES_PER_PIXEL]
}
