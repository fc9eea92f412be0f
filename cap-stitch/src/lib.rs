// SPDX-License-Identifier: MIT
//! # cap-stitch: Vertical Stitching of Scrolled Screen Pages
//!
//! This crate merges a sequence of screen captures taken between scroll steps into
//! one tall composite. Consecutive pages usually share a band of rows (the content
//! that was still visible after the scroll); that band is detected and drawn once.
//!
//! ## Key Components
//!
//! - [`page`]: The [`Page`] buffer type and the [`StitchResult`] / [`StitchReport`] outputs
//! - [`overlap`]: Row-signature overlap detection between two pages
//! - [`compose`]: Pairwise compositing and the left fold over a page sequence
//!
//! ## Algorithm Summary
//!
//! For each `(top, bottom)` pair a reference row is taken 150px above the bottom of
//! `top` (20px for pages shorter than 300px) and searched for in the first third of
//! `bottom`. Rows are compared by sampling every 5th pixel; more than 90% exact
//! matches counts as the same row. The first hit wins. No hit means the pages are
//! stacked without removing anything.
//!
//! Composites never exceed [`compose::MAX_COMPOSITE_HEIGHT`] rows. When the canvas
//! for a pair cannot be allocated, the incoming page is dropped and the previous
//! composite is kept.
//!
//! ## Usage Example
//!
//! ```rust
//! use cap_stitch::{stitch, Page};
//! use image::RgbaImage;
//!
//! let pages = vec![
//!     Page::new(0, RgbaImage::new(320, 480)),
//!     Page::new(1, RgbaImage::new(320, 480)),
//! ];
//!
//! let result = stitch(pages).expect("at least one page");
//! assert_eq!(result.width(), 320);
//! ```
//!
//! ## Known Approximations
//!
//! - The scan is first-match and top-down, so near-uniform backgrounds can match
//!   before the true overlap is reached.
//! - Pages of different widths are cropped to the narrower width; there is no
//!   horizontal registration.

pub mod compose;
pub mod overlap;
pub mod page;

pub use compose::{merge, merge_pair, stitch, MAX_COMPOSITE_HEIGHT};
pub use overlap::{detect_overlap, rows_similar};
pub use page::{Page, StitchReport, StitchResult};
