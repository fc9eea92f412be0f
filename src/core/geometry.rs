//! # Screen Geometry
//!
//! Points, screen dimensions and the normalized capture [`Region`].
//!
//! Touch coordinates arrive as floats in screen space. A [`Region`] is only ever
//! built from two corners through [`Region::from_corners`], which orders them, so
//! `left <= right` and `top <= bottom` hold for every region in the crate.

/// A pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the captured display in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A normalized screen rectangle in integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    /// Build a region from two arbitrary corners.
    ///
    /// Coordinates are ordered with `min`/`max` first and then truncated toward
    /// zero, matching how raw touch positions map onto pixels.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x) as i32,
            top: a.y.min(b.y) as i32,
            right: a.x.max(b.x) as i32,
            bottom: a.y.max(b.y) as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// The same vertical span stretched across the whole screen width.
    pub fn spanning_width(self, screen: ScreenSize) -> Self {
        Self {
            left: 0,
            right: screen.width as i32,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_ordered() {
        let region = Region::from_corners(Point::new(300.0, 900.5), Point::new(20.7, 100.2));
        assert_eq!(
            region,
            Region {
                left: 20,
                top: 100,
                right: 300,
                bottom: 900
            }
        );
        assert_eq!(region.width(), 280);
        assert_eq!(region.height(), 800);
    }

    #[test]
    fn spanning_width_keeps_vertical_span() {
        let region = Region::from_corners(Point::new(50.0, 40.0), Point::new(52.0, 41.0));
        let wide = region.spanning_width(ScreenSize::new(1080, 2400));
        assert_eq!((wide.left, wide.right), (0, 1080));
        assert_eq!((wide.top, wide.bottom), (40, 41));
    }
}
