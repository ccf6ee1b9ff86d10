use serde::{Deserialize, Serialize};

/// A rubber-band rectangle in pixel space, produced by a completed drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRegion {
    /// Top-left corner in pixels.
    pub origin: (f64, f64),
    /// Width and height in pixels.
    pub size: (f64, f64),
}

impl SelectionRegion {
    pub fn new(origin: (f64, f64), size: (f64, f64)) -> Self {
        Self { origin, size }
    }

    /// Build from two opposite drag corners in any order.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            origin: (a.0.min(b.0), a.1.min(b.1)),
            size: ((a.0 - b.0).abs(), (a.1 - b.1).abs()),
        }
    }

    /// Zero, negative, or non-finite extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        let (w, h) = self.size;
        !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite())
            || !(self.origin.0.is_finite() && self.origin.1.is_finite())
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.origin.0 + self.size.0 / 2.0,
            self.origin.1 + self.size.1 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_in_any_order() {
        let a = SelectionRegion::from_corners((600.0, 450.0), (200.0, 150.0));
        assert_eq!(a, SelectionRegion::new((200.0, 150.0), (400.0, 300.0)));
        assert_eq!(a.center(), (400.0, 300.0));
    }

    #[test]
    fn degenerate_extents() {
        assert!(SelectionRegion::new((10.0, 10.0), (0.0, 5.0)).is_degenerate());
        assert!(SelectionRegion::new((10.0, 10.0), (5.0, 0.0)).is_degenerate());
        assert!(SelectionRegion::new((10.0, 10.0), (-5.0, 5.0)).is_degenerate());
        assert!(SelectionRegion::new((10.0, 10.0), (f64::NAN, 5.0)).is_degenerate());
        assert!(!SelectionRegion::new((10.0, 10.0), (1.0, 1.0)).is_degenerate());
    }
}
