use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// The window between the displayed image and the complex plane.
///
/// `center` sits at pixel `(width / 2, height / 2)` and every pixel spans
/// `scale` plane units on both axes. Pixel rows grow downward while the
/// imaginary axis grows upward, so the vertical mapping is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Plane coordinate at the middle of the image.
    pub center: Complex,

    /// Plane units per pixel.
    pub scale: f64,

    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, rejecting non-positive scale or empty dimensions.
    pub fn new(center: Complex, scale: f64, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("dimensions must be > 0, got {width}×{height}"),
            });
        }
        if scale <= 0.0 || !scale.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("scale must be positive and finite, got {scale}"),
            });
        }
        if !center.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("center must be finite, got {center}"),
            });
        }
        Ok(Self {
            center,
            scale,
            width,
            height,
        })
    }

    /// Whole Mandelbrot set in view, roughly `[-2.55, 1.05] × [-1.3, 1.3]`.
    ///
    /// Zero dimensions are bumped to one pixel so the result is always valid.
    pub fn default_mandelbrot(width: u32, height: u32) -> Self {
        Self::fitted(Complex::new(-0.75, 0.0), 3.6, 2.6, width, height)
    }

    /// Centred on the origin with `|z| < 2.1` visible on both axes.
    pub fn default_julia(width: u32, height: u32) -> Self {
        Self::fitted(Complex::ZERO, 4.2, 4.2, width, height)
    }

    /// Smallest scale that shows `span_re × span_im` without distortion.
    fn fitted(center: Complex, span_re: f64, span_im: f64, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let scale = (span_re / width as f64).max(span_im / height as f64);
        Self {
            center,
            scale,
            width,
            height,
        }
    }

    /// Map a (possibly fractional) pixel position to the complex plane.
    #[inline]
    pub fn to_plane(&self, px: f64, py: f64) -> Complex {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        Complex::new(
            self.center.re + (px - half_w) * self.scale,
            self.center.im - (py - half_h) * self.scale,
        )
    }

    /// Inverse of [`to_plane`](Self::to_plane).
    #[inline]
    pub fn to_pixel(&self, point: Complex) -> (f64, f64) {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        (
            (point.re - self.center.re) / self.scale + half_w,
            half_h - (point.im - self.center.im) / self.scale,
        )
    }

    /// Integer-pixel form of [`to_plane`](Self::to_plane), used by the renderer.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32) -> Complex {
        self.to_plane(px as f64, py as f64)
    }

    /// Width of the visible region in plane units.
    pub fn plane_width(&self) -> f64 {
        self.width as f64 * self.scale
    }

    /// Height of the visible region in plane units.
    pub fn plane_height(&self) -> f64 {
        self.height as f64 * self.scale
    }
}
