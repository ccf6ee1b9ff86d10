//! Linkage between a click on the primary (Mandelbrot) view and the
//! auxiliary Julia panel.

use tracing::debug;

use crate::complex::Complex;
use crate::fractal::{Formula, FractalParams};
use crate::viewport::Viewport;

/// Tracks the inspected point and the auxiliary panel's own viewport.
///
/// The panel is visible exactly when a point is selected. Every change bumps
/// [`revision`](Self::revision), so a render started for an older revision
/// can be recognised as stale and dropped.
#[derive(Debug, Clone)]
pub struct JuliaLinkage {
    point: Option<Complex>,
    viewport: Viewport,
    base_params: FractalParams,
    revision: u64,
}

impl JuliaLinkage {
    /// `base_params` supplies the iteration cap and escape radius for the
    /// auxiliary render; its formula is replaced by `Julia { c }`.
    pub fn new(width: u32, height: u32, base_params: FractalParams) -> Self {
        Self {
            point: None,
            viewport: Viewport::default_julia(width, height),
            base_params,
            revision: 0,
        }
    }

    /// Inspect the plane point under pixel `(px, py)` of the primary view.
    ///
    /// Opens the panel and re-centres the auxiliary viewport on its default.
    pub fn on_point_clicked(&mut self, px: f64, py: f64, primary: &Viewport) -> Complex {
        let c = primary.to_plane(px, py);
        self.point = Some(c);
        self.viewport = Viewport::default_julia(self.viewport.width, self.viewport.height);
        self.revision += 1;
        debug!(re = c.re, im = c.im, revision = self.revision, "Julia point selected");
        c
    }

    /// Clear the point and hide the panel.
    pub fn close(&mut self) {
        if self.point.take().is_some() {
            self.revision += 1;
            debug!(revision = self.revision, "Julia panel closed");
        }
    }

    pub fn current_point(&self) -> Option<Complex> {
        self.point
    }

    pub fn is_visible(&self) -> bool {
        self.point.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn auxiliary_viewport(&self) -> Viewport {
        self.viewport
    }

    /// Parameters for the auxiliary render, or `None` while hidden.
    pub fn auxiliary_params(&self) -> Option<FractalParams> {
        self.point
            .map(|c| self.base_params.with_formula(Formula::Julia { c }))
    }

    /// Follow a resize of the auxiliary panel. Zero sizes are ignored.
    pub fn resize_auxiliary(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if (width, height) == (self.viewport.width, self.viewport.height) {
            return false;
        }
        self.viewport = Viewport::default_julia(width, height);
        self.revision += 1;
        true
    }

    /// Caption for the panel, e.g. `c = -0.750000 + 0.100000i`.
    pub fn point_label(&self) -> Option<String> {
        self.point.map(|c| format!("c = {c:.6}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> Viewport {
        Viewport::new(Complex::ZERO, 0.004, 800, 600).unwrap()
    }

    fn link() -> JuliaLinkage {
        JuliaLinkage::new(300, 300, FractalParams::mandelbrot(200, 2.0).unwrap())
    }

    #[test]
    fn starts_hidden() {
        let l = link();
        assert_eq!(l.current_point(), None);
        assert!(!l.is_visible());
        assert!(l.auxiliary_params().is_none());
        assert!(l.point_label().is_none());
    }

    #[test]
    fn click_maps_through_primary_viewport() {
        let mut l = link();
        let c = l.on_point_clicked(500.0, 100.0, &primary());
        assert_eq!(c, primary().to_plane(500.0, 100.0));
        assert_eq!(l.current_point(), Some(c));
        assert!(l.is_visible());

        let params = l.auxiliary_params().unwrap();
        assert_eq!(params.formula, Formula::Julia { c });
        assert_eq!(params.max_iterations, 200);
    }

    #[test]
    fn close_clears_point_and_hides() {
        let mut l = link();
        l.on_point_clicked(10.0, 10.0, &primary());
        let rev = l.revision();
        l.close();
        assert_eq!(l.current_point(), None);
        assert!(!l.is_visible());
        assert!(l.revision() > rev);
        // Closing again changes nothing.
        let rev = l.revision();
        l.close();
        assert_eq!(l.revision(), rev);
    }

    #[test]
    fn each_click_bumps_revision_and_resets_viewport() {
        let mut l = link();
        l.on_point_clicked(10.0, 10.0, &primary());
        let r1 = l.revision();
        l.on_point_clicked(20.0, 10.0, &primary());
        assert!(l.revision() > r1);
        assert_eq!(l.auxiliary_viewport(), Viewport::default_julia(300, 300));
    }

    #[test]
    fn label_uses_six_decimals() {
        let mut l = link();
        l.on_point_clicked(400.0, 325.0, &primary());
        assert_eq!(l.point_label().unwrap(), "c = 0.000000 - 0.100000i");
    }

    #[test]
    fn resize_rejects_zero() {
        let mut l = link();
        assert!(!l.resize_auxiliary(0, 10));
        assert!(l.resize_auxiliary(200, 100));
        let vp = l.auxiliary_viewport();
        assert_eq!((vp.width, vp.height), (200, 100));
    }
}
