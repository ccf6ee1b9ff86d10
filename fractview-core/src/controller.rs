use tracing::debug;

use crate::complex::Complex;
use crate::history::ViewHistory;
use crate::selection::SelectionRegion;
use crate::viewport::Viewport;

/// Owns the current [`Viewport`] and its undo history.
///
/// Every mutation is synchronous; callers hand copies of
/// [`viewport`](Self::viewport) to the renderer so a render never observes a
/// half-applied change. Operations that would produce an invalid viewport
/// are ignored and report `false`.
#[derive(Debug, Clone)]
pub struct ViewportController {
    current: Viewport,
    history: ViewHistory,
}

impl ViewportController {
    pub fn new(initial: Viewport) -> Self {
        Self {
            current: initial,
            history: ViewHistory::new(),
        }
    }

    /// Snapshot of the current view.
    pub fn viewport(&self) -> Viewport {
        self.current
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Translate the view by a pixel delta. Content follows the pointer, so
    /// dragging right moves the center left. Not recorded in history.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.current.center.re -= dx * self.current.scale;
        self.current.center.im += dy * self.current.scale;
    }

    /// Zoom so `region` fills the image without distorting the aspect ratio.
    ///
    /// The new center is the selection's plane-space centroid; the new scale is
    /// whichever axis needs more plane units per pixel.
    pub fn zoom_to_selection(&mut self, region: &SelectionRegion) -> bool {
        if region.is_degenerate() {
            debug!(?region, "Ignoring degenerate selection");
            return false;
        }

        let vp = self.current;
        let (x, y) = region.origin;
        let (w, h) = region.size;
        let top_left = vp.to_plane(x, y);
        let bottom_right = vp.to_plane(x + w, y + h);
        let plane_w = (bottom_right.re - top_left.re).abs();
        let plane_h = (top_left.im - bottom_right.im).abs();

        let (cx, cy) = region.center();
        let center = vp.to_plane(cx, cy);
        let scale = (plane_w / vp.width as f64).max(plane_h / vp.height as f64);

        self.commit(center, scale)
    }

    /// Scale the view by `factor` about a pixel, keeping the plane point under
    /// that pixel fixed. `factor < 1` zooms in.
    pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let anchor = self.current.to_plane(px, py);
        let center = anchor + (self.current.center - anchor) * factor;
        let scale = self.current.scale * factor;
        self.commit(center, scale)
    }

    /// Jump to `home` (at the current image size), recording the old view.
    pub fn reset_to(&mut self, home: Viewport) -> bool {
        self.commit(home.center, home.scale)
    }

    /// Restore the most recent snapshot.
    ///
    /// Center and scale come back bit-for-bit; the image dimensions stay at
    /// their current values so the view keeps matching the display.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = Viewport {
                    width: self.current.width,
                    height: self.current.height,
                    ..previous
                };
                debug!(
                    remaining = self.history.len(),
                    scale = self.current.scale,
                    "Undo"
                );
                true
            }
            None => false,
        }
    }

    /// Track a new display size. Center and scale are kept; no history entry.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.current.width && height == self.current.height {
            return false;
        }
        self.current.width = width;
        self.current.height = height;
        true
    }

    /// Validate and apply a new center/scale, pushing the old view.
    fn commit(&mut self, center: Complex, scale: f64) -> bool {
        let next = match Viewport::new(center, scale, self.current.width, self.current.height) {
            Ok(vp) => vp,
            Err(e) => {
                debug!(error = %e, "Rejected view change");
                return false;
            }
        };
        if next == self.current {
            return false;
        }
        self.history.push(self.current);
        self.current = next;
        debug!(
            re = next.center.re,
            im = next.center.im,
            scale = next.scale,
            depth = self.history.len(),
            "View committed"
        );
        true
    }
}
