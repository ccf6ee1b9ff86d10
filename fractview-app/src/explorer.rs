//! The single owner of interactive state.
//!
//! Every mutation runs synchronously on the caller's thread. Rendering sees
//! only copies: [`Explorer::sync`] hands the worker a snapshot whenever the
//! primary view or the Julia panel has changed since the last request, and
//! frames coming back are kept only while they still describe what is shown.

use tracing::{debug, info};

use fractview_core::{
    Complex, FractalParams, JuliaLinkage, SelectionRegion, Viewport, ViewportController,
};
use fractview_render::{ScalarField, ScalarMode};

use crate::error::AppError;
use crate::input::{DragTracker, PointerEvent, PointerGesture};
use crate::preferences::AppPreferences;
use crate::render_bridge::{Frame, RenderWorker, View};
use crate::script::SessionEvent;

/// Maps scroll delta to a scale factor.
pub const ZOOM_SPEED: f64 = 0.003;

/// What the last primary request was made for.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PrimaryKey {
    viewport: Viewport,
    params: FractalParams,
    mode: ScalarMode,
}

pub struct Explorer {
    controller: ViewportController,
    julia: JuliaLinkage,
    params: FractalParams,
    mode: ScalarMode,
    tracker: DragTracker,

    requested_primary: Option<PrimaryKey>,
    /// Julia revision and mode of the last auxiliary request.
    requested_julia: Option<(u64, ScalarMode)>,

    primary_frame: Option<Frame>,
    julia_frame: Option<Frame>,
    /// What `julia_frame` was requested for.
    julia_frame_key: Option<(u64, ScalarMode)>,
}

impl Explorer {
    pub fn new(prefs: &AppPreferences) -> Result<Self, AppError> {
        let viewport = Viewport::default_mandelbrot(prefs.image_width, prefs.image_height);
        Ok(Self {
            controller: ViewportController::new(viewport),
            julia: JuliaLinkage::new(
                prefs.julia_panel_width,
                prefs.julia_panel_height,
                prefs.julia_params()?,
            ),
            params: prefs.primary_params()?,
            mode: prefs.scalar_mode,
            tracker: DragTracker::new(),
            requested_primary: None,
            requested_julia: None,
            primary_frame: None,
            julia_frame: None,
            julia_frame_key: None,
        })
    }

    // -- Queries ------------------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    pub fn params(&self) -> FractalParams {
        self.params
    }

    pub fn can_undo(&self) -> bool {
        self.controller.can_undo()
    }

    pub fn current_julia_point(&self) -> Option<Complex> {
        self.julia.current_point()
    }

    pub fn auxiliary_visible(&self) -> bool {
        self.julia.is_visible()
    }

    pub fn auxiliary_viewport(&self) -> Viewport {
        self.julia.auxiliary_viewport()
    }

    pub fn auxiliary_params(&self) -> Option<FractalParams> {
        self.julia.auxiliary_params()
    }

    pub fn julia_label(&self) -> Option<String> {
        self.julia.point_label()
    }

    /// Rubber band of an in-progress primary drag.
    pub fn selection_rect(&self) -> Option<SelectionRegion> {
        self.tracker.selection_rect()
    }

    /// Frame of the current primary view, or `None` while the view has moved
    /// on and its render is still outstanding.
    pub fn primary_field(&self) -> Option<&ScalarField> {
        self.primary_frame
            .as_ref()
            .filter(|f| f.viewport == self.controller.viewport() && f.field.mode == self.mode)
            .map(|f| &f.field)
    }

    /// Frame of the open Julia panel at its current point, size and mode.
    pub fn julia_field(&self) -> Option<&ScalarField> {
        if !self.julia.is_visible() || self.julia_frame_key != Some(self.julia_key()) {
            return None;
        }
        self.julia_frame.as_ref().map(|f| &f.field)
    }

    fn julia_key(&self) -> (u64, ScalarMode) {
        (self.julia.revision(), self.mode)
    }

    // -- Mutations ----------------------------------------------------------

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.controller.pan(dx, dy);
    }

    pub fn zoom_to_selection(&mut self, region: &SelectionRegion) -> bool {
        self.controller.zoom_to_selection(region)
    }

    /// Scroll-wheel zoom about a pixel. Positive `delta` zooms in.
    pub fn wheel(&mut self, px: f64, py: f64, delta: f64) -> bool {
        let factor = (1.0 - delta * ZOOM_SPEED).clamp(0.1, 10.0);
        self.controller.zoom_at(px, py, factor)
    }

    pub fn undo(&mut self) -> bool {
        self.controller.undo()
    }

    /// Back to the default Mandelbrot framing at the current size.
    pub fn reset(&mut self) -> bool {
        let vp = self.controller.viewport();
        self.controller
            .reset_to(Viewport::default_mandelbrot(vp.width, vp.height))
    }

    /// Pick the Julia constant under a pixel of the primary view.
    ///
    /// Clicks outside the image are ignored and return `None`.
    pub fn click(&mut self, px: f64, py: f64) -> Option<Complex> {
        let vp = self.controller.viewport();
        let inside = px >= 0.0 && py >= 0.0 && px < vp.width as f64 && py < vp.height as f64;
        if !inside {
            debug!(px, py, "Click outside image");
            return None;
        }
        let c = self.julia.on_point_clicked(px, py, &vp);
        info!("Julia {}", c);
        Some(c)
    }

    pub fn close_julia(&mut self) {
        self.julia.close();
        self.julia_frame = None;
        self.julia_frame_key = None;
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.controller.resize(width, height)
    }

    pub fn resize_julia(&mut self, width: u32, height: u32) -> bool {
        self.julia.resize_auxiliary(width, height)
    }

    pub fn set_scalar_mode(&mut self, mode: ScalarMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Feed a raw pointer event; completed gestures are applied at once.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        match self.tracker.handle(event) {
            Some(PointerGesture::Pan { dx, dy }) => {
                self.pan(dx, dy);
                true
            }
            Some(PointerGesture::Select(region)) => self.zoom_to_selection(&region),
            Some(PointerGesture::Click { x, y }) => self.click(x, y).is_some(),
            None => false,
        }
    }

    /// Apply one recorded event. Returns whether any state changed.
    pub fn apply(&mut self, event: &SessionEvent) -> bool {
        match *event {
            SessionEvent::Resize { width, height } => self.resize(width, height),
            SessionEvent::ResizeJulia { width, height } => self.resize_julia(width, height),
            SessionEvent::SetMode { mode } => self.set_scalar_mode(mode),
            SessionEvent::Pan { dx, dy } => {
                self.pan(dx, dy);
                true
            }
            SessionEvent::Select {
                x,
                y,
                width,
                height,
            } => self.zoom_to_selection(&SelectionRegion::new((x, y), (width, height))),
            SessionEvent::Click { x, y } => self.click(x, y).is_some(),
            SessionEvent::Wheel { x, y, delta } => self.wheel(x, y, delta),
            SessionEvent::Undo => self.undo(),
            SessionEvent::Reset => self.reset(),
            SessionEvent::CloseJulia => {
                let was_open = self.auxiliary_visible();
                self.close_julia();
                was_open
            }
            SessionEvent::Pointer { event } => self.pointer(event),
        }
    }

    // -- Rendering ----------------------------------------------------------

    /// Request renders for whatever changed since the last call, and stop
    /// wanting a Julia frame once the panel is closed.
    pub fn sync(&mut self, worker: &mut RenderWorker) -> Result<(), AppError> {
        let key = PrimaryKey {
            viewport: self.controller.viewport(),
            params: self.params,
            mode: self.mode,
        };
        if self.requested_primary != Some(key) {
            worker.submit(View::Primary, key.viewport, key.params, key.mode)?;
            self.requested_primary = Some(key);
        }

        match self.julia.auxiliary_params() {
            Some(params) => {
                let key = self.julia_key();
                if self.requested_julia != Some(key) {
                    worker.submit(
                        View::Julia,
                        self.julia.auxiliary_viewport(),
                        params,
                        self.mode,
                    )?;
                    self.requested_julia = Some(key);
                }
            }
            None => {
                worker.abandon(View::Julia);
                self.requested_julia = None;
            }
        }
        Ok(())
    }

    /// Take any frames the worker has finished.
    pub fn poll(&mut self, worker: &mut RenderWorker) {
        for frame in worker.poll() {
            self.receive(frame);
        }
    }

    /// Sync, then block until both views have current frames.
    pub fn finish(&mut self, worker: &mut RenderWorker) -> Result<(), AppError> {
        self.sync(worker)?;
        for view in [View::Primary, View::Julia] {
            let mut others = Vec::new();
            let frame = worker.wait_for(view, |f| others.push(f))?;
            for f in others.into_iter().chain(frame) {
                self.receive(f);
            }
        }
        Ok(())
    }

    fn receive(&mut self, frame: Frame) {
        match frame.view {
            View::Primary => {
                if frame.viewport == self.controller.viewport() {
                    self.primary_frame = Some(frame);
                }
            }
            // The worker only delivers the newest request, so the frame
            // answers `requested_julia`.
            View::Julia => {
                if self.julia.is_visible() {
                    self.julia_frame = Some(frame);
                    self.julia_frame_key = self.requested_julia;
                }
            }
        }
    }
}
