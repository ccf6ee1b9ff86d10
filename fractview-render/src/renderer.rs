use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use fractview_core::{Formula, Fractal, FractalParams, Julia, Mandelbrot, Viewport};

use crate::error::RenderError;
use crate::scalar_field::{ScalarField, ScalarMode};
use crate::tile::{build_tile_grid, Tile};

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Generation counter shared between a render and whoever may supersede it.
///
/// Advancing the generation makes every tile that has not started yet skip
/// its work. Tiles already running finish normally; there is no mid-loop
/// interruption. Progress counters let a front end show how far along a pass is.
#[derive(Debug, Default)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// `(tiles done, tiles total)` of the most recent pass.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A finished (or abandoned) render pass.
#[derive(Debug)]
pub struct RenderResult {
    pub field: ScalarField,
    pub elapsed: Duration,
    /// `true` when the generation advanced during the pass; `field` is then
    /// incomplete and should be discarded.
    pub cancelled: bool,
    pub tiles_rendered: usize,
}

impl RenderResult {
    pub fn into_field(self) -> crate::Result<ScalarField> {
        if self.cancelled {
            Err(RenderError::Cancelled)
        } else {
            Ok(self.field)
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Compute the escape-time scalar field for `viewport` under `params`.
///
/// Every pixel `(x, y)` holds the iteration count of
/// `params.iterate(viewport.pixel_to_complex(x, y))`. The output always has
/// the viewport's dimensions.
pub fn render(viewport: &Viewport, params: &FractalParams) -> ScalarField {
    dispatch(viewport, params, ScalarMode::Count, &RenderCancel::new()).field
}

/// Like [`render`], with a choice of scalar and a cancellation handle.
pub fn render_with(
    viewport: &Viewport,
    params: &FractalParams,
    mode: ScalarMode,
    cancel: &RenderCancel,
) -> crate::Result<RenderResult> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(dispatch(viewport, params, mode, cancel))
}

/// Pick the concrete formula once so the per-pixel loop is monomorphic.
fn dispatch(
    viewport: &Viewport,
    params: &FractalParams,
    mode: ScalarMode,
    cancel: &RenderCancel,
) -> RenderResult {
    match params.formula {
        Formula::Mandelbrot => render_fractal(&Mandelbrot::from_params(params), viewport, mode, cancel),
        Formula::Julia { c } => render_fractal(&Julia::from_params(c, params), viewport, mode, cancel),
    }
}

/// Tiled, multithreaded render of any [`Fractal`].
///
/// Tiles are independent: each produces its own vector of values which is
/// then copied into a disjoint region of the output.
pub fn render_fractal<F: Fractal + Sync>(
    fractal: &F,
    viewport: &Viewport,
    mode: ScalarMode,
    cancel: &RenderCancel,
) -> RenderResult {
    let start = Instant::now();
    let gen = cancel.generation();
    let max_iterations = fractal.max_iterations();

    let tiles = build_tile_grid(viewport.width, viewport.height);
    debug!(
        tile_count = tiles.len(),
        width = viewport.width,
        height = viewport.height,
        scale = viewport.scale,
        "Starting tiled render"
    );
    cancel.reset_progress(tiles.len());

    let tile_data: Vec<Option<Vec<f64>>> = tiles
        .par_iter()
        .map(|tile| {
            if cancel.generation() != gen {
                return None;
            }
            let data = render_tile(fractal, viewport, tile, mode);
            cancel.inc_progress();
            Some(data)
        })
        .collect();

    let mut field = ScalarField::new(viewport.width, viewport.height, max_iterations, mode);
    let mut tiles_rendered = 0;
    for (tile, data) in tiles.iter().zip(&tile_data) {
        if let Some(d) = data {
            field.blit_tile(tile, d);
            tiles_rendered += 1;
        }
    }

    let cancelled = cancel.generation() != gen || tiles_rendered < tiles.len();
    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        tiles_rendered, cancelled, "Render complete"
    );

    RenderResult {
        field,
        elapsed,
        cancelled,
        tiles_rendered,
    }
}

fn render_tile<F: Fractal>(fractal: &F, viewport: &Viewport, tile: &Tile, mode: ScalarMode) -> Vec<f64> {
    let max_iterations = fractal.max_iterations();
    let mut data = Vec::with_capacity(tile.pixel_count());
    for py in tile.y..tile.y + tile.height {
        for px in tile.x..tile.x + tile.width {
            let r = fractal.iterate(viewport.pixel_to_complex(px, py));
            data.push(match mode {
                ScalarMode::Count => r.count as f64,
                ScalarMode::Smooth => r.smooth_count(max_iterations),
            });
        }
    }
    data
}
