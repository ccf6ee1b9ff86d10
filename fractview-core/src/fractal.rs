use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::julia::Julia;
use crate::mandelbrot::Mandelbrot;

/// Outcome of iterating a single point.
///
/// `count` is the number of completed iterations before the escaping step, so
/// an escaped point always has `count < max_iterations`. A point that never
/// escapes reports `count == max_iterations`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationResult {
    pub count: u32,
    pub escaped: bool,
    /// `|z|²` at the moment of escape, or the last value computed for an
    /// interior point (`0.0` when the point was classified without iterating).
    pub final_norm_sq: f64,
}

impl IterationResult {
    #[inline]
    pub fn escaped(count: u32, norm_sq: f64) -> Self {
        Self {
            count,
            escaped: true,
            final_norm_sq: norm_sq,
        }
    }

    #[inline]
    pub fn interior(max_iterations: u32, norm_sq: f64) -> Self {
        Self {
            count: max_iterations,
            escaped: false,
            final_norm_sq: norm_sq,
        }
    }

    /// Continuous escape count `n + 1 − ln(ln|z|) / ln 2`, clamped to
    /// `[0, max_iterations]`. Interior points return `max_iterations`.
    pub fn smooth_count(&self, max_iterations: u32) -> f64 {
        let max = max_iterations as f64;
        if !self.escaped {
            return max;
        }
        let log_zn = self.final_norm_sq.ln() * 0.5;
        if log_zn <= 0.0 {
            return (self.count as f64).min(max);
        }
        let nu = self.count as f64 + 1.0 - log_zn.ln() / std::f64::consts::LN_2;
        if nu.is_finite() {
            nu.clamp(0.0, max)
        } else {
            self.count as f64
        }
    }
}

/// Which quadratic map a view iterates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formula {
    /// `z ← z² + p` from `z₀ = 0`, `p` the plane point.
    #[default]
    Mandelbrot,
    /// `z ← z² + c` from `z₀ = p`, `c` fixed.
    Julia { c: Complex },
}

impl Formula {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia { .. } => "Julia",
        }
    }
}

/// Iteration cap, bailout radius, and formula for one view.
///
/// The squared radius is cached for the inner loop and recomputed on
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FractalParams {
    pub max_iterations: u32,
    pub escape_radius: f64,
    pub formula: Formula,
    #[serde(skip)]
    escape_radius_sq: f64,
}

impl<'de> Deserialize<'de> for FractalParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            max_iterations: u32,
            escape_radius: f64,
            #[serde(default)]
            formula: Formula,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.max_iterations, raw.escape_radius, raw.formula)
            .map_err(serde::de::Error::custom)
    }
}

impl FractalParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 256;
    pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

    pub fn new(max_iterations: u32, escape_radius: f64, formula: Formula) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        if escape_radius <= 0.0 || !escape_radius.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(escape_radius));
        }
        Ok(Self {
            max_iterations,
            escape_radius,
            formula,
            escape_radius_sq: escape_radius * escape_radius,
        })
    }

    pub fn mandelbrot(max_iterations: u32, escape_radius: f64) -> crate::Result<Self> {
        Self::new(max_iterations, escape_radius, Formula::Mandelbrot)
    }

    pub fn julia(c: Complex, max_iterations: u32, escape_radius: f64) -> crate::Result<Self> {
        Self::new(max_iterations, escape_radius, Formula::Julia { c })
    }

    #[inline]
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }

    /// Same cap and radius, different formula.
    pub fn with_formula(self, formula: Formula) -> Self {
        Self { formula, ..self }
    }

    /// Iterate `point` with whichever formula these parameters select.
    #[inline]
    pub fn iterate(&self, point: Complex) -> IterationResult {
        match self.formula {
            Formula::Mandelbrot => Mandelbrot::from_params(self).iterate(point),
            Formula::Julia { c } => Julia::from_params(c, self).iterate(point),
        }
    }
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            escape_radius: Self::DEFAULT_ESCAPE_RADIUS,
            formula: Formula::Mandelbrot,
            escape_radius_sq: Self::DEFAULT_ESCAPE_RADIUS * Self::DEFAULT_ESCAPE_RADIUS,
        }
    }
}

/// Free-function form of [`FractalParams::iterate`].
#[inline]
pub fn iterate(point: Complex, params: &FractalParams) -> IterationResult {
    params.iterate(point)
}

/// An escape-time formula with its limits baked in.
///
/// Renderers are generic over `F: Fractal` so the inner loop is
/// monomorphised and inlined; `iterate` must be pure so it can run on any
/// thread.
pub trait Fractal {
    fn iterate(&self, point: Complex) -> IterationResult;

    fn max_iterations(&self) -> u32;
}

/// Brent-style cycle detector shared by both formulas.
///
/// Remembers one orbit value and replaces it at doubling intervals. Iteration
/// is deterministic, so once `z` equals the saved value bit for bit the orbit
/// repeats forever and can never escape. Near-misses are not cycles: orbits
/// close to a parabolic point creep by less than any fixed tolerance and still
/// escape eventually.
pub(crate) struct CycleCheck {
    saved: Complex,
    steps: u32,
    window: u32,
}

impl CycleCheck {
    #[inline]
    pub(crate) fn new(start: Complex) -> Self {
        Self {
            saved: start,
            steps: 0,
            window: 3,
        }
    }

    /// Returns `true` once `z` repeats the saved orbit value.
    #[inline]
    pub(crate) fn is_periodic(&mut self, z: Complex) -> bool {
        if z.re.to_bits() == self.saved.re.to_bits() && z.im.to_bits() == self.saved.im.to_bits() {
            return true;
        }
        self.steps += 1;
        if self.steps > self.window {
            self.saved = z;
            self.steps = 0;
            self.window = self.window.saturating_mul(2);
        }
        false
    }
}
