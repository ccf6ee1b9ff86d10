//! Numeric core of FractView: complex arithmetic, the pixel ↔ plane mapping,
//! escape-time iteration, and the interactive view state built on them.

pub mod complex;
pub mod controller;
pub mod error;
pub mod fractal;
pub mod history;
pub mod julia;
pub mod julia_link;
pub mod mandelbrot;
pub mod selection;
pub mod viewport;

pub use complex::Complex;
pub use controller::ViewportController;
pub use error::CoreError;
pub use fractal::{iterate, Formula, Fractal, FractalParams, IterationResult};
pub use history::{ViewHistory, MAX_HISTORY};
pub use julia::Julia;
pub use julia_link::JuliaLinkage;
pub use mandelbrot::Mandelbrot;
pub use selection::SelectionRegion;
pub use viewport::Viewport;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
