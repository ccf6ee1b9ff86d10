//! Frame producer: turns a viewport and fractal parameters into a
//! [`ScalarField`], splitting the work into tiles run on the Rayon pool.

pub mod error;
pub mod renderer;
pub mod scalar_field;
pub mod tile;

pub use error::RenderError;
pub use renderer::{render, render_fractal, render_with, RenderCancel, RenderResult};
pub use scalar_field::{ScalarField, ScalarMode};
pub use tile::TILE_SIZE;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
