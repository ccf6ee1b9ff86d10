use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::tile::Tile;

/// What each cell of a [`ScalarField`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarMode {
    /// Integer escape count; interior cells hold `max_iterations`.
    #[default]
    Count,
    /// Continuous escape value `n + 1 − ln(ln|z|)/ln 2`; interior cells hold
    /// `max_iterations`.
    Smooth,
}

/// Row-major per-pixel scalars from one render pass, before colouring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub mode: ScalarMode,
    data: Vec<f64>,
}

impl ScalarField {
    /// A field with every cell set to the interior value.
    pub fn new(width: u32, height: u32, max_iterations: u32, mode: ScalarMode) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            max_iterations,
            mode,
            data: vec![max_iterations as f64; size],
        }
    }

    /// Wrap existing values; `data.len()` must equal `width × height`.
    pub fn from_values(
        width: u32,
        height: u32,
        max_iterations: u32,
        mode: ScalarMode,
        data: Vec<f64>,
    ) -> crate::Result<Self> {
        if data.len() != width as usize * height as usize {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            max_iterations,
            mode,
            data,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Cell value divided by `max_iterations`, in `[0, 1]`.
    pub fn normalized(&self, x: u32, y: u32) -> Option<f64> {
        let max = self.max_iterations.max(1) as f64;
        self.get(x, y).map(|v| (v / max).clamp(0.0, 1.0))
    }

    /// One row of cells.
    pub fn row(&self, y: u32) -> Option<&[f64]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.data[start..start + w])
    }

    /// Copy a tile's values into place.
    pub fn blit_tile(&mut self, tile: &Tile, tile_data: &[f64]) {
        debug_assert_eq!(tile_data.len(), tile.pixel_count());
        let w = self.width as usize;
        let tw = tile.width as usize;
        for row in 0..tile.height as usize {
            let dst = (tile.y as usize + row) * w + tile.x as usize;
            let src = row * tw;
            self.data[dst..dst + tw].copy_from_slice(&tile_data[src..src + tw]);
        }
    }
}
