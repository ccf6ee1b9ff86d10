use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use fractview_core::FractalParams;
use fractview_render::ScalarMode;

use crate::error::AppError;

/// User-tunable settings, stored as JSON next to the executable.
///
/// Every field has a serde default so older or partial files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_escape_radius")]
    pub escape_radius: f64,

    // Julia panel
    #[serde(default = "default_julia_max_iterations")]
    pub julia_max_iterations: u32,
    #[serde(default = "default_julia_panel_size")]
    pub julia_panel_width: u32,
    #[serde(default = "default_julia_panel_size")]
    pub julia_panel_height: u32,

    #[serde(default)]
    pub scalar_mode: ScalarMode,
    /// Where frames are written. Empty means `images/` next to the executable.
    #[serde(default)]
    pub output_dir: String,
}

fn default_image_width() -> u32 {
    800
}
fn default_image_height() -> u32 {
    600
}
fn default_max_iterations() -> u32 {
    FractalParams::DEFAULT_MAX_ITERATIONS
}
fn default_escape_radius() -> f64 {
    FractalParams::DEFAULT_ESCAPE_RADIUS
}
fn default_julia_max_iterations() -> u32 {
    300
}
fn default_julia_panel_size() -> u32 {
    300
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            image_width: default_image_width(),
            image_height: default_image_height(),
            max_iterations: default_max_iterations(),
            escape_radius: default_escape_radius(),
            julia_max_iterations: default_julia_max_iterations(),
            julia_panel_width: default_julia_panel_size(),
            julia_panel_height: default_julia_panel_size(),
            scalar_mode: ScalarMode::default(),
            output_dir: String::new(),
        }
    }
}

impl AppPreferences {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::app_dir::preferences_path())
    }

    /// Load from `path`. Missing, unreadable, or malformed files yield the
    /// defaults; the problem is logged.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    prefs.sanitized()
                }
                Err(e) => {
                    error!("Failed to parse preferences: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read preferences file: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| AppError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Replace values no view could be built from with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.image_width == 0 || self.image_height == 0 {
            warn!(
                width = self.image_width,
                height = self.image_height,
                "Ignoring empty image size"
            );
            self.image_width = defaults.image_width;
            self.image_height = defaults.image_height;
        }
        if self.julia_panel_width == 0 || self.julia_panel_height == 0 {
            warn!("Ignoring empty Julia panel size");
            self.julia_panel_width = defaults.julia_panel_width;
            self.julia_panel_height = defaults.julia_panel_height;
        }
        if let Err(e) = FractalParams::mandelbrot(self.max_iterations, self.escape_radius) {
            warn!("Ignoring invalid iteration settings: {e}");
            self.max_iterations = defaults.max_iterations;
            self.escape_radius = defaults.escape_radius;
        }
        if self.julia_max_iterations == 0 {
            self.julia_max_iterations = defaults.julia_max_iterations;
        }
        self
    }

    /// Parameters for the primary (Mandelbrot) view.
    pub fn primary_params(&self) -> Result<FractalParams, AppError> {
        Ok(FractalParams::mandelbrot(self.max_iterations, self.escape_radius)?)
    }

    /// Iteration cap and radius for the Julia panel; the formula is set when
    /// a point is picked.
    pub fn julia_params(&self) -> Result<FractalParams, AppError> {
        Ok(FractalParams::mandelbrot(
            self.julia_max_iterations,
            self.escape_radius,
        )?)
    }

    pub fn output_directory(&self) -> PathBuf {
        if self.output_dir.is_empty() {
            crate::app_dir::images_directory()
        } else {
            PathBuf::from(&self.output_dir)
        }
    }
}
