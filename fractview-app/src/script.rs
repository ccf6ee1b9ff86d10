//! Recorded interaction sessions.
//!
//! A script is a JSON array of events, e.g.
//!
//! ```json
//! [
//!   {"type": "resize", "width": 640, "height": 480},
//!   {"type": "select", "x": 200, "y": 150, "width": 240, "height": 180},
//!   {"type": "click", "x": 320, "y": 240},
//!   {"type": "pointer", "event": {"kind": "press", "button": "secondary", "x": 10, "y": 10}}
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use fractview_render::ScalarMode;

use crate::error::AppError;
use crate::input::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Resize { width: u32, height: u32 },
    /// Resize the Julia panel; re-frames it at the default view.
    ResizeJulia { width: u32, height: u32 },
    /// Switch between raw and smoothed escape counts.
    SetMode { mode: ScalarMode },
    Pan { dx: f64, dy: f64 },
    /// Rubber-band selection in pixels.
    Select { x: f64, y: f64, width: f64, height: f64 },
    Click { x: f64, y: f64 },
    /// Scroll about a pixel; positive `delta` zooms in.
    Wheel { x: f64, y: f64, delta: f64 },
    Undo,
    Reset,
    CloseJulia,
    Pointer { event: PointerEvent },
}

pub fn parse_script(json: &str) -> Result<Vec<SessionEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_script(path: &Path) -> Result<Vec<SessionEvent>, AppError> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_script(&json).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(count = events.len(), "Loaded session script {}", path.display());
    Ok(events)
}
