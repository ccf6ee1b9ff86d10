use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the headless front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("could not start render worker: {0}")]
    Worker(#[source] std::io::Error),

    #[error("render worker stopped before delivering a frame")]
    WorkerGone,

    #[error(transparent)]
    Render(#[from] fractview_render::RenderError),

    #[error(transparent)]
    Core(#[from] fractview_core::CoreError),
}
