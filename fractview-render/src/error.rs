use thiserror::Error;

/// Errors originating from the frame producer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("render cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] fractview_core::CoreError),
}
