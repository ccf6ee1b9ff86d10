//! Headless front end for FractView: preferences, pointer handling, the
//! interactive state holder, a background render worker, and PNG output.

pub mod app_dir;
pub mod error;
pub mod explorer;
pub mod export;
pub mod input;
pub mod preferences;
pub mod render_bridge;
pub mod script;

pub use error::AppError;
pub use explorer::Explorer;
pub use preferences::AppPreferences;
pub use render_bridge::RenderWorker;
pub use script::SessionEvent;
