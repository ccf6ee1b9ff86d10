use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, error, info};

use fractview_app::export::{export_field, ExportMetadata};
use fractview_app::script::load_script;
use fractview_app::{AppError, AppPreferences, Explorer, RenderWorker, SessionEvent};

const USAGE: &str = "usage: fractview [SCRIPT.json] [OUTPUT_DIR]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting FractView");

    let mut args = std::env::args().skip(1);
    let script = args.next().map(PathBuf::from);
    let output = args.next().map(PathBuf::from);
    if args.next().is_some() || script.as_deref() == Some(Path::new("--help")) {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    let prefs = AppPreferences::load();
    match run(&prefs, script.as_deref(), output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(prefs: &AppPreferences, script: Option<&Path>, output: Option<PathBuf>) -> Result<(), AppError> {
    let events = match script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let mut explorer = Explorer::new(prefs)?;
    let mut worker = RenderWorker::spawn()?;
    replay(&mut explorer, &mut worker, &events)?;
    explorer.finish(&mut worker)?;

    let out_dir = output.unwrap_or_else(|| prefs.output_directory());
    fs::create_dir_all(&out_dir).map_err(|source| AppError::Write {
        path: out_dir.clone(),
        source,
    })?;

    if let Some(field) = explorer.primary_field() {
        let meta = ExportMetadata::new(&explorer.viewport(), &explorer.params(), field.mode);
        let path = out_dir.join("primary.png");
        export_field(field, &path, &meta)?;
        info!("Wrote {}", path.display());
    }

    if let (Some(field), Some(params)) = (explorer.julia_field(), explorer.auxiliary_params()) {
        let meta = ExportMetadata::new(&explorer.auxiliary_viewport(), &params, field.mode);
        let path = out_dir.join("julia.png");
        export_field(field, &path, &meta)?;
        if let Some(label) = explorer.julia_label() {
            info!("Wrote {} ({label})", path.display());
        }
    }
    Ok(())
}

/// Apply the events in order, keeping the worker busy with the latest view
/// as they go so superseded renders are abandoned.
fn replay(
    explorer: &mut Explorer,
    worker: &mut RenderWorker,
    events: &[SessionEvent],
) -> Result<(), AppError> {
    for (i, event) in events.iter().enumerate() {
        if !explorer.apply(event) {
            debug!(index = i, ?event, "Event had no effect");
        }
        explorer.sync(worker)?;
        explorer.poll(worker);
    }
    info!(
        events = events.len(),
        can_undo = explorer.can_undo(),
        julia = explorer.auxiliary_visible(),
        "Session replayed"
    );
    Ok(())
}
