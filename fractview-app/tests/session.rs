//! End-to-end: script → explorer → worker → PNG files.

use std::fs::File;
use std::path::PathBuf;

use fractview_app::export::{export_field, ExportMetadata};
use fractview_app::script::parse_script;
use fractview_app::{AppPreferences, Explorer, RenderWorker};
use fractview_core::{Formula, Viewport};
use fractview_render::render;

fn prefs() -> AppPreferences {
    AppPreferences {
        image_width: 160,
        image_height: 120,
        max_iterations: 100,
        julia_max_iterations: 120,
        julia_panel_width: 64,
        julia_panel_height: 48,
        ..AppPreferences::default()
    }
}

fn out_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fractview_session_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn scripted_session_renders_both_views() {
    let events = parse_script(
        r#"[
            {"type": "pointer", "event": {"kind": "press", "button": "primary", "x": 40, "y": 30}},
            {"type": "pointer", "event": {"kind": "move", "x": 80, "y": 60}},
            {"type": "pointer", "event": {"kind": "release", "x": 120, "y": 90}},
            {"type": "wheel", "x": 80, "y": 60, "delta": -100},
            {"type": "undo"},
            {"type": "click", "x": 70, "y": 60}
        ]"#,
    )
    .unwrap();

    let mut explorer = Explorer::new(&prefs()).unwrap();
    let mut worker = RenderWorker::spawn().unwrap();
    let home = explorer.viewport();
    for event in &events {
        explorer.apply(event);
        explorer.sync(&mut worker).unwrap();
        explorer.poll(&mut worker);
    }
    explorer.finish(&mut worker).unwrap();

    // Selection halved the scale; the wheel zoom was undone.
    let vp = explorer.viewport();
    assert!((vp.scale - home.scale / 2.0).abs() < 1e-15);
    assert!(explorer.can_undo());

    let c = explorer.current_julia_point().unwrap();
    assert_eq!(c, vp.to_plane(70.0, 60.0));

    // The delivered frames are exactly what a direct render produces.
    let primary = explorer.primary_field().unwrap();
    assert_eq!(primary, &render(&vp, &explorer.params()));
    let julia = explorer.julia_field().unwrap();
    let params = explorer.auxiliary_params().unwrap();
    assert_eq!(params.formula, Formula::Julia { c });
    assert_eq!(julia, &render(&Viewport::default_julia(64, 48), &params));

    let dir = out_dir("both");
    let path = dir.join("julia.png");
    let meta = ExportMetadata::new(&explorer.auxiliary_viewport(), &params, prefs().scalar_mode);
    export_field(julia, &path, &meta).unwrap();
    let reader = png::Decoder::new(File::open(&path).unwrap()).read_info().unwrap();
    assert_eq!(reader.info().width, 64);
    assert_eq!(reader.info().height, 48);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn closing_julia_drops_its_frame() {
    let events = parse_script(
        r#"[
            {"type": "click", "x": 10, "y": 10},
            {"type": "close_julia"},
            {"type": "resize", "width": 100, "height": 50}
        ]"#,
    )
    .unwrap();

    let mut explorer = Explorer::new(&prefs()).unwrap();
    let mut worker = RenderWorker::spawn().unwrap();
    for event in &events {
        explorer.apply(event);
        explorer.sync(&mut worker).unwrap();
    }
    explorer.finish(&mut worker).unwrap();

    assert!(!explorer.auxiliary_visible());
    assert!(explorer.julia_field().is_none());
    let primary = explorer.primary_field().unwrap();
    assert_eq!((primary.width, primary.height), (100, 50));
    assert!(!explorer.can_undo());
}
