use fractview_core::{
    iterate, Complex, FractalParams, IterationResult, JuliaLinkage, SelectionRegion, Viewport,
    ViewportController,
};

fn scenario_viewport() -> Viewport {
    Viewport::new(Complex::new(0.0, 0.0), 0.004, 800, 600).unwrap()
}

/// Iterate every pixel of a viewport directly, without the renderer.
fn grid(viewport: &Viewport, params: &FractalParams) -> Vec<IterationResult> {
    let mut out = Vec::with_capacity(viewport.width as usize * viewport.height as usize);
    for py in 0..viewport.height {
        for px in 0..viewport.width {
            out.push(iterate(viewport.pixel_to_complex(px, py), params));
        }
    }
    out
}

#[test]
fn scenario_center_and_corner() {
    let vp = scenario_viewport();

    let center = vp.to_plane(400.0, 300.0);
    assert!(center.re.abs() < 1e-12 && center.im.abs() < 1e-12);
    let r = iterate(center, &FractalParams::mandelbrot(100, 2.0).unwrap());
    assert!(!r.escaped);
    assert_eq!(r.count, 100);

    let corner = vp.to_plane(0.0, 0.0);
    assert!((corner.re + 1.6).abs() < 1e-12 && (corner.im - 1.2).abs() < 1e-12);
    let r = iterate(corner, &FractalParams::mandelbrot(50, 2.0).unwrap());
    assert!(r.escaped);
    assert!(r.count < 50);
}

#[test]
fn scenario_zoom_then_undo() {
    let mut controller = ViewportController::new(scenario_viewport());
    let sel = SelectionRegion::new((200.0, 150.0), (400.0, 300.0));
    assert!(controller.zoom_to_selection(&sel));

    let zoomed = controller.viewport();
    let centroid = scenario_viewport().to_plane(400.0, 300.0);
    assert!((zoomed.center.re - centroid.re).abs() < 1e-12);
    assert!((zoomed.center.im - centroid.im).abs() < 1e-12);
    assert!((zoomed.scale - 0.002).abs() < 1e-12);

    assert!(controller.undo());
    let restored = controller.viewport();
    assert_eq!(restored.center, Complex::ZERO);
    assert_eq!(restored.scale, 0.004);
    assert!(!controller.can_undo());
}

#[test]
fn click_then_close_drives_auxiliary_state() {
    let controller = ViewportController::new(scenario_viewport());
    let mut link = JuliaLinkage::new(200, 200, FractalParams::default());

    let primary = controller.viewport();
    let c = link.on_point_clicked(123.0, 456.0, &primary);
    assert_eq!(link.current_point(), Some(primary.to_plane(123.0, 456.0)));
    assert!(link.is_visible());

    let params = link.auxiliary_params().unwrap();
    let aux = grid(&link.auxiliary_viewport(), &params);
    assert_eq!(aux.len(), 200 * 200);
    assert_eq!(params.formula.label(), "Julia");
    assert_ne!(c, Complex::ZERO);

    link.close();
    assert_eq!(link.current_point(), None);
    assert!(!link.is_visible());
}

#[test]
fn default_mandelbrot_view_has_inside_and_outside() {
    let vp = Viewport::default_mandelbrot(100, 75);
    let results = grid(&vp, &FractalParams::mandelbrot(256, 2.0).unwrap());
    let escaped = results.iter().filter(|r| r.escaped).count();
    assert!(escaped > 0);
    assert!(escaped < results.len());
    assert!(results
        .iter()
        .all(|r| if r.escaped { r.count < 256 } else { r.count == 256 }));
}

#[test]
fn zoomed_view_round_trips_every_corner() {
    let mut controller = ViewportController::new(scenario_viewport());
    controller.zoom_to_selection(&SelectionRegion::new((611.0, 37.0), (9.0, 7.0)));
    controller.pan(-3.5, 12.25);
    let vp = controller.viewport();
    for &(x, y) in &[(0.0, 0.0), (799.0, 0.0), (0.0, 599.0), (799.0, 599.0)] {
        let (bx, by) = vp.to_pixel(vp.to_plane(x, y));
        assert!((bx - x).abs() < 1e-6 && (by - y).abs() < 1e-6);
    }
}
