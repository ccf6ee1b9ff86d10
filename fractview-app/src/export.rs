//! Grayscale PNG export of scalar fields, with the view embedded as tEXt
//! chunks.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use fractview_core::{Formula, FractalParams, Viewport};
use fractview_render::{ScalarField, ScalarMode};

use crate::error::AppError;

/// Describes the view a field was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMetadata {
    pub formula: Formula,
    pub viewport: Viewport,
    pub max_iterations: u32,
    pub escape_radius: f64,
    pub mode: ScalarMode,
}

impl ExportMetadata {
    pub fn new(viewport: &Viewport, params: &FractalParams, mode: ScalarMode) -> Self {
        Self {
            formula: params.formula,
            viewport: *viewport,
            max_iterations: params.max_iterations,
            escape_radius: params.escape_radius,
            mode,
        }
    }

    fn description(&self) -> String {
        let vp = &self.viewport;
        let mut desc = format!(
            "{} - Center: {}, Scale: {:e}, Iterations: {}",
            self.formula.label(),
            vp.center,
            vp.scale,
            self.max_iterations,
        );
        if let Formula::Julia { c } = self.formula {
            desc.push_str(&format!(", c: {c}"));
        }
        desc
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let vp = &self.viewport;
        let mode = match self.mode {
            ScalarMode::Count => "count",
            ScalarMode::Smooth => "smooth",
        };
        let mut pairs = vec![
            ("FractView.Formula".into(), self.formula.label().to_string()),
            ("FractView.CenterRe".into(), vp.center.re.to_string()),
            ("FractView.CenterIm".into(), vp.center.im.to_string()),
            ("FractView.Scale".into(), vp.scale.to_string()),
            ("FractView.MaxIterations".into(), self.max_iterations.to_string()),
            ("FractView.EscapeRadius".into(), self.escape_radius.to_string()),
            ("FractView.ScalarMode".into(), mode.to_string()),
            ("FractView.Resolution".into(), format!("{}x{}", vp.width, vp.height)),
        ];
        if let Formula::Julia { c } = self.formula {
            pairs.push(("FractView.JuliaRe".into(), c.re.to_string()));
            pairs.push(("FractView.JuliaIm".into(), c.im.to_string()));
        }
        pairs
    }
}

/// One byte per cell. Interior cells are black; escaping cells brighten with
/// the square root of their normalised value so low counts stay visible.
pub fn grayscale(field: &ScalarField) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    for y in 0..field.height {
        for x in 0..field.width {
            let t = field.normalized(x, y).unwrap_or(1.0);
            out.push(shade(t));
        }
    }
    out
}

fn shade(t: f64) -> u8 {
    if t >= 1.0 {
        0
    } else {
        (t.sqrt() * 255.0).round() as u8
    }
}

/// Write `field` to `path` as an 8-bit grayscale PNG.
pub fn export_field(
    field: &ScalarField,
    path: &Path,
    metadata: &ExportMetadata,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), field.width, field.height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "FractView".to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&grayscale(field))?;
    writer.finish()?;

    debug!(
        width = field.width,
        height = field.height,
        "Exported PNG to {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractview_core::Complex;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("fractview_export_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn grayscale_darkens_interior() {
        let field =
            ScalarField::from_values(3, 1, 100, ScalarMode::Count, vec![0.0, 25.0, 100.0]).unwrap();
        assert_eq!(grayscale(&field), vec![0, 128, 0]);
    }

    #[test]
    fn export_writes_grayscale_png() {
        let dir = temp_dir("pixels");
        let path = dir.join("frame.png");
        let vp = Viewport::new(Complex::new(-0.5, 0.0), 0.01, 3, 2).unwrap();
        let params = FractalParams::mandelbrot(100, 2.0).unwrap();
        let field = ScalarField::from_values(
            3,
            2,
            100,
            ScalarMode::Count,
            vec![0.0, 25.0, 100.0, 100.0, 4.0, 1.0],
        )
        .unwrap();
        export_field(&field, &path, &ExportMetadata::new(&vp, &params, ScalarMode::Count)).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Grayscale);
        assert_eq!(&buf[..info.buffer_size()], &grayscale(&field)[..]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_view_metadata() {
        let dir = temp_dir("meta");
        let path = dir.join("julia.png");
        let vp = Viewport::default_julia(4, 4);
        let c = Complex::new(-0.7, 0.27015);
        let params = FractalParams::julia(c, 300, 2.0).unwrap();
        let field = ScalarField::new(4, 4, 300, ScalarMode::Smooth);
        export_field(&field, &path, &ExportMetadata::new(&vp, &params, ScalarMode::Smooth)).unwrap();

        let reader = png::Decoder::new(File::open(&path).unwrap())
            .read_info()
            .unwrap();
        let texts = &reader.info().uncompressed_latin1_text;
        let find = |key: &str| {
            texts
                .iter()
                .find(|t| t.keyword == key)
                .map(|t| t.text.clone())
        };
        assert_eq!(find("Software").as_deref(), Some("FractView"));
        assert_eq!(find("FractView.Formula").as_deref(), Some("Julia"));
        assert_eq!(find("FractView.JuliaRe").as_deref(), Some("-0.7"));
        assert_eq!(find("FractView.ScalarMode").as_deref(), Some("smooth"));
        assert_eq!(find("FractView.Resolution").as_deref(), Some("4x4"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let vp = Viewport::default_mandelbrot(2, 2);
        let field = ScalarField::new(2, 2, 10, ScalarMode::Count);
        let meta = ExportMetadata::new(&vp, &FractalParams::default(), ScalarMode::Count);
        let err = export_field(&field, Path::new("/nonexistent/dir/frame.png"), &meta);
        assert!(matches!(err, Err(AppError::Write { .. })));
    }
}
