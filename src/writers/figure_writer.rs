use crate::error::{ProcessingError, Result};
use crate::models::{DisplayColor, Operator, PowerClass};
use crate::utils::constants::{
    DEFAULT_DPI, FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN, SCATTER_ALPHA, SCATTER_MARKER_AREA,
};
use crate::utils::coordinates::Extent;
use plotters::prelude::*;
use std::path::Path;

/// KDE curve of one operator's feature distribution
#[derive(Debug, Clone)]
pub struct DensityCurve {
    pub operator: Operator,
    pub points: Vec<(f64, f64)>,
}

/// Measurement locations of one power class, as (longitude, latitude)
#[derive(Debug, Clone)]
pub struct ScatterLayer {
    pub class: PowerClass,
    pub points: Vec<(f64, f64)>,
}

/// Renders the density and location figures to PNG
pub struct FigureWriter {
    dpi: u32,
    annotate: bool,
}

impl FigureWriter {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi,
            annotate: true,
        }
    }

    /// Captions, axis labels and legends need system fonts; turn them off on
    /// hosts without any.
    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Pixel size of a 6.4 x 4.8 inch figure at the configured DPI
    pub fn figure_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (FIGURE_WIDTH_IN * dpi).round() as u32,
            (FIGURE_HEIGHT_IN * dpi).round() as u32,
        )
    }

    /// Marker radius in pixels; marker area is given in points squared
    pub fn marker_radius(&self) -> u32 {
        let diameter_pt = SCATTER_MARKER_AREA.sqrt();
        let radius_px = diameter_pt / 2.0 * self.dpi as f64 / 72.0;
        (radius_px.round() as u32).max(1)
    }

    pub fn write_density(
        &self,
        curves: &[DensityCurve],
        title: &str,
        x_label: &str,
        path: &Path,
    ) -> Result<()> {
        ensure_parent_dir(path)?;

        let xs: Vec<Option<f64>> = curves
            .iter()
            .flat_map(|c| c.points.iter().map(|&(x, _)| Some(x)))
            .collect();
        let x_range = Extent::of(&xs)
            .unwrap_or(Extent { min: 0.0, max: 1.0 })
            .padded(0.05);
        let y_max = curves
            .iter()
            .flat_map(|c| c.points.iter().map(|&(_, y)| y))
            .fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

        let root = BitMapBackend::new(path, self.figure_size()).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if self.annotate {
            builder
                .caption(title, ("sans-serif", 20))
                .x_label_area_size(40)
                .y_label_area_size(60);
        }

        let mut chart = builder
            .build_cartesian_2d(x_range.min..x_range.max, 0.0..y_max)
            .map_err(render_error)?;

        if self.annotate {
            chart
                .configure_mesh()
                .x_desc(x_label)
                .y_desc("Frequency density")
                .draw()
                .map_err(render_error)?;
        }

        for curve in curves {
            let color = rgb(curve.operator.color());
            chart
                .draw_series(LineSeries::new(
                    curve.points.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(render_error)?
                .label(curve.operator.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        if self.annotate && !curves.is_empty() {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
        tracing::info!(curves = curves.len(), path = %path.display(), "Wrote density figure");
        Ok(())
    }

    pub fn write_scatter(&self, title: &str, layers: &[ScatterLayer], path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;

        let longitudes: Vec<Option<f64>> = layers
            .iter()
            .flat_map(|l| l.points.iter().map(|&(x, _)| Some(x)))
            .collect();
        let latitudes: Vec<Option<f64>> = layers
            .iter()
            .flat_map(|l| l.points.iter().map(|&(_, y)| Some(y)))
            .collect();
        let unit = Extent { min: 0.0, max: 1.0 };
        let x_range = Extent::of(&longitudes).unwrap_or(unit).padded(0.05);
        let y_range = Extent::of(&latitudes).unwrap_or(unit).padded(0.05);

        let root = BitMapBackend::new(path, self.figure_size()).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if self.annotate {
            builder
                .caption(title, ("sans-serif", 20))
                .x_label_area_size(40)
                .y_label_area_size(60);
        }

        let mut chart = builder
            .build_cartesian_2d(x_range.min..x_range.max, y_range.min..y_range.max)
            .map_err(render_error)?;

        if self.annotate {
            chart
                .configure_mesh()
                .x_desc("Longitude / degrees")
                .y_desc("Latitude / degrees")
                .draw()
                .map_err(render_error)?;
        }

        let radius = self.marker_radius();
        for layer in layers {
            let style = rgb(layer.class.color()).mix(SCATTER_ALPHA).filled();
            chart
                .draw_series(
                    layer
                        .points
                        .iter()
                        .map(|&point| Circle::new(point, radius, style)),
                )
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;

        let points: usize = layers.iter().map(|l| l.points.len()).sum();
        tracing::info!(points, path = %path.display(), "Wrote scatter figure");
        Ok(())
    }
}

impl Default for FigureWriter {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

fn rgb(color: DisplayColor) -> RGBColor {
    let (r, g, b) = color.rgb;
    RGBColor(r, g, b)
}

fn render_error<E: std::fmt::Display>(error: E) -> ProcessingError {
    ProcessingError::Render(error.to_string())
}

/// Figures go into an existing directory; it is never created here
fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(
            ProcessingError::MissingOutputDir(parent.display().to_string()),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_figure_geometry() {
        let writer = FigureWriter::default();
        assert_eq!(writer.figure_size(), (640, 480));
        assert_eq!(writer.marker_radius(), 3);

        let writer = FigureWriter::new(200);
        assert_eq!(writer.figure_size(), (1280, 960));
        assert_eq!(writer.marker_radius(), 7);
    }

    #[test]
    fn test_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("figures").join("EE.png");

        let result = FigureWriter::default().write_scatter("EE", &[], &path);
        assert!(matches!(result, Err(ProcessingError::MissingOutputDir(_))));
    }

    #[test]
    fn test_write_scatter_png() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("O2.png");

        let layers = vec![
            ScatterLayer {
                class: PowerClass::Low,
                points: vec![(-2.98, 53.41), (-2.5, 53.5)],
            },
            ScatterLayer {
                class: PowerClass::High,
                points: vec![(-1.55, 53.80)],
            },
        ];

        FigureWriter::default()
            .with_annotations(false)
            .write_scatter("O2", &layers, &path)?;

        let bytes = std::fs::read(&path)?;
        assert_eq!(&bytes[1..4], b"PNG");

        Ok(())
    }

    #[test]
    fn test_write_density_png() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("density.png");

        let curves = vec![DensityCurve {
            operator: Operator::Three,
            points: vec![(-100.0, 0.01), (-90.0, 0.04), (-80.0, 0.02)],
        }];

        FigureWriter::new(50)
            .with_annotations(false)
            .write_density(&curves, "Signal", "Total signal power", &path)?;

        assert!(path.exists());
        Ok(())
    }
}
