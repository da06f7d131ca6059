//! Chart rendering.
//!
//! Consumes a [`PlotSpec`] and writes one bitmap: log-log axes, one line per
//! visit with circle markers on white faces, legend keyed by visit, y-axis
//! labeled "Intensity". Points with non-positive intensity cannot be placed
//! on a log axis and are dropped with a warning, mirroring what matplotlib's
//! log scale did silently in the legacy scripts.

use std::fs;

use plotters::prelude::{
    BLACK, BitMapBackend, ChartBuilder, Circle, IntoDrawingArea, IntoFont, IntoLogRange,
    LineSeries, PathElement, SeriesLabelPosition, WHITE,
};
use plotters::style::{Color, Palette, Palette99, RGBAColor, ShapeStyle};
use tracing::{debug, warn};

use assay_core::PlotSpec;

use crate::error::ReportError;

/// Render one plot spec to its `output_path`.
///
/// Returns `Ok(false)` without writing a file when every point has a
/// non-positive intensity (nothing can be drawn on a log axis); `Ok(true)`
/// when the image was written.
pub fn render_plot(spec: &PlotSpec, size: (u32, u32)) -> Result<bool, ReportError> {
    let series: Vec<(&str, Vec<(f64, f64)>)> = spec
        .series
        .iter()
        .map(|series| {
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .copied()
                .filter(|&(_, intensity)| intensity > 0.0)
                .collect();
            if points.len() < series.points.len() {
                warn!(
                    title = %spec.title,
                    visit = %series.visit,
                    "non-positive intensities dropped from log-scale plot"
                );
            }
            (series.visit.as_str(), points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect();

    let Some((y_min, y_max)) = intensity_range(series.iter().flat_map(|(_, points)| points)) else {
        warn!(title = %spec.title, "no drawable points, plot skipped");
        return Ok(false);
    };

    if let Some(parent) = spec.output_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let root = BitMapBackend::new(&spec.output_path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|error| render_error(spec, &error))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (spec.x_range.0..spec.x_range.1).log_scale(),
            (y_min..y_max).log_scale(),
        )
        .map_err(|error| render_error(spec, &error))?;
    chart
        .configure_mesh()
        .y_desc("Intensity")
        .draw()
        .map_err(|error| render_error(spec, &error))?;

    for (index, (visit, points)) in series.iter().enumerate() {
        let color: RGBAColor = Palette99::pick(index).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color))
            .map_err(|error| render_error(spec, &error))?
            .label(*visit)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        // Circle markers with white faces over the line.
        chart
            .draw_series(points.iter().map(|&point| {
                Circle::new(point, 4, ShapeStyle::from(&WHITE).filled())
            }))
            .map_err(|error| render_error(spec, &error))?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 4, color.stroke_width(2))),
            )
            .map_err(|error| render_error(spec, &error))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|error| render_error(spec, &error))?;
    root.present().map_err(|error| render_error(spec, &error))?;

    debug!(path = %spec.output_path.display(), "plot rendered");
    Ok(true)
}

/// Padded y-range over the drawable points, `None` when there are none.
fn intensity_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for &(_, intensity) in points {
        range = Some(match range {
            Some((min, max)) => (min.min(intensity), max.max(intensity)),
            None => (intensity, intensity),
        });
    }
    range.map(|(min, max)| (min / 2.0, max * 2.0))
}

fn render_error(spec: &PlotSpec, error: &dyn std::fmt::Display) -> ReportError {
    ReportError::Render {
        path: spec.output_path.clone(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use assay_core::{PlotSpec, VisitSeries};

    use super::{intensity_range, render_plot};

    fn spec(output_path: PathBuf, points: Vec<(f64, f64)>) -> PlotSpec {
        PlotSpec {
            patient_id: "P1".to_string(),
            analyte: "IgG".to_string(),
            title: "P1(F 30 yr H1) IgG".to_string(),
            series: vec![VisitSeries {
                visit: "V1".to_string(),
                points,
            }],
            x_range: (50.0, 2000.0),
            output_path,
        }
    }

    #[test]
    fn render_plot_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        // The sheet directory does not exist yet; rendering creates it.
        let path = dir.path().join("Plate 1").join("Plate 1-P1-IgG.png");
        let rendered = render_plot(
            &spec(path.clone(), vec![(100.0, 5.0), (1000.0, 7.0)]),
            (640, 480),
        )
        .unwrap();
        assert!(rendered);
        let contents = fs::read(&path).unwrap();
        assert!(!contents.is_empty());
        assert_eq!(&contents[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn non_positive_intensities_skip_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipped.png");
        let rendered = render_plot(
            &spec(path.clone(), vec![(100.0, 0.0), (1000.0, -1.0)]),
            (640, 480),
        )
        .unwrap();
        assert!(!rendered);
        assert!(!path.exists());
    }

    #[test]
    fn intensity_range_pads_both_ends() {
        let points = [(10.0, 2.0), (100.0, 8.0)];
        assert_eq!(intensity_range(points.iter()), Some((1.0, 16.0)));
    }

    #[test]
    fn no_points_no_range() {
        let points: [(f64, f64); 0] = [];
        assert_eq!(intensity_range(points.iter()), None);
    }
}
