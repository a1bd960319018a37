use std::ops::Range;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::coord::ranged1d::{AsRangedCoord, Ranged, ValueFormatter};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::error::{RenderError, Result};

use super::figure::{Drawing, Figure, Typeface};
use super::style::{LineStyle, PointShape, Scale};

/// Output size in pixels.
pub const SIZE: (u32, u32) = (1024, 768);

/// Space between an axis description and the tick labels.
const LABEL_PAD: u32 = 20;

const SUPPORTED: &str = "png, jpg, jpeg, bmp, tif, tiff, gif, svg";

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rasterised into an RGB buffer, then encoded by `image`.
    Bitmap(ImageFormat),
    Svg,
}

/// Pick the output format from the file extension (case-insensitive).
pub fn output_format(path: &Path) -> std::result::Result<OutputFormat, RenderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "svg" => Ok(OutputFormat::Svg),
        "png" => Ok(OutputFormat::Bitmap(ImageFormat::Png)),
        "jpg" | "jpeg" => Ok(OutputFormat::Bitmap(ImageFormat::Jpeg)),
        "bmp" => Ok(OutputFormat::Bitmap(ImageFormat::Bmp)),
        "tif" | "tiff" => Ok(OutputFormat::Bitmap(ImageFormat::Tiff)),
        "gif" => Ok(OutputFormat::Bitmap(ImageFormat::Gif)),
        _ => Err(RenderError::UnsupportedFormat {
            path: path.to_path_buf(),
            supported: SUPPORTED,
        }),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Draw `figure` and write it to `path`.
///
/// The format is checked before drawing, and the file is only created once
/// the whole figure has rendered, so a failure never leaves a partial file.
pub fn export(figure: &Figure, path: &Path) -> Result<()> {
    let format = output_format(path)?;
    let (w, h) = SIZE;

    match format {
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
                draw(&root, figure)?;
                root.present().map_err(drawing)?;
            }
            std::fs::write(path, svg).map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        OutputFormat::Bitmap(image_format) => {
            let mut buffer = vec![0u8; (w * h * 3) as usize];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, SIZE).into_drawing_area();
                draw(&root, figure)?;
                root.present().map_err(drawing)?;
            }
            let image = RgbImage::from_raw(w, h, buffer)
                .ok_or_else(|| RenderError::Drawing("bitmap buffer size mismatch".to_string()))?;
            image
                .save_with_format(path, image_format)
                .map_err(RenderError::from)?;
        }
    }

    log::info!("Wrote {} ({w}x{h})", path.display());
    Ok(())
}

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

// ---------------------------------------------------------------------------
// Chart drawing
// ---------------------------------------------------------------------------

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE).map_err(drawing)?;

    let (x, y) = figure.ranges();
    log::debug!("Axis ranges x={x:?} ({}), y={y:?} ({})", figure.xscale, figure.yscale);

    let ranges = (x.clone(), y.clone());

    // Each scale combination is a distinct coordinate type.
    match (figure.xscale, figure.yscale) {
        (Scale::Linear, Scale::Linear) => draw_chart(root, figure, ranges, x, y),
        (Scale::Log, Scale::Linear) => draw_chart(root, figure, ranges, x.log_scale(), y),
        (Scale::Linear, Scale::Log) => draw_chart(root, figure, ranges, x, y.log_scale()),
        (Scale::Log, Scale::Log) => {
            draw_chart(root, figure, ranges, x.log_scale(), y.log_scale())
        }
    }
}

fn draw_chart<DB, X, Y>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    (x_range, y_range): (Range<f64>, Range<f64>),
    x_spec: X,
    y_spec: Y,
) -> Result<()>
where
    DB: DrawingBackend,
    X: AsRangedCoord<Value = f64>,
    Y: AsRangedCoord<Value = f64>,
    X::CoordDescType: ValueFormatter<f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let family = match figure.typeface {
        Typeface::Serif => FontFamily::Serif,
        Typeface::SansSerif => FontFamily::SansSerif,
    };
    let size = f64::from(figure.fontsize);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .x_label_area_size(figure.fontsize * 2 + LABEL_PAD)
        .y_label_area_size(figure.fontsize * 4 + LABEL_PAD);
    if !figure.title.is_empty() {
        builder.caption(&figure.title, (family, size * 1.2));
    }
    let mut chart = builder
        .build_cartesian_2d(x_spec, y_spec)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(figure.xlabel.clone())
        .y_desc(figure.ylabel.clone())
        .x_label_formatter(&tick_label)
        .y_label_formatter(&tick_label)
        .axis_desc_style((family, size))
        .label_style((family, size * 0.8))
        .draw()
        .map_err(drawing)?;

    let color = figure.marker.color;
    let style = ShapeStyle::from(&color).stroke_width(2);

    match &figure.drawing {
        Drawing::Bars(histogram) => {
            let floor = match figure.yscale {
                Scale::Linear => 0.0,
                Scale::Log => y_range.start,
            };
            chart
                .draw_series(histogram.iter().map(|(left, right, freq)| {
                    Rectangle::new(
                        [(left.max(x_range.start), floor), (right, freq.max(floor))],
                        color.filled(),
                    )
                }))
                .map_err(drawing)?;
        }
        Drawing::Curve { x, y } => {
            let points: Vec<(f64, f64)> = x
                .iter()
                .copied()
                .zip(y.iter().copied())
                .filter(|&(px, py)| visible(px, figure.xscale) && visible(py, figure.yscale))
                .collect();

            match figure.marker.line {
                Some(LineStyle::Solid) => {
                    chart
                        .draw_series(LineSeries::new(points.iter().copied(), style))
                        .map_err(drawing)?;
                }
                Some(line) => {
                    let (dash, gap) = match line {
                        LineStyle::Dotted => (2, 4),
                        LineStyle::DashDot => (8, 3),
                        _ => (10, 6),
                    };
                    chart
                        .draw_series(DashedLineSeries::new(points.iter().copied(), dash, gap, style))
                        .map_err(drawing)?;
                }
                None => {}
            }

            if let Some(shape) = figure.marker.point {
                draw_points(&mut chart, &points, shape, style)?;
            }
        }
    }

    Ok(())
}

fn draw_points<DB, X, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, Y>>,
    points: &[(f64, f64)],
    shape: PointShape,
    style: ShapeStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let filled = style.filled();
    let at = points.iter().copied();

    match shape {
        PointShape::Point => chart.draw_series(at.map(|p| Circle::new(p, 2, filled))),
        PointShape::Circle => chart.draw_series(at.map(|p| Circle::new(p, 4, filled))),
        PointShape::Cross => chart.draw_series(at.map(|p| Cross::new(p, 4, style))),
        PointShape::TriangleUp => chart.draw_series(at.map(|p| TriangleMarker::new(p, 5, filled))),
        PointShape::Plus => chart.draw_series(at.map(|p| {
            EmptyElement::at(p)
                + PathElement::new(vec![(-4, 0), (4, 0)], style)
                + PathElement::new(vec![(0, -4), (0, 4)], style)
        })),
        PointShape::Star => chart.draw_series(at.map(|p| {
            EmptyElement::at(p)
                + PathElement::new(vec![(-5, 0), (5, 0)], style)
                + PathElement::new(vec![(0, -5), (0, 5)], style)
                + PathElement::new(vec![(-4, -4), (4, 4)], style)
                + PathElement::new(vec![(-4, 4), (4, -4)], style)
        })),
        PointShape::Square => chart.draw_series(
            at.map(|p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], filled)),
        ),
        PointShape::TriangleDown => chart.draw_series(at.map(|p| {
            EmptyElement::at(p) + Polygon::new(vec![(-5, -3), (5, -3), (0, 5)], filled)
        })),
        PointShape::Diamond => chart.draw_series(at.map(|p| {
            EmptyElement::at(p) + Polygon::new(vec![(0, -5), (5, 0), (0, 5), (-5, 0)], filled)
        })),
    }
    .map(|_| ())
    .map_err(|e| drawing(e).into())
}

/// Tick text with at most three decimals and no trailing zeros.
fn tick_label(v: &f64) -> String {
    let text = format!("{v:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn visible(v: f64, scale: Scale) -> bool {
    match scale {
        Scale::Linear => v.is_finite(),
        Scale::Log => v.is_finite() && v > 0.0,
    }
}
