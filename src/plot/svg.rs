//! Plotters helpers shared by the SVG figures.
//!
//! All figures are drawn through [`render_svg`], which owns the backend,
//! paints the white background and maps plotters errors to exit code 5.
//! Drawing closures return [`DrawResult`] so they can use `?` on every
//! plotters call.

use std::error::Error;
use std::fmt::Display;
use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::prelude::*;

use crate::domain::Field2d;
use crate::error::AppError;
use crate::plot::style::{FONT, LABEL_SIZE, light_grid, quantize, viridis};

pub type DrawResult = Result<(), Box<dyn Error>>;
pub type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;
pub type Chart<'a, 'b, X, Y> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<X, Y>>;

pub fn plot_err<E: Display>(e: E) -> AppError {
    AppError::render(format!("Render error: {e}"))
}

/// Draw one SVG file at `path`, creating its directory if needed.
pub fn render_svg<F>(path: &Path, size: (u32, u32), draw: F) -> Result<(), AppError>
where
    F: FnOnce(&Canvas<'_>) -> DrawResult,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::invalid(format!("Failed to create '{}': {e}", dir.display())))?;
    }

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    draw(&root).map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Split `points` into runs where `keep(x, y)` holds, so masked samples
/// leave gaps instead of being joined across.
pub fn segments<I, K>(points: I, keep: K) -> Vec<Vec<(f64, f64)>>
where
    I: IntoIterator<Item = (f64, f64)>,
    K: Fn(f64, f64) -> bool,
{
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        if keep(x, y) {
            current.push((x, y));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub fn is_finite_point(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}

/// Finite and inside `y_range` (inclusive). Use for clipped and log axes.
pub fn within(y_range: Range<f64>) -> impl Fn(f64, f64) -> bool {
    move |x, y| is_finite_point(x, y) && y >= y_range.start && y <= y_range.end
}

/// `[min, max]` of the finite `values`, widened by `pad` of the span on both sides.
pub fn data_range<'a, I>(values: I, pad: f64) -> Option<Range<f64>>
where
    I: IntoIterator<Item = &'a f64>,
{
    let (lo, hi) = values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return None;
    }
    let span = hi - lo;
    let margin = if span > 0.0 { span * pad } else { lo.abs().max(1.0) * 0.1 };
    Some((lo - margin)..(hi + margin))
}

/// Closed outline between `lower` and `upper` for a shaded band.
pub fn band_polygon(x: &[f64], lower: &[f64], upper: &[f64]) -> Vec<(f64, f64)> {
    let fwd = x.iter().zip(upper.iter()).map(|(&a, &b)| (a, b));
    let back = x.iter().zip(lower.iter()).rev().map(|(&a, &b)| (a, b));
    fwd.chain(back).filter(|&(a, b)| is_finite_point(a, b)).collect()
}

/// Draw `points` as a line that breaks wherever `keep` rejects a sample.
///
/// Only the first run carries the legend entry.
pub fn draw_masked_line<X, Y, K>(
    chart: &mut Chart<'_, '_, X, Y>,
    points: impl IntoIterator<Item = (f64, f64)>,
    keep: K,
    style: ShapeStyle,
    label: Option<&str>,
) -> DrawResult
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
    K: Fn(f64, f64) -> bool,
{
    let mut label = label;
    for run in segments(points, keep) {
        let anno = chart.draw_series(LineSeries::new(run, style))?;
        if let Some(l) = label.take() {
            anno.label(l)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
    }
    Ok(())
}

/// Dashed polyline; the dash pattern runs in pixel space, so it also works
/// on log axes.
pub fn draw_dashed<X, Y>(
    chart: &mut Chart<'_, '_, X, Y>,
    points: Vec<(f64, f64)>,
    style: ShapeStyle,
    label: Option<&str>,
) -> DrawResult
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let anno = chart.draw_series(DashedLineSeries::new(points, 8, 5, style))?;
    if let Some(l) = label {
        anno.label(l)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }
    Ok(())
}

/// Legend box in the upper right.
pub fn draw_legend<'a, 'b: 'a, X, Y>(chart: &mut Chart<'a, 'b, X, Y>) -> DrawResult
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    draw_legend_at(chart, SeriesLabelPosition::UpperRight)
}

pub fn draw_legend_at<'a, 'b: 'a, X, Y>(chart: &mut Chart<'a, 'b, X, Y>, position: SeriesLabelPosition) -> DrawResult
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    chart
        .configure_series_labels()
        .position(position)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK.mix(0.4))
        .label_font((FONT, LABEL_SIZE - 2))
        .draw()?;
    Ok(())
}

/// Cell boundaries around sample centres; geometric midpoints on a log axis.
pub fn cell_edges(centres: &[f64], log: bool) -> Vec<f64> {
    let n = centres.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        let c = centres[0];
        return if log { vec![c / 1.1, c * 1.1] } else { vec![c - 0.5, c + 0.5] };
    }
    let mid = |a: f64, b: f64| if log { (a * b).sqrt() } else { 0.5 * (a + b) };
    let mut edges = Vec::with_capacity(n + 1);
    let first = if log {
        centres[0] * centres[0] / mid(centres[0], centres[1])
    } else {
        centres[0] - (mid(centres[0], centres[1]) - centres[0])
    };
    edges.push(first);
    for w in centres.windows(2) {
        edges.push(mid(w[0], w[1]));
    }
    let last = if log {
        centres[n - 1] * centres[n - 1] / edges[n - 1]
    } else {
        centres[n - 1] + (centres[n - 1] - edges[n - 1])
    };
    edges.push(last);
    edges
}

fn clamp_ends(edges: &mut [f64], centres: &[f64]) {
    if let (Some(e0), Some(&c0)) = (edges.first_mut(), centres.first()) {
        *e0 = c0;
    }
    if let (Some(e1), Some(&c1)) = (edges.last_mut(), centres.last()) {
        *e1 = c1;
    }
}

/// Filled-contour style heatmap: each cell coloured by its quantised level.
///
/// Horizontally adjacent cells on the same level are merged into one rectangle.
pub fn draw_heatmap<X, Y>(
    chart: &mut Chart<'_, '_, X, Y>,
    field: &Field2d,
    z_range: (f64, f64),
    levels: usize,
    log_y: bool,
) -> DrawResult
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let mut xe = cell_edges(&field.x, false);
    let mut ye = cell_edges(&field.y, log_y);
    // Outer cells stop at the first and last sample, where the axes end.
    clamp_ends(&mut xe, &field.x);
    clamp_ends(&mut ye, &field.y);
    let (z_min, z_max) = z_range;
    let span = z_max - z_min;
    let level_of = |z: f64| -> Option<f64> {
        if !z.is_finite() {
            return None;
        }
        let t = if span > 0.0 { (z - z_min) / span } else { 0.5 };
        Some(quantize(t, levels))
    };

    let mut cells = Vec::new();
    for (j, row) in field.z.iter().enumerate().take(field.y.len()) {
        let mut i = 0;
        let n = row.len().min(field.x.len());
        while i < n {
            let level = level_of(row[i]);
            let mut k = i + 1;
            while k < n && level_of(row[k]) == level {
                k += 1;
            }
            if let Some(t) = level {
                cells.push(Rectangle::new([(xe[i], ye[j]), (xe[k], ye[j + 1])], viridis(t).filled()));
            }
            i = k;
        }
    }
    chart.draw_series(cells)?;
    Ok(())
}

/// Vertical colour bar for `z_range` split into `levels` bands.
pub fn draw_colorbar(area: &Canvas<'_>, z_range: (f64, f64), levels: usize, label: &str) -> DrawResult {
    let (z_min, z_max) = z_range;
    let z_max = if z_max > z_min { z_max } else { z_min + 1.0 };
    let levels = levels.max(1);

    let mut bar = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(60)
        .margin_right(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..1f64, z_min..z_max)?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_desc(label)
        .y_labels(6)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .label_style((FONT, LABEL_SIZE - 4))
        .axis_desc_style((FONT, LABEL_SIZE - 2))
        .draw()?;

    let dz = (z_max - z_min) / levels as f64;
    bar.draw_series((0..levels).map(|k| {
        let lo = z_min + k as f64 * dz;
        let t = (k as f64 + 0.5) / levels as f64;
        Rectangle::new([(0.0, lo), (1.0, lo + dz)], viridis(t).filled())
    }))?;
    Ok(())
}

/// Standard axes: light grid, serif labels.
pub fn draw_mesh<X, Y>(chart: &mut Chart<'_, '_, X, Y>, x_desc: &str, y_desc: &str) -> DrawResult
where
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .light_line_style(BLACK.mix(0.04).stroke_width(1))
        .bold_line_style(light_grid())
        .label_style((FONT, LABEL_SIZE - 2))
        .axis_desc_style((FONT, LABEL_SIZE))
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_break_on_rejected_samples() {
        let pts = vec![(0.0, 1.0), (1.0, f64::NAN), (2.0, 2.0), (3.0, 3.0)];
        let runs = segments(pts, is_finite_point);
        assert_eq!(runs, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
    }

    #[test]
    fn within_masks_out_of_range_and_log_invalid() {
        let keep = within(1e-5..0.2);
        assert!(keep(1.0, 1e-3));
        assert!(!keep(1.0, 0.0));
        assert!(!keep(1.0, -1e-3));
        assert!(!keep(1.0, 0.5));
    }

    #[test]
    fn data_range_pads_and_skips_non_finite() {
        let r = data_range(&[0.0, f64::NAN, 10.0], 0.1).unwrap();
        assert!((r.start + 1.0).abs() < 1e-12 && (r.end - 11.0).abs() < 1e-12);
        assert!(data_range(&[f64::NAN], 0.1).is_none());
        let flat = data_range(&[2.0, 2.0], 0.1).unwrap();
        assert!(flat.start < 2.0 && flat.end > 2.0);
    }

    #[test]
    fn band_outline_runs_forward_then_back() {
        let poly = band_polygon(&[0.0, 1.0], &[-1.0, -2.0], &[1.0, 2.0]);
        assert_eq!(poly, vec![(0.0, 1.0), (1.0, 2.0), (1.0, -2.0), (0.0, -1.0)]);
    }

    #[test]
    fn cell_edges_bracket_centres() {
        let lin = cell_edges(&[0.0, 1.0, 2.0], false);
        assert_eq!(lin, vec![-0.5, 0.5, 1.5, 2.5]);

        let log = cell_edges(&[1.0, 10.0, 100.0], true);
        assert!((log[1] - 10f64.sqrt()).abs() < 1e-12);
        assert!((log[0] - 1.0 / 10f64.sqrt()).abs() < 1e-12);
        assert!((log[3] - 100.0 * 10f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn render_svg_creates_missing_directories() {
        let dir = std::env::temp_dir().join(format!("fpit-svg-{}", std::process::id()));
        let path = dir.join("nested").join("blank.svg");
        render_svg(&path, (200, 100), |root| {
            root.draw(&Text::new("ok", (10, 10), (FONT, 12).into_font()))?;
            Ok(())
        })
        .unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
        let _ = fs::remove_dir_all(&dir);
    }
}
