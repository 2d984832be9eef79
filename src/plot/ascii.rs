//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Series are drawn as connected lines, one glyph per series in order:
//! `*`, `o`, `x`, `+`, `#`. Figures that only carry 2-D fields are drawn as
//! a density ramp instead.

use crate::domain::{Field2d, FigureData, Series};

const SERIES_GLYPHS: [char; 5] = ['*', 'o', 'x', '+', '#'];
const DENSITY_RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Preview a figure's data in a `width × height` character grid.
pub fn render_ascii_preview(data: &FigureData, width: usize, height: usize) -> String {
    if !data.series.is_empty() {
        render_series(data.figure.slug(), &data.series, width, height)
    } else if let Some(field) = data.fields.first() {
        render_field(data.figure.slug(), field, width, height)
    } else {
        format!("Preview: {} | nothing to draw\n", data.figure.slug())
    }
}

fn render_series(title: &str, series: &[Series], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max, y_min, y_max)) = bounds(series) else {
        return format!("Preview: {title} | no finite samples\n");
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (s, &glyph) in series.iter().zip(SERIES_GLYPHS.iter().cycle()) {
        draw_series(&mut grid, s, glyph, x_min, x_max, y_min, y_max);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Preview: {title} | x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3e}, {y_max:.3e}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (s, glyph) in series.iter().zip(SERIES_GLYPHS.iter().cycle()) {
        out.push_str(&format!("  {glyph} {}\n", s.label));
    }
    out
}

fn render_field(title: &str, field: &Field2d, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((z_min, z_max)) = field.z_range() else {
        return format!("Preview: {title} | no finite samples\n");
    };
    let ny = field.z.len();
    let nx = field.z.first().map(|r| r.len()).unwrap_or(0);
    if nx == 0 || ny == 0 {
        return format!("Preview: {title} | no finite samples\n");
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Preview: {title} | {} | z=[{z_min:.3e}, {z_max:.3e}]\n",
        field.label
    ));
    // Row 0 is the top of the plot, i.e. the last y sample.
    for row in 0..height {
        let j = nearest_index(height - 1 - row, height, ny);
        let line: String = (0..width)
            .map(|col| {
                let i = nearest_index(col, width, nx);
                density_glyph(field.z[j][i], z_min, z_max)
            })
            .collect();
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn nearest_index(cell: usize, cells: usize, samples: usize) -> usize {
    if cells < 2 || samples < 2 {
        return 0;
    }
    let u = cell as f64 / (cells as f64 - 1.0);
    (u * (samples as f64 - 1.0)).round() as usize
}

fn density_glyph(z: f64, z_min: f64, z_max: f64) -> char {
    if !z.is_finite() {
        return '?';
    }
    let span = z_max - z_min;
    let u = if span > 0.0 { ((z - z_min) / span).clamp(0.0, 1.0) } else { 0.0 };
    let idx = (u * (DENSITY_RAMP.len() as f64 - 1.0)).round() as usize;
    DENSITY_RAMP[idx]
}

fn bounds(series: &[Series]) -> Option<(f64, f64, f64, f64)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in series {
        for (x, y) in s.points() {
            if x.is_finite() && y.is_finite() {
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    Some((x_min, x_max, y_min, y_max))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Connect consecutive finite samples; a non-finite sample breaks the line.
fn draw_series(grid: &mut [Vec<char>], s: &Series, ch: char, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for (x, y) in s.points() {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, cx, cy, ch),
            None => {
                if grid[cy][cx] == ' ' {
                    grid[cy][cx] = ch;
                }
            }
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FigureKind;

    #[test]
    fn preview_golden_snapshot_small() {
        let mut data = FigureData::new(FigureKind::Scaling);
        data.series.push(Series::new("theory", vec![0.0, 9.0], vec![0.0, 1.0]));

        let txt = render_ascii_preview(&data, 10, 5);
        let expected = concat!(
            "Preview: scaling | x=[0.000, 9.000] | y=[-5.000e-2, 1.050e0]\n",
            "        **\n",
            "      **  \n",
            "    **    \n",
            "  **      \n",
            "**        \n",
            "  * theory\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn non_finite_samples_break_the_line() {
        let mut data = FigureData::new(FigureKind::Decoherence);
        data.series.push(Series::new("sim", vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 1.0]));

        let txt = render_ascii_preview(&data, 10, 5);
        let flat_row = txt.lines().nth(5).unwrap();
        // Only the two endpoints are drawn on the flat line.
        assert_eq!(flat_row.matches('*').count(), 2);
    }

    #[test]
    fn field_only_figures_use_density_ramp() {
        let mut data = FigureData::new(FigureKind::PhaseDiagram);
        data.fields.push(Field2d {
            label: "T".to_string(),
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
            z: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
        });

        let txt = render_ascii_preview(&data, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "@@@@@@@@@@");
        assert_eq!(lines[5], "          ");
    }
}
