//! Sampling grids.
//!
//! Every figure starts by laying down a grid: a linear coordinate array, a
//! log-spaced frequency or coupling sweep, or a 2-D mesh for heatmaps.

use crate::error::AppError;

/// `n` evenly spaced points over `[start, stop]` (both ends included).
///
/// `n = 1` yields `[start]`, `n = 0` yields an empty grid.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the last point so the endpoint is exact.
            out[n - 1] = stop;
            out
        }
    }
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::invalid(format!(
            "Invalid log range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid("Log grid steps must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    out[steps - 1] = max;
    Ok(out)
}

/// Evaluate `f(x, y)` on the tensor grid `xs × ys`.
///
/// Row `j` holds `f(xs[i], ys[j])` for all `i`, the layout heatmaps expect.
pub fn meshgrid<F>(xs: &[f64], ys: &[f64], f: F) -> Vec<Vec<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    ys.iter()
        .map(|&y| xs.iter().map(|&x| f(x, y)).collect())
        .collect()
}

/// Spacing of a uniform grid (`0.0` for fewer than two points).
pub fn spacing(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    xs[1] - xs[0]
}
