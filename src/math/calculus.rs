//! Finite-difference calculus on sampled grids.

/// Numerical derivative `dy/dx` on a (possibly non-uniform) grid.
///
/// Interior points use the second-order accurate central scheme for uneven
/// spacing; the two end points use first-order one-sided differences. This is
/// exact for quadratics in the interior.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len().min(x.len());
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = vec![0.0; n];
    out[0] = (y[1] - y[0]) / (x[1] - x[0]);
    out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);

    for i in 1..n - 1 {
        let hd = x[i] - x[i - 1];
        let hs = x[i + 1] - x[i];
        // Weights from the 3-point Lagrange derivative at x[i].
        let a = -hs / (hd * (hd + hs));
        let b = (hs - hd) / (hd * hs);
        let c = hd / (hs * (hd + hs));
        out[i] = a * y[i - 1] + b * y[i] + c * y[i + 1];
    }
    out
}

/// Left Riemann running integral: `out[i] = Σ_{k≤i} y[k] · dx`.
pub fn cumulative_sum_integral(y: &[f64], dx: f64) -> Vec<f64> {
    let mut acc = 0.0;
    y.iter()
        .map(|&v| {
            acc += v;
            acc * dx
        })
        .collect()
}

/// Discrete 1-D Laplacian `h[i-1] - 2h[i] + h[i+1]` with reflecting edges.
///
/// The ghost cell beyond each end mirrors the boundary sample, so
/// `h[-1] = h[0]` and `h[n] = h[n-1]`. No grid-spacing factor is applied.
pub fn laplacian_reflect(h: &[f64]) -> Vec<f64> {
    let n = h.len();
    (0..n)
        .map(|i| {
            let left = if i == 0 { h[0] } else { h[i - 1] };
            let right = if i + 1 == n { h[n - 1] } else { h[i + 1] };
            left - 2.0 * h[i] + right
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::grid::linspace;

    #[test]
    fn gradient_is_exact_for_quadratics_inside() {
        let x = linspace(-2.0, 2.0, 21);
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v * v - v + 1.0).collect();
        let dy = gradient(&y, &x);
        for i in 1..x.len() - 1 {
            let exact = 6.0 * x[i] - 1.0;
            assert!((dy[i] - exact).abs() < 1e-9, "i={i}: {} vs {exact}", dy[i]);
        }
    }

    #[test]
    fn gradient_handles_uneven_spacing() {
        let x = vec![0.0, 0.5, 2.0, 2.25];
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let dy = gradient(&y, &x);
        assert!((dy[1] - 1.0).abs() < 1e-12);
        assert!((dy[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn cumulative_integral_of_constant_is_linear() {
        let out = cumulative_sum_integral(&[2.0; 4], 0.5);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn laplacian_of_constant_vanishes_with_reflecting_edges() {
        let out = laplacian_reflect(&[1.5; 6]);
        assert!(out.iter().all(|v| v.abs() < 1e-15));
    }

    #[test]
    fn laplacian_edges_mirror_boundary() {
        let out = laplacian_reflect(&[1.0, 2.0, 4.0]);
        // left ghost = 1.0, right ghost = 4.0
        assert_eq!(out, vec![1.0, 1.0, -2.0]);
    }
}
