//! Schematic comparing stabilizer codes with constraint-enforced rigidity.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::linspace;
use crate::plot::style::{BLUE_C, GREEN_C, PURPLE_C, RED_C, WIDE_FIGURE_SIZE, centered_font, label_font};
use crate::plot::{band_polygon, draw_legend_at, render_svg};

pub const FILE_NAME: &str = "qecc_analogy.svg";

/// Samples of the metric carrying the tighter stabilised band.
pub const STABILIZED: Range<usize> = 20..80;

type Link = ((f64, f64), (f64, f64));

#[derive(Debug, Clone)]
pub struct QeccSchematic {
    pub qubits: Vec<(f64, f64)>,
    /// Horizontal (X-type) stabilizer links.
    pub x_links: Vec<Link>,
    /// Vertical (Z-type) stabilizer links.
    pub z_links: Vec<Link>,
    pub x: Vec<f64>,
    pub metric: Vec<f64>,
}

/// Qubits on the 3×3 lattice `{1, 2, 3}²`, links between nearest neighbours.
pub fn compute(points: usize) -> QeccSchematic {
    let mut qubits = Vec::with_capacity(9);
    let mut x_links = Vec::new();
    let mut z_links = Vec::new();
    for i in 1..=3 {
        for j in 1..=3 {
            let (x, y) = (i as f64, j as f64);
            qubits.push((x, y));
            if i < 3 {
                x_links.push(((x, y), (x + 1.0, y)));
            }
            if j < 3 {
                z_links.push(((x, y), (x, y + 1.0)));
            }
        }
    }

    let x = linspace(0.0, 4.0, points);
    let metric = x
        .iter()
        .map(|&xi| 2.0 + 0.5 * (2.0 * std::f64::consts::PI * xi / 4.0).sin())
        .collect();
    QeccSchematic { qubits, x_links, z_links, x, metric }
}

impl QeccSchematic {
    fn offset(&self, range: Range<usize>, delta: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let end = range.end.min(self.x.len());
        let start = range.start.min(end);
        let x = self.x[start..end].to_vec();
        let lower = self.metric[start..end].iter().map(|m| m - delta).collect();
        let upper = self.metric[start..end].iter().map(|m| m + delta).collect();
        (x, lower, upper)
    }

    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::QeccAnalogy);
        data.series.push(Series::new("spacetime_metric", self.x.clone(), self.metric.clone()));
        let (x, lower, upper) = self.offset(0..self.x.len(), 0.1);
        data.series.push(Series::new("perturbation_lower", x.clone(), lower));
        data.series.push(Series::new("perturbation_upper", x, upper));
        let (x, lower, upper) = self.offset(STABILIZED, 0.05);
        data.series.push(Series::new("stabilized_lower", x.clone(), lower));
        data.series.push(Series::new("stabilized_upper", x, upper));
        data.scalars.push(("qubits".to_string(), self.qubits.len() as f64));
        data
    }
}

pub fn render(s: &QeccSchematic, path: &Path) -> Result<(), AppError> {
    render_svg(path, WIDE_FIGURE_SIZE, |root| {
        let (w, h) = root.dim_in_pixel();
        let (left, right) = root.split_horizontally(w as i32 / 2);

        let mut a = ChartBuilder::on(&left)
            .caption("Quantum Error-Correcting Code (Stabilizer Checks)", label_font())
            .margin(30)
            .build_cartesian_2d(0.0..4.0, 0.0..4.0)?;
        a.draw_series(std::iter::once(Rectangle::new([(0.0, 0.0), (4.0, 4.0)], BLACK.stroke_width(1))))?;
        a.draw_series(s.x_links.iter().map(|&(p, q)| PathElement::new(vec![p, q], BLUE_C.stroke_width(2))))?;
        a.draw_series(s.z_links.iter().map(|&(p, q)| PathElement::new(vec![p, q], RED_C.stroke_width(2))))?;
        a.draw_series(s.qubits.iter().map(|&p| Circle::new(p, 6, BLACK.filled())))?;
        a.draw_series(std::iter::once(Text::new(
            "Stabilizers Project Out Local Errors",
            (2.0, 0.5),
            centered_font(16),
        )))?;

        let mut b = ChartBuilder::on(&right)
            .caption("Constraint Tensor C_μν Enforcing Metric Rigidity", label_font())
            .margin(30)
            .build_cartesian_2d(0.0..4.0, 0.0..4.0)?;
        b.draw_series(std::iter::once(Rectangle::new([(0.0, 0.0), (4.0, 4.0)], BLACK.stroke_width(1))))?;

        let (x, lower, upper) = s.offset(0..s.x.len(), 0.1);
        b.draw_series(std::iter::once(Polygon::new(band_polygon(&x, &lower, &upper), RED_C.mix(0.2).filled())))?
            .label("Perturbations")
            .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], RED_C.mix(0.2).filled()));
        let (x, lower, upper) = s.offset(STABILIZED, 0.05);
        b.draw_series(std::iter::once(Polygon::new(band_polygon(&x, &lower, &upper), GREEN_C.mix(0.3).filled())))?
            .label("C_μν Stabilization")
            .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], GREEN_C.mix(0.3).filled()));
        b.draw_series(LineSeries::new(
            s.x.iter().copied().zip(s.metric.iter().copied()),
            BLACK.stroke_width(3),
        ))?
        .label("Spacetime Metric")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(3)));
        draw_legend_at(&mut b, SeriesLabelPosition::LowerRight)?;

        let caption = centered_font(18).color(&PURPLE_C);
        let (cx, cy) = (w as i32 / 2, (h as f64 * 0.4) as i32);
        root.draw(&Text::new("Structural Analogy", (cx, cy - 12), caption.clone()))?;
        root.draw(&Text::new("(Rigidity via Constraints)", (cx, cy + 12), caption))?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let s = compute(100);
    let path = cfg.out_dir.join(FILE_NAME);
    render(&s, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::QeccAnalogy,
        images: vec![path],
        data: s.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn lattice_has_nine_qubits_and_twelve_links() {
        let s = compute(100);
        assert_eq!(s.qubits.len(), 9);
        assert_eq!(s.x_links.len(), 6);
        assert_eq!(s.z_links.len(), 6);
        assert!(s.x_links.iter().all(|(p, q)| p.1 == q.1));
        assert!(s.z_links.iter().all(|(p, q)| p.0 == q.0));
    }

    #[test]
    fn stabilized_band_is_narrower_and_shorter() {
        let s = compute(100);
        let data = s.figure_data();
        let lower = data.series.iter().find(|x| x.label == "stabilized_lower").unwrap();
        assert_eq!(lower.len(), 60);
        assert!((s.metric[20] - lower.y[0] - 0.05).abs() < 1e-12);
        assert_eq!(data.scalar("qubits"), Some(9.0));
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("qecc");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
