//! Publication style: fonts, palette and the viridis colour map.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const FONT: &str = "serif";

/// Default single-panel canvas (pixels).
pub const FIGURE_SIZE: (u32, u32) = (1000, 600);
/// Default two-panel canvas (pixels).
pub const WIDE_FIGURE_SIZE: (u32, u32) = (1200, 500);

pub const CAPTION_SIZE: u32 = 22;
pub const LABEL_SIZE: u32 = 16;
pub const ANNOTATION_SIZE: u32 = 14;

pub const BLUE_C: RGBColor = RGBColor(31, 119, 180);
pub const ORANGE_C: RGBColor = RGBColor(255, 127, 14);
pub const GREEN_C: RGBColor = RGBColor(44, 160, 44);
pub const RED_C: RGBColor = RGBColor(214, 39, 40);
pub const PURPLE_C: RGBColor = RGBColor(148, 103, 189);
pub const GREY_C: RGBColor = RGBColor(128, 128, 128);

/// Cycle used when a figure draws several comparable lines.
pub const PALETTE: [RGBColor; 5] = [BLUE_C, ORANGE_C, GREEN_C, RED_C, PURPLE_C];

pub fn caption_font() -> TextStyle<'static> {
    (FONT, CAPTION_SIZE).into_font().into()
}

pub fn label_font() -> TextStyle<'static> {
    (FONT, LABEL_SIZE).into_font().into()
}

pub fn annotation_font() -> TextStyle<'static> {
    (FONT, ANNOTATION_SIZE).into_font().into()
}

/// Annotation text centred on its anchor.
pub fn centered_font(size: u32) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

/// Grid lines drawn under the data.
pub fn light_grid() -> ShapeStyle {
    BLACK.mix(0.08).stroke_width(1)
}

/// Anchor colours of the viridis map, evenly spaced on `[0, 1]`.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Viridis colour at `t ∈ [0, 1]` (clamped; NaN maps to the low end).
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let u = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let lerp = |p: u8, q: u8| (p as f64 + u * (q as f64 - p as f64)).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Snap `t ∈ [0, 1]` to the centre of one of `levels` equal bands.
pub fn quantize(t: f64, levels: usize) -> f64 {
    if levels < 2 {
        return t;
    }
    let band = (t.clamp(0.0, 1.0) * levels as f64).floor().min(levels as f64 - 1.0);
    (band + 0.5) / levels as f64
}

/// `n` colours sampled evenly across viridis.
pub fn viridis_steps(n: usize) -> Vec<RGBColor> {
    match n {
        0 => Vec::new(),
        1 => vec![viridis(0.0)],
        _ => (0..n).map(|i| viridis(i as f64 / (n - 1) as f64)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_hits_its_endpoints() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
        assert_eq!(viridis(2.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn quantize_snaps_to_band_centres() {
        assert!((quantize(0.0, 4) - 0.125).abs() < 1e-12);
        assert!((quantize(0.26, 4) - 0.375).abs() < 1e-12);
        assert!((quantize(1.0, 4) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn steps_span_the_map() {
        let steps = viridis_steps(6);
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], viridis(0.0));
        assert_eq!(steps[5], viridis(1.0));
    }
}
