//! Formatted terminal output.
//!
//! Formatting lives here so pipelines only produce data and output changes
//! stay local to one file.

use std::path::Path;

use crate::domain::{FigureData, FigureKind, FigureOutput};

pub fn format_saved(path: &Path) -> String {
    format!("Figure saved to {}", path.display())
}

/// Figure heading, saved-image lines, then any figure-specific summary.
pub fn format_run_summary(output: &FigureOutput) -> String {
    let mut out = format!("{}\n", output.figure.display_name());
    for img in &output.images {
        out.push_str(&format_saved(img));
        out.push('\n');
    }
    if output.figure == FigureKind::Decoherence {
        out.push_str(&format_decoherence_fit(&output.data));
    }
    out
}

/// Fitted parameters of the decoherence sweep, read back from its scalars.
pub fn format_decoherence_fit(data: &FigureData) -> String {
    let mut out = String::new();
    out.push_str("Fit: P(λ) = P0 · exp(-λ/λ0)\n");
    out.push_str(&format!(
        "- λ0 : {}\n",
        fmt_with_error(data.scalar("lambda0_fit"), data.scalar("lambda0_std_error"))
    ));
    out.push_str(&format!(
        "- P0 : {}\n",
        fmt_with_error(data.scalar("p0_fit"), data.scalar("p0_std_error"))
    ));
    if let Some(rmse) = data.scalar("rmse") {
        out.push_str(&format!("- RMSE: {rmse:.4e}\n"));
    }
    match data.scalar("failed_samples") {
        Some(n) if n > 0.0 => out.push_str(&format!("- failed simulation samples: {}\n", n as usize)),
        _ => {}
    }
    out
}

fn fmt_with_error(value: Option<f64>, std_error: Option<f64>) -> String {
    match (value, std_error) {
        (Some(v), Some(se)) if se.is_finite() => format!("{v:.6} ± {se:.6}"),
        (Some(v), _) => format!("{v:.6}"),
        (None, _) => "n/a".to_string(),
    }
}
