//! One figure run: generate -> export -> preview -> report.
//!
//! Both the single-figure subcommands and `all` go through here, so exports
//! and terminal output behave the same either way.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{DecoherenceConfig, FigureConfig, FigureKind, FigureOutput};
use crate::error::AppError;

/// Run `kind` and handle its optional exports and terminal output.
///
/// With `per_figure_exports` the export paths get the figure slug inserted
/// before the extension, so `all` writes one file per figure.
pub fn run_figure(
    kind: FigureKind,
    cfg: &FigureConfig,
    deco: &DecoherenceConfig,
    per_figure_exports: bool,
) -> Result<FigureOutput, AppError> {
    let output = crate::figures::generate(kind, cfg, deco)?;
    for img in &output.images {
        info!(figure = kind.slug(), path = %img.display(), "Image written");
    }

    let export_path = |p: &PathBuf| {
        if per_figure_exports { per_figure_path(p, kind.slug()) } else { p.clone() }
    };
    if let Some(path) = cfg.export_json.as_ref().map(&export_path) {
        crate::io::write_figure_json(&path, &output)?;
    }
    if let Some(path) = cfg.export_csv.as_ref().map(&export_path) {
        crate::io::write_series_csv(&path, &output.data)?;
    }

    if cfg.preview {
        println!(
            "{}",
            crate::plot::render_ascii_preview(&output.data, cfg.preview_width, cfg.preview_height)
        );
    }
    print!("{}", crate::report::format_run_summary(&output));

    Ok(output)
}

/// `out/data.json` + `lisa` -> `out/data.lisa.json`.
pub fn per_figure_path(path: &Path, slug: &str) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{slug}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{slug}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn per_figure_path_inserts_slug() {
        assert_eq!(
            per_figure_path(Path::new("out/data.json"), "lisa"),
            PathBuf::from("out/data.lisa.json")
        );
        assert_eq!(per_figure_path(Path::new("series"), "anec"), PathBuf::from("series.anec"));
    }

    #[test]
    fn run_writes_image_and_exports() {
        let dir = scratch_dir("pipeline");
        let cfg = FigureConfig {
            out_dir: dir.clone(),
            export_json: Some(dir.join("run.json")),
            export_csv: Some(dir.join("run.csv")),
            ..FigureConfig::default()
        };
        let out = run_figure(FigureKind::Scaling, &cfg, &DecoherenceConfig::default(), true).unwrap();
        assert!(out.images[0].exists());
        assert!(dir.join("run.scaling.json").exists());
        let csv = std::fs::read_to_string(dir.join("run.scaling.csv")).unwrap();
        assert!(csv.lines().any(|l| l.starts_with("actual,")));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
