//! Batch optimizers for assets outside the favicon set.
//!
//! ## PNG
//!
//! Every `*.png` directly inside a directory is re-encoded in place with the
//! profile the compression selector picks for it. The re-encode goes to a
//! temporary file next to the original and only replaces it when the result
//! is smaller by more than [`MIN_SAVINGS_BYTES`]. The temporary file is
//! removed on every other path.
//!
//! ## SVG
//!
//! Every non-hidden `*.svg` in a source directory is run through an
//! [`SvgOptimizer`] into a destination directory.
//!
//! Both passes thread an explicit statistics accumulator through each
//! per-file call; there is no shared counter.

use crate::imaging::{BackendError, ImageBackend, ReencodeParams, StrategyTier};
use crate::imaging::{select_profile, select_tier};
use crate::svg::{OptimizeOptions, SvgError, SvgOptimizer, check_well_formed};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A re-encode must save more than this to replace the original.
pub const MIN_SAVINGS_BYTES: u64 = 1024;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Backend(#[from] BackendError),
    #[error("SVG error: {0}")]
    Svg(#[from] SvgError),
}

// =============================================================================
// PNG
// =============================================================================

/// Running totals for the PNG pass. Sizes cover replaced files only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizationStats {
    /// Files replaced by a smaller re-encode.
    pub processed: usize,
    /// Files kept because the re-encode did not save enough.
    pub skipped: usize,
    pub failed: usize,
    pub total_original: u64,
    pub total_optimized: u64,
}

impl OptimizationStats {
    pub fn saved_bytes(&self) -> u64 {
        self.total_original.saturating_sub(self.total_optimized)
    }

    pub fn savings_percent(&self) -> f64 {
        percent_saved(self.total_original, self.total_optimized)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PngOutcome {
    Replaced {
        tier: StrategyTier,
        original_size: u64,
        optimized_size: u64,
    },
    Skipped {
        tier: StrategyTier,
        original_size: u64,
        optimized_size: u64,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PngReport {
    pub filename: String,
    pub outcome: PngOutcome,
}

/// Re-encode one PNG in place if that saves enough.
///
/// Per-file failures are recorded in the outcome and the stats, never
/// returned as errors.
pub fn optimize_png_file<B: ImageBackend>(
    backend: &B,
    path: &Path,
    progressive: bool,
    mut stats: OptimizationStats,
) -> (OptimizationStats, PngOutcome) {
    let outcome = match reencode_if_smaller(backend, path, progressive) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "PNG optimization failed");
            PngOutcome::Failed(e.to_string())
        }
    };

    match &outcome {
        PngOutcome::Replaced {
            original_size,
            optimized_size,
            ..
        } => {
            stats.processed += 1;
            stats.total_original += original_size;
            stats.total_optimized += optimized_size;
        }
        PngOutcome::Skipped { .. } => stats.skipped += 1,
        PngOutcome::Failed(_) => stats.failed += 1,
    }
    (stats, outcome)
}

fn reencode_if_smaller<B: ImageBackend>(
    backend: &B,
    path: &Path,
    progressive: bool,
) -> Result<PngOutcome, OptimizeError> {
    let info = backend.identify(path)?;
    let tier = select_tier(info.file_size);
    let profile = select_profile(tier, info.has_alpha(), info.pixel_count(), progressive);
    debug!(
        path = %path.display(),
        %tier,
        width = info.width,
        height = info.height,
        channels = info.channels,
        "re-encoding PNG"
    );

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(".iconsmith-")
        .suffix(".png")
        .tempfile_in(dir)?;
    backend.reencode(&ReencodeParams {
        source: path.to_path_buf(),
        output: temp.path().to_path_buf(),
        profile,
    })?;

    let original_size = info.file_size;
    let optimized_size = fs::metadata(temp.path())?.len();
    if optimized_size < original_size && original_size - optimized_size > MIN_SAVINGS_BYTES {
        // Temp files are owner-only; keep the original's mode.
        fs::set_permissions(temp.path(), fs::metadata(path)?.permissions())?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(PngOutcome::Replaced {
            tier,
            original_size,
            optimized_size,
        })
    } else {
        Ok(PngOutcome::Skipped {
            tier,
            original_size,
            optimized_size,
        })
    }
}

/// Optimize every PNG directly inside `dir`, in file-name order.
///
/// A missing directory is an empty batch.
pub fn optimize_png_dir<B: ImageBackend>(
    backend: &B,
    dir: &Path,
    progressive: bool,
    stats: OptimizationStats,
) -> Result<(OptimizationStats, Vec<PngReport>), OptimizeError> {
    if !dir.is_dir() {
        info!(dir = %dir.display(), "no PNG directory, nothing to optimize");
        return Ok((stats, Vec::new()));
    }

    let files = list_files(dir, "png")?;
    let mut stats = stats;
    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let (next, outcome) = optimize_png_file(backend, &path, progressive, stats);
        stats = next;
        reports.push(PngReport {
            filename: file_name(&path),
            outcome,
        });
    }
    Ok((stats, reports))
}

// =============================================================================
// SVG
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgOptimizeStats {
    pub files: usize,
    pub failed: usize,
    pub total_original: u64,
    pub total_optimized: u64,
    pub savings_percent_sum: f64,
}

impl SvgOptimizeStats {
    /// Mean of the per-file savings percentages.
    pub fn average_savings(&self) -> f64 {
        if self.files == 0 {
            0.0
        } else {
            self.savings_percent_sum / self.files as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgFileReport {
    pub filename: String,
    pub original_size: u64,
    pub optimized_size: u64,
    pub savings_percent: f64,
}

/// Optimize `input` into `output`, creating the output directory.
pub fn optimize_svg_file(
    optimizer: &impl SvgOptimizer,
    options: &OptimizeOptions,
    input: &Path,
    output: &Path,
) -> Result<SvgFileReport, OptimizeError> {
    let content = fs::read_to_string(input)?;
    let optimized = optimizer.optimize(&content, options)?;
    check_well_formed(&optimized)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &optimized)?;

    let original_size = content.len() as u64;
    let optimized_size = optimized.len() as u64;
    Ok(SvgFileReport {
        filename: file_name(output),
        original_size,
        optimized_size,
        savings_percent: percent_saved(original_size, optimized_size),
    })
}

/// Optimize every non-hidden SVG in `src` into `dst`.
///
/// Failing files are logged, counted and skipped. A missing `src` is an
/// empty batch.
pub fn optimize_svg_dir(
    optimizer: &impl SvgOptimizer,
    src: &Path,
    dst: &Path,
    stats: SvgOptimizeStats,
) -> Result<(SvgOptimizeStats, Vec<SvgFileReport>), OptimizeError> {
    if !src.is_dir() {
        info!(dir = %src.display(), "no static directory, nothing to optimize");
        return Ok((stats, Vec::new()));
    }

    let options = OptimizeOptions::default();
    let mut stats = stats;
    let mut reports = Vec::new();
    for input in list_files(src, "svg")? {
        let output = dst.join(file_name(&input));
        match optimize_svg_file(optimizer, &options, &input, &output) {
            Ok(report) => {
                stats.files += 1;
                stats.total_original += report.original_size;
                stats.total_optimized += report.optimized_size;
                stats.savings_percent_sum += report.savings_percent;
                reports.push(report);
            }
            Err(e) => {
                warn!(path = %input.display(), error = %e, "SVG optimization failed, skipping");
                stats.failed += 1;
            }
        }
    }
    Ok((stats, reports))
}

// =============================================================================
// Helpers
// =============================================================================

/// Non-hidden regular files in `dir` with extension `ext` (any case), sorted.
fn list_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, OptimizeError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.starts_with('.') || !name.ends_with(&format!(".{ext}")) {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn percent_saved(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - optimized as f64) / original as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::svg::StructuralOptimizer;
    use crate::test_helpers::{SAMPLE_SVG, write_png_with_text, write_test_png};
    use tempfile::TempDir;

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn bloated_png_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bloated.png");
        write_png_with_text(&path, 64, 64, 16 * 1024);
        let before = fs::metadata(&path).unwrap().len();

        let (stats, outcome) =
            optimize_png_file(&RustBackend::new(), &path, false, OptimizationStats::default());

        let after = fs::metadata(&path).unwrap().len();
        assert!(matches!(outcome, PngOutcome::Replaced { .. }));
        assert!(after + MIN_SAVINGS_BYTES < before);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.total_original, before);
        assert_eq!(stats.total_optimized, after);
        assert_eq!(entry_names(tmp.path()), vec!["bloated.png"]);

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 64));
    }

    #[cfg(unix)]
    #[test]
    fn replaced_png_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shared.png");
        write_png_with_text(&path, 64, 64, 16 * 1024);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let (_, outcome) =
            optimize_png_file(&RustBackend::new(), &path, false, OptimizationStats::default());

        assert!(matches!(outcome, PngOutcome::Replaced { .. }));
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn lean_png_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lean.png");
        write_test_png(&path, 16, 16);
        let before = fs::read(&path).unwrap();

        let (stats, outcome) =
            optimize_png_file(&RustBackend::new(), &path, false, OptimizationStats::default());

        assert!(matches!(outcome, PngOutcome::Skipped { .. }));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total_original, 0);
        assert_eq!(entry_names(tmp.path()), vec!["lean.png"]);
    }

    #[test]
    fn broken_png_is_counted_and_cleaned_up() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        fs::write(&path, b"not a png").unwrap();

        let (stats, outcome) =
            optimize_png_file(&RustBackend::new(), &path, false, OptimizationStats::default());

        assert!(matches!(outcome, PngOutcome::Failed(_)));
        assert_eq!(stats.failed, 1);
        assert_eq!(entry_names(tmp.path()), vec!["broken.png"]);
    }

    #[test]
    fn stats_accumulate_across_calls() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        write_test_png(&a, 8, 8);
        fs::write(&b, b"junk").unwrap();

        let backend = RustBackend::new();
        let (stats, _) = optimize_png_file(&backend, &a, false, OptimizationStats::default());
        let (stats, _) = optimize_png_file(&backend, &b, false, stats);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn png_dir_processes_sorted_pngs_only() {
        let tmp = TempDir::new().unwrap();
        write_test_png(&tmp.path().join("b.png"), 8, 8);
        write_test_png(&tmp.path().join("A.PNG"), 8, 8);
        write_test_png(&tmp.path().join(".hidden.png"), 8, 8);
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let (stats, reports) = optimize_png_dir(
            &RustBackend::new(),
            tmp.path(),
            false,
            OptimizationStats::default(),
        )
        .unwrap();

        let names: Vec<&str> = reports.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["A.PNG", "b.png"]);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn png_dir_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let (stats, reports) = optimize_png_dir(
            &RustBackend::new(),
            &tmp.path().join("nope"),
            false,
            OptimizationStats::default(),
        )
        .unwrap();
        assert!(reports.is_empty());
        assert_eq!(stats, OptimizationStats::default());
    }

    #[test]
    fn stats_savings_percent() {
        let stats = OptimizationStats {
            total_original: 4000,
            total_optimized: 1000,
            ..Default::default()
        };
        assert_eq!(stats.saved_bytes(), 3000);
        assert!((stats.savings_percent() - 75.0).abs() < 1e-9);
        assert_eq!(OptimizationStats::default().savings_percent(), 0.0);
    }

    #[test]
    fn svg_dir_optimizes_into_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("static");
        let dst = tmp.path().join("docs");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("logo.svg"), SAMPLE_SVG).unwrap();
        fs::write(src.join(".draft.svg"), SAMPLE_SVG).unwrap();
        fs::write(src.join("broken.svg"), "<svg><g></svg>").unwrap();
        fs::write(src.join("readme.md"), "x").unwrap();

        let (stats, reports) =
            optimize_svg_dir(&StructuralOptimizer, &src, &dst, SvgOptimizeStats::default())
                .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].filename, "logo.svg");
        assert!(reports[0].optimized_size < reports[0].original_size);
        assert!(reports[0].savings_percent > 0.0);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.failed, 1);
        assert!((stats.average_savings() - reports[0].savings_percent).abs() < 1e-9);
        assert_eq!(entry_names(&dst), vec!["logo.svg"]);

        let written = fs::read_to_string(dst.join("logo.svg")).unwrap();
        check_well_formed(&written).unwrap();
        assert!(!written.contains("aria-label"));
    }

    #[test]
    fn svg_dir_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let (stats, reports) = optimize_svg_dir(
            &StructuralOptimizer,
            &tmp.path().join("static"),
            &tmp.path().join("docs"),
            SvgOptimizeStats::default(),
        )
        .unwrap();
        assert!(reports.is_empty());
        assert_eq!(stats.files, 0);
        assert_eq!(stats.average_savings(), 0.0);
    }
}
