//! CLI output formatting for every command.
//!
//! Each `format_*` function is pure and returns display lines; the matching
//! `print_*` wrapper writes them to stdout. Tests assert on the lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Sources
//!     Raster: logo.png
//!     Vector: none (placeholder)
//! ✓ favicon-32x32.png (32×32, conservative)
//! ✓ icon-mask.png (512×512, 340px safe zone, 86px padding)
//! ✓ icon.svg (placeholder)
//! ✓ site.webmanifest
//!
//! Validation
//!     ✓ favicon.ico (1.2 KB)
//!     ✗ icon-512.png
//! Missing 1 of 9 required files
//! ```
//!
//! ## Optimize PNG
//!
//! ```text
//! ✓ hero.png 240.3 KB → 98.1 KB (-59.2%, aggressive)
//! - badge.png (already optimal)
//! ✗ broken.png: Failed to decode ...
//! ```

use crate::optimize::{OptimizationStats, PngOutcome, PngReport, SvgFileReport, SvgOptimizeStats};
use crate::pipeline::{PipelineEvent, RunReport};
use crate::validate::ValidationReport;
use std::path::Path;

// ============================================================================
// Helpers
// ============================================================================

fn kib(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn mib(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

fn percent_smaller(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - optimized as f64) / original as f64 * 100.0
}

// ============================================================================
// Build
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::SourcesResolved { raster, vector } => vec![
            "Sources".to_string(),
            format!("    Raster: {}", raster.as_deref().unwrap_or("none")),
            format!(
                "    Vector: {}",
                vector.as_deref().unwrap_or("none (placeholder)")
            ),
        ],
        PipelineEvent::IconWritten {
            filename,
            size,
            tier,
        } => vec![format!("✓ {} ({}×{}, {})", filename, size, size, tier)],
        PipelineEvent::MaskableWritten {
            filename,
            canvas_size,
            icon_size,
            padding,
        } => vec![format!(
            "✓ {} ({}×{}, {}px safe zone, {}px padding)",
            filename, canvas_size, canvas_size, icon_size, padding
        )],
        PipelineEvent::LegacyIconWritten { filename }
        | PipelineEvent::ManifestWritten { filename }
        | PipelineEvent::SnippetWritten { filename } => vec![format!("✓ {}", filename)],
        PipelineEvent::VectorWritten {
            filename,
            placeholder,
            theme_injected,
            theme_restored,
            optimize_error,
            original_size,
            final_size,
        } => {
            let mut lines = Vec::new();
            if *placeholder {
                lines.push(format!("✓ {} (placeholder)", filename));
                return lines;
            }
            lines.push(format!(
                "✓ {} ({} → {})",
                filename,
                kib(*original_size),
                kib(*final_size)
            ));
            if *theme_injected {
                lines.push("    Theme: added light/dark rules".to_string());
            }
            if *theme_restored {
                lines.push("    Theme: restored after optimization".to_string());
            }
            if let Some(error) = optimize_error {
                lines.push(format!("    Unoptimized: {}", error));
            }
            lines
        }
        PipelineEvent::StepSkipped { step, reason } => {
            vec![format!("- {} skipped: {}", step, reason)]
        }
        PipelineEvent::StepFailed { step, error } => {
            vec![format!("✗ {} failed: {}", step, error)]
        }
    }
}

/// Present files with sizes, then missing ones, then a one-line summary.
pub fn format_validation(report: &ValidationReport) -> Vec<String> {
    let mut lines = vec!["Validation".to_string()];
    for file in &report.present {
        lines.push(format!("    ✓ {} ({})", file.filename, kib(file.size_bytes)));
    }
    for filename in &report.missing {
        lines.push(format!("    ✗ {}", filename));
    }

    let total = report.present.len() + report.missing.len();
    if report.is_complete() {
        lines.push(format!("All {} required files present", total));
    } else {
        lines.push(format!(
            "Missing {} of {} required files",
            report.missing.len(),
            total
        ));
    }
    lines
}

/// Closing summary for a completed build.
pub fn format_run_summary(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &report.raster_error {
        lines.push(format!("Raster icons failed: {}", error));
    }
    if let Some(error) = &report.vector_error {
        lines.push(format!("Vector icon failed: {}", error));
    }
    let stale = report.stale_files();
    if !stale.is_empty() {
        lines.push(format!("Not rebuilt this run: {}", stale.join(", ")));
    }
    if report.is_success() {
        lines.push(format!(
            "==> {} files written to {}",
            report.artifacts.len(),
            report.output_dir.display()
        ));
        lines.push("    Paste favicon-html.txt into your HTML <head>".to_string());
    } else {
        lines.push("==> Build incomplete".to_string());
    }
    lines
}

/// Shown when the source directory has no qualifying logo.
pub fn format_setup_instructions(source_dir: &Path) -> Vec<String> {
    let dir = source_dir.display();
    vec![
        "Setup required".to_string(),
        String::new(),
        format!("Add your logo files to: {}/", dir),
        String::new(),
        "Supported formats:".to_string(),
        "    logo.png, logo.jpg, logo.jpeg (high-res recommended)".to_string(),
        "    logo.svg (vector with theme support)".to_string(),
        String::new(),
        "Examples:".to_string(),
        format!("    {}/logo.png    raster source", dir),
        format!("    {}/logo.svg    vector source", dir),
        String::new(),
        "Then run: iconsmith build".to_string(),
    ]
}

pub fn print_event(event: &PipelineEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

pub fn print_validation(report: &ValidationReport) {
    for line in format_validation(report) {
        println!("{}", line);
    }
}

pub fn print_run_summary(report: &RunReport) {
    for line in format_run_summary(report) {
        println!("{}", line);
    }
}

pub fn print_setup_instructions(source_dir: &Path) {
    for line in format_setup_instructions(source_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch optimizers
// ============================================================================

/// One line per PNG, then totals for replaced files.
pub fn format_png_batch(reports: &[PngReport], stats: &OptimizationStats) -> Vec<String> {
    if reports.is_empty() {
        return vec!["No PNG files found to optimize".to_string()];
    }

    let mut lines = Vec::new();
    for report in reports {
        lines.push(match &report.outcome {
            PngOutcome::Replaced {
                tier,
                original_size,
                optimized_size,
            } => format!(
                "✓ {} {} → {} (-{:.1}%, {})",
                report.filename,
                kib(*original_size),
                kib(*optimized_size),
                percent_smaller(*original_size, *optimized_size),
                tier
            ),
            PngOutcome::Skipped { .. } => format!("- {} (already optimal)", report.filename),
            PngOutcome::Failed(error) => format!("✗ {}: {}", report.filename, error),
        });
    }

    lines.push(String::new());
    if stats.processed == 0 {
        lines.push("No files were optimized (all already optimal)".to_string());
    } else {
        lines.push(format!("Files optimized: {}", stats.processed));
        lines.push(format!("Original size: {}", mib(stats.total_original)));
        lines.push(format!("Optimized size: {}", mib(stats.total_optimized)));
        lines.push(format!(
            "Saved: {} ({:.1}%)",
            mib(stats.saved_bytes()),
            stats.savings_percent()
        ));
    }
    if stats.failed > 0 {
        lines.push(format!("Failed: {}", stats.failed));
    }
    lines
}

pub fn format_svg_batch(reports: &[SvgFileReport], stats: &SvgOptimizeStats) -> Vec<String> {
    if reports.is_empty() && stats.failed == 0 {
        return vec!["No SVG files found to optimize".to_string()];
    }

    let mut lines: Vec<String> = reports
        .iter()
        .map(|r| format!("✓ {} ({:.1}% smaller)", r.filename, r.savings_percent))
        .collect();
    lines.push(String::new());
    lines.push(format!("Files optimized: {}", stats.files));
    if stats.files > 0 {
        lines.push(format!(
            "Total: {} → {} (average {:.1}% smaller)",
            kib(stats.total_original),
            kib(stats.total_optimized),
            stats.average_savings()
        ));
    }
    if stats.failed > 0 {
        lines.push(format!("Failed: {}", stats.failed));
    }
    lines
}

pub fn print_png_batch(reports: &[PngReport], stats: &OptimizationStats) {
    for line in format_png_batch(reports, stats) {
        println!("{}", line);
    }
}

pub fn print_svg_batch(reports: &[SvgFileReport], stats: &SvgOptimizeStats) {
    for line in format_svg_batch(reports, stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
