//! The favicon SVG step.
//!
//! With a source: make sure it carries the theme rule, optimize, restore the
//! theme `<style>` if the optimizer dropped it, and fall back to the
//! unoptimized (theme-patched) markup when optimization fails. Without a
//! source: write the placeholder badge.

use super::optimizer::{OptimizeOptions, SvgOptimizer, check_well_formed};
use super::theme::{
    ThemeColors, extract_theme_style, has_theme_rule, inject_after_root, placeholder_svg,
    theme_stylesheet,
};
use super::SvgError;
use crate::config::{SvgConfig, ThemeConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorOrigin {
    Placeholder,
    Source(PathBuf),
}

/// Result of transforming SVG markup, before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedVector {
    pub svg: String,
    /// The theme stylesheet was added because the source lacked one.
    pub theme_injected: bool,
    /// The optimizer dropped the theme rule and it was put back.
    pub theme_restored: bool,
    /// Set when optimization failed and the unoptimized markup was kept.
    pub optimize_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorOutcome {
    pub origin: VectorOrigin,
    pub output: PathBuf,
    pub theme_injected: bool,
    pub theme_restored: bool,
    pub optimize_error: Option<String>,
    pub original_size: u64,
    pub final_size: u64,
}

/// Theme-patch and optimize `source` markup.
///
/// Only a source without an `<svg>` root is an error; optimizer failures
/// (including output that is not well-formed) fall back to the patched input.
pub fn prepare_vector(
    source: &str,
    colors: &ThemeColors,
    optimizer: &impl SvgOptimizer,
    options: &OptimizeOptions,
) -> Result<PreparedVector, SvgError> {
    let (patched, theme_injected) = if has_theme_rule(source) {
        (source.to_string(), false)
    } else {
        (inject_after_root(source, &theme_stylesheet(colors))?, true)
    };
    let preserved = extract_theme_style(&patched);

    let optimized = optimizer.optimize(&patched, options).and_then(|svg| {
        check_well_formed(&svg)?;
        Ok(svg)
    });

    match optimized {
        Ok(svg) => {
            let (svg, theme_restored) = match preserved {
                Some(block) if !has_theme_rule(&svg) => {
                    debug!("optimizer removed theme rule, restoring");
                    (inject_after_root(&svg, &block)?, true)
                }
                _ => (svg, false),
            };
            Ok(PreparedVector {
                svg,
                theme_injected,
                theme_restored,
                optimize_error: None,
            })
        }
        Err(e) => {
            warn!(error = %e, "SVG optimization failed, keeping unoptimized markup");
            Ok(PreparedVector {
                svg: patched,
                theme_injected,
                theme_restored: false,
                optimize_error: Some(e.to_string()),
            })
        }
    }
}

/// Write the favicon SVG into `output_dir`.
pub fn process_vector(
    source: Option<&Path>,
    output_dir: &Path,
    svg_config: &SvgConfig,
    theme: &ThemeConfig,
    optimizer: &impl SvgOptimizer,
) -> Result<VectorOutcome, SvgError> {
    let colors = ThemeColors::from_config(theme);
    let output = output_dir.join(&svg_config.filename);

    let Some(source) = source else {
        let svg = placeholder_svg(&colors, &theme.placeholder_letter);
        fs::write(&output, &svg)?;
        return Ok(VectorOutcome {
            origin: VectorOrigin::Placeholder,
            output,
            theme_injected: false,
            theme_restored: false,
            optimize_error: None,
            original_size: 0,
            final_size: svg.len() as u64,
        });
    };

    let content = fs::read_to_string(source)?;
    let prepared = prepare_vector(
        &content,
        &colors,
        optimizer,
        &OptimizeOptions::favicon(svg_config),
    )?;
    fs::write(&output, &prepared.svg)?;

    Ok(VectorOutcome {
        origin: VectorOrigin::Source(source.to_path_buf()),
        output,
        theme_injected: prepared.theme_injected,
        theme_restored: prepared.theme_restored,
        optimize_error: prepared.optimize_error,
        original_size: content.len() as u64,
        final_size: prepared.svg.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::StructuralOptimizer;
    use tempfile::TempDir;

    /// Optimizer that drops every `<style>` element, like an aggressive
    /// style-inlining pass would.
    struct StyleStrippingOptimizer;

    impl SvgOptimizer for StyleStrippingOptimizer {
        fn optimize(&self, svg: &str, _options: &OptimizeOptions) -> Result<String, SvgError> {
            let start = svg.find("<style").ok_or(SvgError::Optimize("no style".into()))?;
            let end = svg.find("</style>").ok_or(SvgError::Optimize("no style".into()))?;
            Ok(format!("{}{}", &svg[..start], &svg[end + "</style>".len()..]))
        }
    }

    struct FailingOptimizer;

    impl SvgOptimizer for FailingOptimizer {
        fn optimize(&self, _svg: &str, _options: &OptimizeOptions) -> Result<String, SvgError> {
            Err(SvgError::Optimize("boom".into()))
        }
    }

    struct BrokenOutputOptimizer;

    impl SvgOptimizer for BrokenOutputOptimizer {
        fn optimize(&self, _svg: &str, _options: &OptimizeOptions) -> Result<String, SvgError> {
            Ok("<svg><g></svg>".into())
        }
    }

    const LOGO: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><path class="theme-adaptive" d="M0 0h64v64H0z"/></svg>"#;

    #[test]
    fn injects_theme_when_missing() {
        let prepared = prepare_vector(
            LOGO,
            &ThemeColors::default(),
            &StructuralOptimizer,
            &OptimizeOptions::default(),
        )
        .unwrap();
        assert!(prepared.theme_injected);
        assert!(!prepared.theme_restored);
        assert!(prepared.optimize_error.is_none());
        assert!(has_theme_rule(&prepared.svg));
        assert!(prepared.svg.contains(r#"viewBox="0 0 64 64""#));
        assert!(!prepared.svg.contains("width="));
    }

    #[test]
    fn existing_theme_is_not_duplicated() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><style>@media (prefers-color-scheme: dark) { path { fill: #fff } }</style><path d="M0 0"/></svg>"#;
        let prepared = prepare_vector(
            svg,
            &ThemeColors::default(),
            &StructuralOptimizer,
            &OptimizeOptions::default(),
        )
        .unwrap();
        assert!(!prepared.theme_injected);
        assert_eq!(prepared.svg.matches("prefers-color-scheme").count(), 1);
    }

    #[test]
    fn restores_theme_removed_by_optimizer() {
        let prepared = prepare_vector(
            LOGO,
            &ThemeColors::default(),
            &StyleStrippingOptimizer,
            &OptimizeOptions::default(),
        )
        .unwrap();
        assert!(prepared.theme_restored);
        assert!(has_theme_rule(&prepared.svg));
        assert!(prepared.svg.contains(&theme_stylesheet(&ThemeColors::default())));
        check_well_formed(&prepared.svg).unwrap();
    }

    #[test]
    fn optimizer_failure_falls_back_to_patched_input() {
        let prepared = prepare_vector(
            LOGO,
            &ThemeColors::default(),
            &FailingOptimizer,
            &OptimizeOptions::default(),
        )
        .unwrap();
        assert_eq!(prepared.optimize_error.as_deref(), Some("Optimization failed: boom"));
        assert!(prepared.theme_injected);
        assert!(has_theme_rule(&prepared.svg));
        assert!(prepared.svg.contains(r#"width="64""#));
    }

    #[test]
    fn malformed_optimizer_output_is_rejected() {
        let prepared = prepare_vector(
            LOGO,
            &ThemeColors::default(),
            &BrokenOutputOptimizer,
            &OptimizeOptions::default(),
        )
        .unwrap();
        assert!(prepared.optimize_error.is_some());
        check_well_formed(&prepared.svg).unwrap();
    }

    #[test]
    fn source_without_svg_root_errors() {
        let result = prepare_vector(
            "<html/>",
            &ThemeColors::default(),
            &StructuralOptimizer,
            &OptimizeOptions::default(),
        );
        assert!(matches!(result, Err(SvgError::Xml(_))));
    }

    #[test]
    fn placeholder_written_without_source() {
        let tmp = TempDir::new().unwrap();
        let outcome = process_vector(
            None,
            tmp.path(),
            &SvgConfig::default(),
            &ThemeConfig::default(),
            &StructuralOptimizer,
        )
        .unwrap();

        assert_eq!(outcome.origin, VectorOrigin::Placeholder);
        let written = fs::read_to_string(tmp.path().join("icon.svg")).unwrap();
        assert!(written.contains("prefers-color-scheme: dark"));
        assert!(written.contains("prefers-color-scheme: light"));
        assert_eq!(outcome.final_size, written.len() as u64);
    }

    #[test]
    fn source_is_optimized_with_favicon_label() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("logo.svg");
        fs::write(&source, LOGO).unwrap();
        let out_dir = tmp.path().join("fav");
        fs::create_dir(&out_dir).unwrap();

        let outcome = process_vector(
            Some(&source),
            &out_dir,
            &SvgConfig::default(),
            &ThemeConfig::default(),
            &StructuralOptimizer,
        )
        .unwrap();

        assert_eq!(outcome.origin, VectorOrigin::Source(source.clone()));
        assert!(outcome.theme_injected);
        let written = fs::read_to_string(out_dir.join("icon.svg")).unwrap();
        assert!(written.contains(r#"aria-label="Site logo""#));
        assert!(has_theme_rule(&written));
        check_well_formed(&written).unwrap();
    }

    #[test]
    fn missing_source_file_errors() {
        let tmp = TempDir::new().unwrap();
        let result = process_vector(
            Some(&tmp.path().join("gone.svg")),
            tmp.path(),
            &SvgConfig::default(),
            &ThemeConfig::default(),
            &StructuralOptimizer,
        );
        assert!(matches!(result, Err(SvgError::Io(_))));
    }
}
