//! Vector icon processing.
//!
//! - **Theme**: the `prefers-color-scheme` stylesheet, placeholder badge and
//!   markup-aware detection/injection of the theme `<style>` block
//! - **Optimizer**: [`SvgOptimizer`] trait + [`StructuralOptimizer`]
//! - **Vector**: the favicon SVG step that ties the two together

mod optimizer;
mod theme;
mod vector;

use thiserror::Error;

pub use optimizer::{OptimizeOptions, StructuralOptimizer, SvgOptimizer, check_well_formed};
pub use theme::{
    THEME_RULE_MARKER, ThemeColors, extract_theme_style, has_theme_rule, inject_after_root,
    placeholder_svg, theme_stylesheet,
};
pub use vector::{PreparedVector, VectorOrigin, VectorOutcome, prepare_vector, process_vector};

#[derive(Error, Debug)]
pub enum SvgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(String),
    #[error("Optimization failed: {0}")]
    Optimize(String),
}

pub(crate) fn xml_err(e: impl std::fmt::Display) -> SvgError {
    SvgError::Xml(e.to_string())
}
