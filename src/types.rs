//! Shared types used across the pipeline stages.
//!
//! Everything here is single-run scoped: the resolver builds a [`SourceSet`]
//! from the filesystem, the raster and vector branches consume it, and
//! nothing is persisted between runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Discriminant for a source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Raster,
    Vector,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Raster => f.write_str("raster"),
            SourceKind::Vector => f.write_str("vector"),
        }
    }
}

/// A source file selected by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAsset {
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl SourceAsset {
    pub fn raster(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Raster,
            path: path.into(),
        }
    }

    pub fn vector(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Vector,
            path: path.into(),
        }
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// At most one raster and one vector source per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    pub raster: Option<SourceAsset>,
    pub vector: Option<SourceAsset>,
}

impl SourceSet {
    pub fn is_empty(&self) -> bool {
        self.raster.is_none() && self.vector.is_none()
    }
}

/// One square raster output: a bare file name and its edge length in pixels.
///
/// The file name is always resolved against the output directory, so it must
/// not contain path separators or parent references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconSpec {
    pub filename: String,
    pub size: u32,
}

impl IconSpec {
    pub fn new(filename: impl Into<String>, size: u32) -> Self {
        Self {
            filename: filename.into(),
            size,
        }
    }

    /// Check that the spec names a non-empty square inside the output directory.
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err(format!("icon '{}' has zero size", self.filename));
        }
        if !is_bare_filename(&self.filename) {
            return Err(format!(
                "icon filename '{}' must be a plain file name",
                self.filename
            ));
        }
        Ok(())
    }

    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.filename)
    }

    /// `WxH` string used in manifests and links.
    pub fn sizes_attr(&self) -> String {
        format!("{0}x{0}", self.size)
    }
}

/// The stock icon list, in generation order.
pub fn default_icon_specs() -> Vec<IconSpec> {
    vec![
        IconSpec::new("favicon-32x32.png", 32),
        IconSpec::new("apple-touch-icon.png", 180),
        IconSpec::new("icon-192.png", 192),
        IconSpec::new("icon-512.png", 512),
    ]
}

/// True if `name` is a single path component (no separators, not `.` or `..`).
pub fn is_bare_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_specs_are_square_and_ordered() {
        let sizes: Vec<u32> = default_icon_specs().iter().map(|s| s.size).collect();
        assert_eq!(sizes, vec![32, 180, 192, 512]);
    }

    #[test]
    fn spec_rejects_path_components() {
        assert!(IconSpec::new("../evil.png", 32).validate().is_err());
        assert!(IconSpec::new("sub/icon.png", 32).validate().is_err());
        assert!(IconSpec::new("sub\\icon.png", 32).validate().is_err());
        assert!(IconSpec::new("", 32).validate().is_err());
    }

    #[test]
    fn spec_rejects_zero_size() {
        assert!(IconSpec::new("icon.png", 0).validate().is_err());
    }

    #[test]
    fn spec_output_path_stays_in_dir() {
        let spec = IconSpec::new("icon-192.png", 192);
        assert_eq!(
            spec.output_path(Path::new("/out")),
            PathBuf::from("/out/icon-192.png")
        );
        assert_eq!(spec.sizes_attr(), "192x192");
    }

    #[test]
    fn empty_source_set() {
        assert!(SourceSet::default().is_empty());
        let set = SourceSet {
            raster: None,
            vector: Some(SourceAsset::vector("/a/logo.svg")),
        };
        assert!(!set.is_empty());
        assert_eq!(set.vector.unwrap().display_name(), "logo.svg");
    }
}
