//! Source discovery.
//!
//! Stage 1 of the build. Lists the immediate files of the source assets
//! directory and picks at most one raster and one vector logo by file name:
//!
//! ```text
//! src/assets/
//! ├── about.jpg          # ignored: no keyword
//! ├── brand-logo.svg     # vector source (first in name order)
//! ├── logo.png           # raster source
//! └── logo.svg           # ignored: a vector source is already chosen
//! ```
//!
//! A name qualifies when, lowercased, it ends in one of the configured
//! extensions and contains one of the keywords. Candidates are sorted by file
//! name before the first match is taken, so the choice does not depend on
//! directory listing order.

use crate::config::SourceConfig;
use crate::types::{SourceAsset, SourceSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filename predicate: keyword substring plus extension suffix, case-insensitive.
#[derive(Debug, Clone)]
pub struct SourcePredicate {
    keywords: Vec<String>,
    raster_extensions: Vec<String>,
    vector_extensions: Vec<String>,
}

impl SourcePredicate {
    pub fn from_config(config: &SourceConfig) -> Self {
        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();
        Self {
            keywords: lower(&config.keywords),
            raster_extensions: lower(&config.raster_extensions),
            vector_extensions: lower(&config.vector_extensions),
        }
    }

    fn has_keyword(&self, name: &str) -> bool {
        self.keywords.iter().any(|k| name.contains(k.as_str()))
    }

    fn has_extension(name: &str, extensions: &[String]) -> bool {
        extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{ext}")))
    }

    pub fn is_raster(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        Self::has_extension(&name, &self.raster_extensions) && self.has_keyword(&name)
    }

    pub fn is_vector(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        Self::has_extension(&name, &self.vector_extensions) && self.has_keyword(&name)
    }
}

impl Default for SourcePredicate {
    fn default() -> Self {
        Self::from_config(&SourceConfig::default())
    }
}

/// Resolve the raster and vector sources in `dir`.
///
/// A missing directory is an error; a directory with no qualifying files is
/// not, the caller decides what an empty [`SourceSet`] means.
pub fn resolve_sources(dir: &Path, predicate: &SourcePredicate) -> Result<SourceSet, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut set = SourceSet::default();
    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if set.raster.is_none() && predicate.is_raster(&name) {
            debug!(source = %path.display(), "selected raster source");
            set.raster = Some(SourceAsset::raster(path));
        } else if set.vector.is_none() && predicate.is_vector(&name) {
            debug!(source = %path.display(), "selected vector source");
            set.vector = Some(SourceAsset::vector(path));
        }
        if set.raster.is_some() && set.vector.is_some() {
            break;
        }
    }

    Ok(set)
}
