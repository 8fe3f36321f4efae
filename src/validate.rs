//! Post-run audit of the output directory.
//!
//! Read-only: a missing file marks the run unsuccessful but nothing is
//! retried or removed.

use crate::config::IconsmithConfig;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentFile {
    pub filename: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub present: Vec<PresentFile>,
    pub missing: Vec<String>,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Every file a complete run writes, in report order.
pub fn required_files(config: &IconsmithConfig) -> Vec<String> {
    let mut files = vec![config.icons.legacy_icon.clone()];
    files.extend(config.icons.sizes.iter().map(|s| s.filename.clone()));
    files.push(config.maskable.filename.clone());
    files.push(config.svg.filename.clone());
    files.push(config.manifest.filename.clone());
    files.push(config.manifest.snippet_filename.clone());
    files
}

/// Check each of `required` in `dir`. Only regular files count as present.
pub fn validate_outputs(dir: &Path, required: &[String]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for filename in required {
        match fs::metadata(dir.join(filename)) {
            Ok(meta) if meta.is_file() => report.present.push(PresentFile {
                filename: filename.clone(),
                size_bytes: meta.len(),
            }),
            _ => report.missing.push(filename.clone()),
        }
    }
    report
}
