//! High-level raster operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.
//! The `plan_*` functions are pure and return the params without touching
//! the filesystem.

use super::backend::{BackendError, ImageBackend, SourceInfo};
use super::calculations::maskable_padding;
use super::compression::{CompressionProfile, select_profile, select_tier};
use super::params::{ContainParams, IcoParams, MaskableParams};
use crate::config::{IconsConfig, MaskableConfig};
use crate::types::IconSpec;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A raster file written by this module.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedIcon {
    pub filename: String,
    pub size: u32,
    pub profile: CompressionProfile,
}

/// Plan one contain operation per spec.
///
/// The tier comes from the source file size. Contain output always carries
/// alpha for its padding, so palette output is never planned here.
pub fn plan_icon_sizes(
    specs: &[IconSpec],
    output_dir: &Path,
    source: &SourceInfo,
    progressive: bool,
) -> Vec<ContainParams> {
    let tier = select_tier(source.file_size);
    specs
        .iter()
        .map(|spec| ContainParams {
            output: spec.output_path(output_dir),
            size: spec.size,
            profile: select_profile(tier, true, spec.size as u64 * spec.size as u64, progressive),
        })
        .collect()
}

/// Write every planned size. Sizes are encoded in parallel; each targets its
/// own file. Any failure fails the whole call.
pub fn generate_icon_sizes<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    plans: &[ContainParams],
) -> Result<Vec<GeneratedIcon>> {
    plans
        .par_iter()
        .map(|params| -> Result<GeneratedIcon> {
            backend.contain(image, params)?;
            debug!(output = %params.output.display(), size = params.size, "wrote icon");
            Ok(GeneratedIcon {
                filename: file_name(&params.output),
                size: params.size,
                profile: params.profile,
            })
        })
        .collect()
}

/// Plan the maskable icon. The canvas is opaque, so the profile is chosen
/// for an image without alpha.
pub fn plan_maskable(
    config: &MaskableConfig,
    output_dir: &Path,
    source: &SourceInfo,
    progressive: bool,
) -> MaskableParams {
    let canvas = config.canvas_size;
    MaskableParams {
        output: output_dir.join(&config.filename),
        icon_size: config.icon_size,
        canvas_size: canvas,
        padding: maskable_padding(canvas, config.icon_size),
        background: config.background_rgba(),
        profile: select_profile(
            select_tier(source.file_size),
            false,
            canvas as u64 * canvas as u64,
            progressive,
        ),
    }
}

pub fn create_maskable_icon<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    params: &MaskableParams,
) -> Result<GeneratedIcon> {
    backend.compose_maskable(image, params)?;
    Ok(GeneratedIcon {
        filename: file_name(&params.output),
        size: params.canvas_size,
        profile: params.profile,
    })
}

/// Wrap the already-written small PNG in an ICO container.
///
/// Returns `Ok(None)` when that PNG is absent; the validator reports the
/// missing legacy icon.
pub fn create_legacy_icon(
    backend: &impl ImageBackend,
    icons: &IconsConfig,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let source = output_dir.join(&icons.legacy_source);
    if !source.is_file() {
        warn!(source = %source.display(), "legacy icon source missing, skipping");
        return Ok(None);
    }
    let output = output_dir.join(&icons.legacy_icon);
    backend.write_ico(&IcoParams {
        source,
        output: output.clone(),
    })?;
    Ok(Some(output))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
