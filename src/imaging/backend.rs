//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations the raster branch
//! needs: identify, decode, contain, compose_maskable, write_ico and
//! reencode. Decoding is separate from the transforms so a source is read
//! once and shared across every output size.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`,
//! `png` and `ico` crates.

use super::params::{ContainParams, IcoParams, MaskableParams, ReencodeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Header-level facts about a raster file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Lowercase format name, e.g. `png`, `jpeg`.
    pub format: String,
    pub file_size: u64,
}

impl SourceInfo {
    /// Two or four channels means an alpha channel is present.
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Trait for image processing backends.
///
/// `Image` is the decoded representation; it is shared read-only across
/// rayon workers, hence `Sync`.
pub trait ImageBackend: Sync {
    type Image: Sync;

    /// Read dimensions, channel count and format without a full decode.
    fn identify(&self, path: &Path) -> Result<SourceInfo, BackendError>;

    fn decode(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Write a transparent-padded square PNG.
    fn contain(&self, image: &Self::Image, params: &ContainParams) -> Result<(), BackendError>;

    /// Write an opaque maskable PNG with safe-zone padding.
    fn compose_maskable(
        &self,
        image: &Self::Image,
        params: &MaskableParams,
    ) -> Result<(), BackendError>;

    /// Wrap a PNG in an ICO container.
    fn write_ico(&self, params: &IcoParams) -> Result<(), BackendError>;

    /// Decode a PNG and encode it again with the given profile.
    fn reencode(&self, params: &ReencodeParams) -> Result<(), BackendError>;
}
