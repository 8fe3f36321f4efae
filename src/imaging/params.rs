//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what files to create) and the [`backend`](super::backend)
//! (which does the pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: palette quantization quality (1–100, default 90). Clamped on construction.
//! - [`ContainParams`]: fit the source inside a transparent square.
//! - [`MaskableParams`]: fit the source into the safe zone of an opaque canvas.
//! - [`IcoParams`]: wrap an existing PNG in an ICO container.
//! - [`ReencodeParams`]: decode a PNG and write it back with a new profile.

use super::compression::CompressionProfile;
use std::path::PathBuf;

/// Quality setting for lossy palette reduction (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Fill colour for contain padding: white, fully transparent.
pub const TRANSPARENT_FILL: [u8; 4] = [255, 255, 255, 0];

/// Resize into a `size`×`size` transparent square, centred.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainParams {
    pub output: PathBuf,
    pub size: u32,
    pub profile: CompressionProfile,
}

/// Contain into `icon_size`, then place at `(padding, padding)` on an opaque
/// `canvas_size` square.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskableParams {
    pub output: PathBuf,
    pub icon_size: u32,
    pub canvas_size: u32,
    pub padding: u32,
    pub background: [u8; 4],
    pub profile: CompressionProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcoParams {
    /// PNG to embed.
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReencodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub profile: CompressionProfile,
}
