//! PNG compression strategy selection.
//!
//! The tier is picked from the *source* file size, then [`select_profile`]
//! turns tier, alpha and pixel count into encoder settings:
//!
//! | tier | quality | colours (alpha / opaque) | palette | effort |
//! |---|---|---|---|---|
//! | aggressive | 85 | 256 / 128 | if opaque | 10 |
//! | balanced | 90 | 256 / 256 | if opaque | 8 |
//! | conservative | 95 | 256 / 256 | if opaque and < 10 000 px | 6 |
//!
//! Palette output is never used for images with an alpha channel.

use super::params::Quality;
use std::fmt;

/// Source files at or above this size get the aggressive tier.
pub const AGGRESSIVE_THRESHOLD: u64 = 100 * 1024;
/// Source files at or above this size (and below aggressive) get balanced.
pub const BALANCED_THRESHOLD: u64 = 20 * 1024;
/// Conservative palette output only for images smaller than this.
pub const SMALL_IMAGE_PIXELS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyTier {
    Aggressive,
    Balanced,
    Conservative,
}

impl fmt::Display for StrategyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyTier::Aggressive => f.write_str("aggressive"),
            StrategyTier::Balanced => f.write_str("balanced"),
            StrategyTier::Conservative => f.write_str("conservative"),
        }
    }
}

/// Encoder settings for one PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionProfile {
    pub tier: StrategyTier,
    pub quality: Quality,
    /// zlib level, 0–9.
    pub compression_level: u8,
    pub palette: bool,
    pub max_colours: u16,
    /// Encoder effort, 0–10.
    pub effort: u8,
    pub progressive: bool,
}

pub fn select_tier(file_size: u64) -> StrategyTier {
    if file_size >= AGGRESSIVE_THRESHOLD {
        StrategyTier::Aggressive
    } else if file_size >= BALANCED_THRESHOLD {
        StrategyTier::Balanced
    } else {
        StrategyTier::Conservative
    }
}

pub fn select_profile(
    tier: StrategyTier,
    has_alpha: bool,
    pixel_count: u64,
    progressive: bool,
) -> CompressionProfile {
    let (quality, max_colours, palette, effort) = match tier {
        StrategyTier::Aggressive => (85, if has_alpha { 256 } else { 128 }, !has_alpha, 10),
        StrategyTier::Balanced => (90, 256, !has_alpha, 8),
        StrategyTier::Conservative => (
            95,
            256,
            !has_alpha && pixel_count < SMALL_IMAGE_PIXELS,
            6,
        ),
    };

    CompressionProfile {
        tier,
        quality: Quality::new(quality),
        compression_level: 9,
        palette,
        max_colours,
        effort,
        progressive,
    }
}
