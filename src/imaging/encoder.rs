//! PNG encoding driven by a [`CompressionProfile`].
//!
//! | Profile field | Encoder setting |
//! |---|---|
//! | `compression_level` ≥ 7 | zlib best (3–6 default, else fast) |
//! | `effort` ≥ 8 | adaptive per-row filter, else Paeth |
//! | `palette` + `max_colours` | NeuQuant quantization to an indexed PNG |
//! | `quality` | NeuQuant sample factor |
//!
//! Output is always non-interlaced; `progressive` is only logged.

use super::backend::BackendError;
use super::compression::CompressionProfile;
use image::DynamicImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Encode `image` as PNG into `path`.
pub fn save_png(
    image: &DynamicImage,
    path: &Path,
    profile: &CompressionProfile,
) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_png(image, &mut writer, profile)?;
    writer.flush()?;
    Ok(())
}

/// Encode `image` as PNG into any writer.
pub fn encode_png<W: Write>(
    image: &DynamicImage,
    writer: W,
    profile: &CompressionProfile,
) -> Result<(), BackendError> {
    if profile.progressive {
        debug!("progressive requested; PNG output is written non-interlaced");
    }

    let (width, height) = (image.width(), image.height());
    let has_alpha = image.color().has_alpha();

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(compression_for(profile.compression_level));

    let data = if profile.palette && !has_alpha {
        let (palette, indices) = quantize(image, profile);
        debug!(
            colours = palette.len() / 3,
            tier = %profile.tier,
            "writing indexed PNG"
        );
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_palette(palette);
        encoder.set_filter(png::FilterType::NoFilter);
        indices
    } else if has_alpha {
        encoder.set_color(png::ColorType::Rgba);
        set_filters(&mut encoder, profile.effort);
        image.to_rgba8().into_raw()
    } else {
        encoder.set_color(png::ColorType::Rgb);
        set_filters(&mut encoder, profile.effort);
        image.to_rgb8().into_raw()
    };

    let mut png_writer = encoder.write_header().map_err(encode_err)?;
    png_writer.write_image_data(&data).map_err(encode_err)?;
    png_writer.finish().map_err(encode_err)
}

fn compression_for(level: u8) -> png::Compression {
    match level {
        7.. => png::Compression::Best,
        3..=6 => png::Compression::Default,
        _ => png::Compression::Fast,
    }
}

fn set_filters<W: Write>(encoder: &mut png::Encoder<'_, W>, effort: u8) {
    if effort >= 8 {
        encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
    } else {
        encoder.set_filter(png::FilterType::Paeth);
    }
}

/// NeuQuant sample factor: 1 is slowest/best, 30 fastest.
fn sample_factor(quality: u32) -> i32 {
    (((100 - quality.min(100)) / 3 + 1) as i32).clamp(1, 30)
}

/// Returns `(rgb palette, one index per pixel)`.
fn quantize(image: &DynamicImage, profile: &CompressionProfile) -> (Vec<u8>, Vec<u8>) {
    let rgba = image.to_rgba8();
    let colours = usize::from(profile.max_colours).clamp(2, 256);
    let quant = color_quant::NeuQuant::new(
        sample_factor(profile.quality.value()),
        colours,
        rgba.as_raw(),
    );
    let indices = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|px| quant.index_of(px) as u8)
        .collect();
    (quant.color_map_rgb(), indices)
}

fn encode_err(e: png::EncodingError) -> BackendError {
    BackendError::Encode(e.to_string())
}
