//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader` + `ImageDecoder::color_type` (header only) |
//! | Decode (PNG, JPEG) | `image` crate |
//! | Contain | `DynamicImage::resize_exact` with `Lanczos3` + `imageops::replace` |
//! | Maskable | contain + `imageops::overlay` onto an opaque canvas |
//! | Encode → PNG | `png` crate via [`encoder`](super::encoder) |
//! | ICO container | `ico` crate, PNG-compressed entry |

use super::backend::{BackendError, ImageBackend, SourceInfo};
use super::calculations::{center_offset, fit_within};
use super::encoder::save_png;
use super::params::{ContainParams, IcoParams, MaskableParams, ReencodeParams, TRANSPARENT_FILL};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageDecoder, ImageReader, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_err(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_err(path, e))
}

/// Fit `image` into a `size`×`size` transparent square, centred.
fn contain_square(image: &DynamicImage, size: u32) -> RgbaImage {
    let (w, h) = fit_within((image.width(), image.height()), size);
    let resized = image.resize_exact(w, h, FilterType::Lanczos3).to_rgba8();
    let (x, y) = center_offset((w, h), size);

    let mut canvas = RgbaImage::from_pixel(size, size, Rgba(TRANSPARENT_FILL));
    imageops::replace(&mut canvas, &resized, x as i64, y as i64);
    canvas
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn identify(&self, path: &Path) -> Result<SourceInfo, BackendError> {
        let file_size = fs::metadata(path)?.len();
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("unknown")
            .to_string();
        let decoder = reader.into_decoder().map_err(|e| decode_err(path, e))?;
        let (width, height) = decoder.dimensions();
        Ok(SourceInfo {
            width,
            height,
            channels: decoder.color_type().channel_count(),
            format,
            file_size,
        })
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn contain(&self, image: &DynamicImage, params: &ContainParams) -> Result<(), BackendError> {
        let canvas = contain_square(image, params.size);
        save_png(
            &DynamicImage::ImageRgba8(canvas),
            &params.output,
            &params.profile,
        )
    }

    fn compose_maskable(
        &self,
        image: &DynamicImage,
        params: &MaskableParams,
    ) -> Result<(), BackendError> {
        let icon = contain_square(image, params.icon_size);
        let mut canvas = RgbaImage::from_pixel(
            params.canvas_size,
            params.canvas_size,
            Rgba(params.background),
        );
        imageops::overlay(
            &mut canvas,
            &icon,
            params.padding as i64,
            params.padding as i64,
        );

        // Background is opaque, so the alpha channel carries no information.
        let flat = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8());
        save_png(&flat, &params.output, &params.profile)
    }

    fn write_ico(&self, params: &IcoParams) -> Result<(), BackendError> {
        let png = ico::IconImage::read_png(File::open(&params.source)?)?;
        let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
        icon_dir.add_entry(ico::IconDirEntry::encode_as_png(&png)?);

        let out = BufWriter::new(File::create(&params.output)?);
        icon_dir.write(out)?;
        Ok(())
    }

    fn reencode(&self, params: &ReencodeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_png(&img, &params.output, &params.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::compression::{StrategyTier, select_profile};
    use crate::test_helpers::{write_test_jpeg, write_test_png};
    use tempfile::TempDir;

    /// Lanczos resampling may shift a flat colour by a step or two.
    fn is_red<const N: usize>(px: [u8; N]) -> bool {
        px[0] >= 250 && px[1] <= 5 && px[2] <= 5 && (N == 3 || px[N - 1] >= 250)
    }

    fn alpha_profile() -> crate::imaging::compression::CompressionProfile {
        select_profile(StrategyTier::Conservative, true, 1, false)
    }

    #[test]
    fn identify_synthetic_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.png");
        write_test_png(&path, 200, 150);

        let info = RustBackend::new().identify(&path).unwrap();
        assert_eq!((info.width, info.height), (200, 150));
        assert_eq!(info.channels, 4);
        assert!(info.has_alpha());
        assert_eq!(info.format, "png");
        assert_eq!(info.file_size, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.jpg");
        write_test_jpeg(&path, 120, 80);

        let info = RustBackend::new().identify(&path).unwrap();
        assert_eq!((info.width, info.height), (120, 80));
        assert_eq!(info.channels, 3);
        assert!(!info.has_alpha());
        assert_eq!(info.format, "jpg");
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/logo.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_garbage_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn contain_is_exact_square_with_transparent_letterbox() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("logo.png");
        write_test_png(&source, 800, 600);
        let output = tmp.path().join("favicon-32x32.png");

        let backend = RustBackend::new();
        let img = backend.decode(&source).unwrap();
        backend
            .contain(
                &img,
                &ContainParams {
                    output: output.clone(),
                    size: 32,
                    profile: alpha_profile(),
                },
            )
            .unwrap();

        let out = image::open(&output).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (32, 32));
        // 800x600 → 32x24 at y=4: rows 0..4 are padding
        assert_eq!(out.get_pixel(16, 0)[3], 0);
        assert_eq!(out.get_pixel(16, 31)[3], 0);
        assert!(is_red(out.get_pixel(16, 16).0));
    }

    #[test]
    fn maskable_is_opaque_with_centred_icon() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("logo.png");
        write_test_png(&source, 400, 400);
        let output = tmp.path().join("icon-mask.png");

        let backend = RustBackend::new();
        let img = backend.decode(&source).unwrap();
        backend
            .compose_maskable(
                &img,
                &MaskableParams {
                    output: output.clone(),
                    icon_size: 340,
                    canvas_size: 512,
                    padding: 86,
                    background: [255, 255, 255, 255],
                    profile: select_profile(StrategyTier::Conservative, false, 512 * 512, false),
                },
            )
            .unwrap();

        let out = image::open(&output).unwrap();
        assert!(!out.color().has_alpha());
        let out = out.to_rgb8();
        assert_eq!(out.dimensions(), (512, 512));
        assert_eq!(out.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(85, 256), &image::Rgb([255, 255, 255]));
        assert!(is_red(out.get_pixel(256, 256).0));
        assert!(is_red(out.get_pixel(87, 256).0));
    }

    #[test]
    fn ico_wraps_png() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("favicon-32x32.png");
        write_test_png(&source, 32, 32);
        let output = tmp.path().join("favicon.ico");

        RustBackend::new()
            .write_ico(&IcoParams {
                source,
                output: output.clone(),
            })
            .unwrap();

        let dir = ico::IconDir::read(File::open(&output).unwrap()).unwrap();
        assert_eq!(dir.resource_type(), ico::ResourceType::Icon);
        assert_eq!(dir.entries().len(), 1);
        assert_eq!(dir.entries()[0].width(), 32);
        assert!(dir.entries()[0].is_png());
    }

    #[test]
    fn ico_missing_source_errors() {
        let tmp = TempDir::new().unwrap();
        let result = RustBackend::new().write_ico(&IcoParams {
            source: tmp.path().join("missing.png"),
            output: tmp.path().join("favicon.ico"),
        });
        assert!(result.is_err());
        assert!(!tmp.path().join("favicon.ico").exists());
    }

    #[test]
    fn reencode_preserves_pixels() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.png");
        write_test_png(&source, 64, 64);
        let output = tmp.path().join("b.png");

        RustBackend::new()
            .reencode(&ReencodeParams {
                source: source.clone(),
                output: output.clone(),
                profile: alpha_profile(),
            })
            .unwrap();

        let a = image::open(&source).unwrap().to_rgba8();
        let b = image::open(&output).unwrap().to_rgba8();
        assert_eq!(a, b);
    }
}
