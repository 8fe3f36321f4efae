//! Shared test fixtures.
//!
//! Images are generated on the fly with the `image` and `png` crates so tests
//! need no binary fixtures on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_png(&tmp.path().join("logo.png"), 800, 600);
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Opaque red, stored as RGBA.
pub const RED: [u8; 4] = [255, 0, 0, 255];

/// An SVG with everything the structural optimizer strips: an XML
/// declaration, comment, metadata, editor attributes, fixed dimensions and
/// an unreferenced id.
pub const SAMPLE_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- Created with a vector editor -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="64" height="64" inkscape:version="1.3">
  <metadata>
    <rdf>generator notes</rdf>
  </metadata>
  <g id="layer1" inkscape:label="Layer 1">
    <path class="theme-adaptive" d="M8 8h48v48H8z" fill="#000000"/>
  </g>
</svg>
"##;

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

/// Write a solid red RGBA PNG.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    RgbaImage::from_pixel(width, height, Rgba(RED))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a solid red RGB JPEG.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    RgbImage::from_pixel(width, height, Rgb([255, 0, 0]))
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Write a solid red RGBA PNG padded with a `tEXt` chunk of `text_len`
/// bytes, so a plain re-encode comes out much smaller.
pub fn write_png_with_text(path: &Path, width: u32, height: u32, text_len: usize) {
    ensure_parent(path);
    let file = BufWriter::new(File::create(path).unwrap());
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();

    let mut text = b"Comment\0".to_vec();
    text.extend(std::iter::repeat_n(b'x', text_len));
    writer.write_chunk(png::chunk::tEXt, &text).unwrap();

    let pixels: Vec<u8> = RED
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    writer.write_image_data(&pixels).unwrap();
    writer.finish().unwrap();
}
