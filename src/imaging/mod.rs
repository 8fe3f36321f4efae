//! Raster processing: pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader` header decode |
//! | **Contain → PNG** | Lanczos3 resize onto a transparent square |
//! | **Maskable → PNG** | contain + overlay on an opaque canvas |
//! | **Legacy icon** | `ico` container around the 32 px PNG |
//! | **Encode** | `png` + `color_quant` per [`CompressionProfile`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Compression**: Pure tier/profile selection
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Encoder**: PNG writer driven by a profile
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod compression;
mod encoder;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, SourceInfo};
pub use calculations::{center_offset, fit_within, maskable_padding};
pub use compression::{CompressionProfile, StrategyTier, select_profile, select_tier};
pub use operations::{
    GeneratedIcon, create_legacy_icon, create_maskable_icon, generate_icon_sizes, plan_icon_sizes,
    plan_maskable,
};
pub use params::{ContainParams, IcoParams, MaskableParams, Quality, ReencodeParams};
pub use rust_backend::RustBackend;
