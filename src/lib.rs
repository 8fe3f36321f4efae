//! # iconsmith
//!
//! Favicon and web-icon asset pipeline for a static portfolio site.
//! Drop a `logo.png` and/or `logo.svg` into the assets directory and one
//! command derives the whole favicon set.
//!
//! # Architecture: Two Branches, One Audit
//!
//! ```text
//! src/assets/logo.png ─┬─ raster: 32/180/192/512 px PNGs, maskable PNG, favicon.ico
//! src/assets/logo.svg ─┴─ vector: theme-aware optimized icon.svg
//!                          ↓
//!                     site.webmanifest + favicon-html.txt
//!                          ↓
//!                     validation of the nine required files
//! ```
//!
//! The raster and vector branches share nothing and run concurrently. A
//! failure in one still lets the other finish; the validation pass reports
//! what is missing instead of the run silently succeeding.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Picks at most one raster and one vector logo from the assets directory |
//! | [`imaging`] | Compression selection, contain/maskable rendering, PNG and ICO encoding |
//! | [`svg`] | Theme stylesheet handling, placeholder badge, structural SVG optimizer |
//! | [`manifest`] | PWA manifest, HTML head snippet, deployment path patching |
//! | [`validate`] | Post-run check that every required output exists |
//! | [`pipeline`] | Orchestrates one build and reports progress events |
//! | [`optimize`] | Batch PNG re-encoding and batch SVG optimization |
//! | [`config`] | `iconsmith.toml` loading, merging and validation |
//! | [`types`] | Shared types: sources and icon specs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Decode Once
//!
//! The raster source is decoded a single time and shared read-only across
//! every size, which rayon encodes in parallel. Each size writes its own file,
//! so there is nothing to lock.
//!
//! ## Pure-Rust Imaging
//!
//! Resizing uses the `image` crate, PNG output the `png` crate (with
//! `color_quant` for indexed output) and the legacy icon is a real ICO
//! container from the `ico` crate. No system tools are needed.
//!
//! ## Markup-Aware SVG Edits
//!
//! The theme stylesheet is found and injected with an XML tokenizer, not
//! string search, so quoted `>` characters and comments cannot derail it.

pub mod config;
pub mod imaging;
pub mod manifest;
pub mod optimize;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod svg;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
