//! PWA manifest and HTML head snippet.
//!
//! The manifest always lists exactly three icons: the 192 and 512 px PNGs
//! with purpose `any` and the maskable PNG. Every `src` is the configured
//! root-relative prefix plus the file name, and the snippet links use the
//! same prefix.
//!
//! ## Snippet
//!
//! ```html
//! <!-- Modern Favicon Setup -->
//! <link rel="icon" href="/fav/favicon.ico" sizes="32x32">
//! <link rel="icon" href="/fav/icon.svg" type="image/svg+xml">
//! <link rel="apple-touch-icon" href="/fav/apple-touch-icon.png">
//! <link rel="manifest" href="/fav/site.webmanifest">
//! <meta name="theme-color" content="#3c2252">
//! <meta name="apple-mobile-web-app-capable" content="yes">
//! <meta name="apple-mobile-web-app-status-bar-style" content="default">
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/) so substituted values are escaped.

use crate::config::IconsmithConfig;
use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub sizes: String,
    pub purpose: String,
}

impl ManifestIcon {
    fn png(src: String, size: u32, purpose: &str) -> Self {
        Self {
            src,
            mime_type: "image/png".to_string(),
            sizes: format!("{size}x{size}"),
            purpose: purpose.to_string(),
        }
    }
}

pub fn build_manifest(config: &IconsmithConfig) -> WebManifest {
    let m = &config.manifest;
    let src = |filename: &str| format!("{}{}", m.icon_prefix, filename);

    let mut icons: Vec<ManifestIcon> = [192, 512]
        .into_iter()
        .filter_map(|size| config.icons.spec_for_size(size))
        .map(|spec| ManifestIcon::png(src(&spec.filename), spec.size, "any"))
        .collect();
    icons.push(ManifestIcon::png(
        src(&config.maskable.filename),
        config.maskable.canvas_size,
        "maskable",
    ));

    WebManifest {
        name: m.name.clone(),
        short_name: m.short_name.clone(),
        description: m.description.clone(),
        start_url: m.start_url.clone(),
        display: "standalone".to_string(),
        background_color: m.background_color.clone(),
        theme_color: m.theme_color.clone(),
        icons,
    }
}

/// Write as two-space-indented JSON.
pub fn write_manifest(manifest: &WebManifest, path: &Path) -> Result<(), ManifestError> {
    fs::write(path, serde_json::to_string_pretty(manifest)?)?;
    Ok(())
}

/// The paste-ready `<head>` snippet, one tag per line.
pub fn render_snippet(config: &IconsmithConfig) -> String {
    let prefix = &config.manifest.icon_prefix;
    let href = |filename: &str| format!("{prefix}{filename}");

    let legacy_sizes = config
        .icons
        .sizes
        .iter()
        .find(|s| s.filename == config.icons.legacy_source)
        .map(|s| s.sizes_attr())
        .unwrap_or_else(|| "32x32".to_string());
    let touch_icon = config
        .icons
        .spec_for_size(180)
        .map(|s| s.filename.as_str())
        .unwrap_or("apple-touch-icon.png");

    let lines: Vec<Markup> = vec![
        PreEscaped("<!-- Modern Favicon Setup -->".to_string()),
        html! { link rel="icon" href=(href(&config.icons.legacy_icon)) sizes=(legacy_sizes); },
        html! { link rel="icon" href=(href(&config.svg.filename)) type="image/svg+xml"; },
        html! { link rel="apple-touch-icon" href=(href(touch_icon)); },
        html! { link rel="manifest" href=(href(&config.manifest.filename)); },
        html! { meta name="theme-color" content=(config.manifest.theme_color); },
        html! { meta name="apple-mobile-web-app-capable" content="yes"; },
        html! { meta name="apple-mobile-web-app-status-bar-style" content="default"; },
    ];

    lines
        .into_iter()
        .map(Markup::into_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_snippet(config: &IconsmithConfig, path: &Path) -> Result<(), ManifestError> {
    fs::write(path, render_snippet(config))?;
    Ok(())
}

// =============================================================================
// Deployment patching
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// No manifest at the given path.
    Missing,
    /// Number of icon `src` values that changed.
    Patched { rewritten: usize },
}

/// `prefix` + `src` without its leading slash, unless already prefixed.
pub fn rewrite_icon_src(src: &str, prefix: &str) -> String {
    if src.starts_with(prefix) {
        return src.to_string();
    }
    format!("{prefix}{}", src.strip_prefix('/').unwrap_or(src))
}

/// Rewrite every icon `src` in an existing manifest for a deployment prefix.
///
/// Idempotent; fields other than `icons[].src` are left untouched.
pub fn patch_manifest(path: &Path, prefix: &str) -> Result<PatchOutcome, ManifestError> {
    if !path.exists() {
        return Ok(PatchOutcome::Missing);
    }
    let mut manifest: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;

    let mut rewritten = 0;
    if let Some(icons) = manifest.get_mut("icons").and_then(|i| i.as_array_mut()) {
        for icon in icons {
            let Some(src) = icon.get("src").and_then(|s| s.as_str()) else {
                continue;
            };
            let patched = rewrite_icon_src(src, prefix);
            if patched != src {
                icon["src"] = serde_json::Value::String(patched);
                rewritten += 1;
            }
        }
    }

    if rewritten > 0 {
        fs::write(path, serde_json::to_string_pretty(&manifest)?)?;
    }
    Ok(PatchOutcome::Patched { rewritten })
}
