//! Pipeline configuration.
//!
//! Handles loading, validating, and merging `iconsmith.toml`. Stock defaults
//! reproduce the portfolio layout (`src/assets` → `static/fav`); a user file
//! only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! [paths]
//! source_dir = "src/assets"   # where logo.png / logo.svg live
//! output_dir = "static/fav"   # where the favicon set is written
//! static_dir = "static"       # input of `optimize-svg`
//! publish_dir = "docs"        # output of `optimize-svg`
//!
//! [source]
//! keywords = ["logo", "icon", "favicon"]
//! raster_extensions = ["png", "jpg", "jpeg"]
//! vector_extensions = ["svg"]
//!
//! [icons]
//! legacy_icon = "favicon.ico"
//! legacy_source = "favicon-32x32.png"
//!
//! [[icons.sizes]]
//! filename = "favicon-32x32.png"
//! size = 32
//!
//! [maskable]
//! filename = "icon-mask.png"
//! icon_size = 340
//! canvas_size = 512
//! background = "#ffffff"
//!
//! [theme]
//! dark = "#ffffff"
//! light = "#3c2252"
//! placeholder_letter = "K"
//!
//! [manifest]
//! name = "Portfolio"
//! icon_prefix = "/fav/"
//!
//! [svg]
//! filename = "icon.svg"
//! aria_label = "Site logo"
//! current_color = true
//!
//! [processing]
//! max_processes = 4
//! progressive = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{IconSpec, default_icon_specs, is_bare_filename};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest image an ICO directory entry can hold.
const MAX_ICO_SIZE: u32 = 256;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "iconsmith.toml";

/// Environment variable that turns on progressive PNG encoding.
pub const PROGRESSIVE_ENV: &str = "PNG_PROGRESSIVE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsmithConfig {
    pub paths: PathsConfig,
    /// Source file discovery predicate.
    pub source: SourceConfig,
    /// Raster sizes and the legacy icon.
    pub icons: IconsConfig,
    /// Maskable icon geometry.
    pub maskable: MaskableConfig,
    /// Light/dark colours for the SVG theme stylesheet.
    pub theme: ThemeConfig,
    /// PWA manifest and HTML snippet.
    pub manifest: ManifestConfig,
    /// Vector output and optimizer settings.
    pub svg: SvgConfig,
    /// Parallelism and encoder toggles.
    pub processing: ProcessingConfig,
}

impl IconsmithConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.keywords.is_empty() {
            return Err(ConfigError::Validation(
                "source.keywords must not be empty".into(),
            ));
        }
        if self.icons.sizes.is_empty() {
            return Err(ConfigError::Validation(
                "icons.sizes must not be empty".into(),
            ));
        }
        for spec in &self.icons.sizes {
            spec.validate().map_err(ConfigError::Validation)?;
        }
        for size in [192, 512] {
            if self.icons.spec_for_size(size).is_none() {
                return Err(ConfigError::Validation(format!(
                    "icons.sizes must include a {size}px icon for the manifest"
                )));
            }
        }
        match self
            .icons
            .sizes
            .iter()
            .find(|s| s.filename == self.icons.legacy_source)
        {
            None => {
                return Err(ConfigError::Validation(format!(
                    "icons.legacy_source '{}' is not one of icons.sizes",
                    self.icons.legacy_source
                )));
            }
            Some(spec) if spec.size > MAX_ICO_SIZE => {
                return Err(ConfigError::Validation(format!(
                    "icons.legacy_source '{}' is {}px; ICO entries are at most {MAX_ICO_SIZE}px",
                    spec.filename, spec.size
                )));
            }
            Some(_) => {}
        }
        for name in [
            &self.icons.legacy_icon,
            &self.maskable.filename,
            &self.svg.filename,
            &self.manifest.filename,
            &self.manifest.snippet_filename,
        ] {
            if !is_bare_filename(name) {
                return Err(ConfigError::Validation(format!(
                    "output name '{name}' must be a plain file name"
                )));
            }
        }
        self.maskable.validate()?;
        if !self.manifest.icon_prefix.starts_with('/') || !self.manifest.icon_prefix.ends_with('/')
        {
            return Err(ConfigError::Validation(
                "manifest.icon_prefix must start and end with '/'".into(),
            ));
        }
        if self.theme.dark.is_empty() || self.theme.light.is_empty() {
            return Err(ConfigError::Validation(
                "theme colours must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub source_dir: String,
    pub output_dir: String,
    /// Input directory for the batch SVG optimizer.
    pub static_dir: String,
    /// Output directory for the batch SVG optimizer.
    pub publish_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: "src/assets".to_string(),
            output_dir: "static/fav".to_string(),
            static_dir: "static".to_string(),
            publish_dir: "docs".to_string(),
        }
    }
}

/// Filename predicate for source discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// A candidate must contain one of these (case-insensitive).
    pub keywords: Vec<String>,
    pub raster_extensions: Vec<String>,
    pub vector_extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["logo".into(), "icon".into(), "favicon".into()],
            raster_extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
            vector_extensions: vec!["svg".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// Square PNG outputs, in generation order.
    pub sizes: Vec<IconSpec>,
    /// Legacy icon written next to the PNGs.
    pub legacy_icon: String,
    /// Which generated PNG the legacy icon wraps.
    pub legacy_source: String,
}

impl IconsConfig {
    pub fn spec_for_size(&self, size: u32) -> Option<&IconSpec> {
        self.sizes.iter().find(|s| s.size == size)
    }
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            sizes: default_icon_specs(),
            legacy_icon: "favicon.ico".to_string(),
            legacy_source: "favicon-32x32.png".to_string(),
        }
    }
}

/// Maskable icon geometry: the icon is contained in an `icon_size` square and
/// centred on an opaque `canvas_size` square.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskableConfig {
    pub filename: String,
    pub icon_size: u32,
    pub canvas_size: u32,
    /// Opaque canvas colour as `#rgb` or `#rrggbb`.
    pub background: String,
}

impl MaskableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.icon_size == 0 || self.canvas_size == 0 {
            return Err(ConfigError::Validation(
                "maskable sizes must be non-zero".into(),
            ));
        }
        if self.icon_size > self.canvas_size {
            return Err(ConfigError::Validation(format!(
                "maskable.icon_size ({}) exceeds maskable.canvas_size ({})",
                self.icon_size, self.canvas_size
            )));
        }
        if (self.canvas_size - self.icon_size) % 2 != 0 {
            return Err(ConfigError::Validation(
                "maskable.canvas_size - maskable.icon_size must be even".into(),
            ));
        }
        if parse_hex_color(&self.background).is_none() {
            return Err(ConfigError::Validation(format!(
                "maskable.background '{}' is not a hex colour",
                self.background
            )));
        }
        Ok(())
    }

    /// Opaque RGBA background.
    pub fn background_rgba(&self) -> [u8; 4] {
        let [r, g, b] = parse_hex_color(&self.background).unwrap_or([255, 255, 255]);
        [r, g, b, 255]
    }
}

impl Default for MaskableConfig {
    fn default() -> Self {
        Self {
            filename: "icon-mask.png".to_string(),
            icon_size: 340,
            canvas_size: 512,
            background: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Fill/stroke under `prefers-color-scheme: dark`.
    pub dark: String,
    /// Fill/stroke under `prefers-color-scheme: light`.
    pub light: String,
    /// Letter drawn in the placeholder badge.
    pub placeholder_letter: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark: "#ffffff".to_string(),
            light: "#3c2252".to_string(),
            placeholder_letter: "K".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub filename: String,
    pub snippet_filename: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub background_color: String,
    pub theme_color: String,
    /// Root-relative prefix for every icon `src` and snippet link.
    pub icon_prefix: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            filename: "site.webmanifest".to_string(),
            snippet_filename: "favicon-html.txt".to_string(),
            name: "Portfolio".to_string(),
            short_name: "Portfolio".to_string(),
            description: "Personal portfolio".to_string(),
            start_url: "/".to_string(),
            background_color: "#3c2252".to_string(),
            theme_color: "#3c2252".to_string(),
            icon_prefix: "/fav/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvgConfig {
    pub filename: String,
    /// Added to the root element when it has none. An empty string turns
    /// it off.
    pub aria_label: Option<String>,
    /// Rewrite concrete fill/stroke colours to `currentColor`.
    pub current_color: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            filename: "icon.svg".to_string(),
            aria_label: Some("Site logo".to_string()),
            current_color: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
    /// Progressive PNG encoding. `PNG_PROGRESSIVE=true` also enables it.
    pub progressive: bool,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Progressive encoding is on if config asks for it or `PNG_PROGRESSIVE=true`.
pub fn progressive_enabled(config: &ProcessingConfig) -> bool {
    config.progressive || env_flag(std::env::var(PROGRESSIVE_ENV).ok().as_deref())
}

fn env_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Parse `#rgb` or `#rrggbb` into RGB bytes.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(IconsmithConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<IconsmithConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IconsmithConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, on top of stock defaults.
pub fn load_config(path: &Path) -> Result<IconsmithConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `iconsmith.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# iconsmith configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directories (relative to the working directory)
# ---------------------------------------------------------------------------
[paths]
source_dir = "src/assets"
output_dir = "static/fav"
# Batch SVG optimizer: every *.svg in static_dir is optimized into publish_dir.
static_dir = "static"
publish_dir = "docs"

# ---------------------------------------------------------------------------
# Source discovery
# ---------------------------------------------------------------------------
# The first file (in name order) whose lowercase name ends in one of the
# extensions and contains one of the keywords is used.
[source]
keywords = ["logo", "icon", "favicon"]
raster_extensions = ["png", "jpg", "jpeg"]
vector_extensions = ["svg"]

# ---------------------------------------------------------------------------
# Raster icons
# ---------------------------------------------------------------------------
[icons]
# favicon.ico is a real ICO container wrapping this PNG.
legacy_icon = "favicon.ico"
legacy_source = "favicon-32x32.png"

[[icons.sizes]]
filename = "favicon-32x32.png"
size = 32

[[icons.sizes]]
filename = "apple-touch-icon.png"
size = 180

[[icons.sizes]]
filename = "icon-192.png"
size = 192

[[icons.sizes]]
filename = "icon-512.png"
size = 512

# ---------------------------------------------------------------------------
# Maskable icon (Android adaptive icon safe zone)
# ---------------------------------------------------------------------------
[maskable]
filename = "icon-mask.png"
# canvas_size - icon_size must be even so the padding is symmetric.
icon_size = 340
canvas_size = 512
background = "#ffffff"

# ---------------------------------------------------------------------------
# SVG theme colours (prefers-color-scheme)
# ---------------------------------------------------------------------------
[theme]
dark = "#ffffff"
light = "#3c2252"
placeholder_letter = "K"

# ---------------------------------------------------------------------------
# PWA manifest and HTML snippet
# ---------------------------------------------------------------------------
[manifest]
filename = "site.webmanifest"
snippet_filename = "favicon-html.txt"
name = "Portfolio"
short_name = "Portfolio"
description = "Personal portfolio"
start_url = "/"
background_color = "#3c2252"
theme_color = "#3c2252"
# Root-relative serving path of the output directory.
icon_prefix = "/fav/"

# ---------------------------------------------------------------------------
# SVG output
# ---------------------------------------------------------------------------
[svg]
filename = "icon.svg"
# Accessible name added to the root <svg> when it has none. "" disables it.
aria_label = "Site logo"
current_color = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Omit to auto-detect (= number of CPU cores).
# max_processes = 4
# PNG_PROGRESSIVE=true in the environment also enables this.
progressive = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        IconsmithConfig::default().validate().unwrap();
    }

    #[test]
    fn default_paths() {
        let config = IconsmithConfig::default();
        assert_eq!(config.paths.source_dir, "src/assets");
        assert_eq!(config.paths.output_dir, "static/fav");
    }

    #[test]
    fn stock_toml_matches_defaults() {
        let parsed: IconsmithConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = IconsmithConfig::default();
        assert_eq!(parsed.icons.sizes, defaults.icons.sizes);
        assert_eq!(parsed.maskable.icon_size, defaults.maskable.icon_size);
        assert_eq!(parsed.manifest.icon_prefix, defaults.manifest.icon_prefix);
        assert_eq!(parsed.svg.aria_label, defaults.svg.aria_label);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[maskable]
background = "#3c2252"
"##;
        let config: IconsmithConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.maskable.background, "#3c2252");
        assert_eq!(config.maskable.icon_size, 340);
        assert_eq!(config.icons.sizes.len(), 4);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<IconsmithConfig, _> = toml::from_str("[maskable]\npadding = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn maskable_rejects_odd_margin() {
        let config = MaskableConfig {
            icon_size: 341,
            ..MaskableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn maskable_rejects_icon_larger_than_canvas() {
        let config = MaskableConfig {
            icon_size: 600,
            ..MaskableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn icons_must_include_manifest_sizes() {
        let mut config = IconsmithConfig::default();
        config.icons.sizes.retain(|s| s.size != 192);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("192")
        ));
    }

    #[test]
    fn legacy_source_must_be_generated() {
        let mut config = IconsmithConfig::default();
        config.icons.legacy_source = "favicon-16x16.png".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn legacy_source_must_fit_an_ico_entry() {
        let mut config = IconsmithConfig::default();
        config.icons.legacy_source = "icon-512.png".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("256")
        ));
    }

    #[test]
    fn empty_aria_label_disables_it() {
        let user: toml::Value = toml::from_str("[svg]\naria_label = \"\"").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(user)).unwrap();
        assert_eq!(config.svg.aria_label.as_deref(), Some(""));
        assert_eq!(
            crate::svg::OptimizeOptions::favicon(&config.svg).aria_label,
            None
        );
    }

    #[test]
    fn icon_prefix_must_be_rooted() {
        let mut config = IconsmithConfig::default();
        config.manifest.icon_prefix = "assets/".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ffffff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("#3c2252"), Some([0x3c, 0x22, 0x52]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("ffffff"), None);
        assert_eq!(parse_hex_color("#ggg"), None);
        assert_eq!(parse_hex_color("#ffff"), None);
    }

    #[test]
    fn maskable_background_is_opaque() {
        let config = MaskableConfig {
            background: "#3c2252".into(),
            ..MaskableConfig::default()
        };
        assert_eq!(config.background_rgba(), [0x3c, 0x22, 0x52, 255]);
    }

    #[test]
    fn env_flag_only_accepts_true() {
        assert!(env_flag(Some("true")));
        assert!(!env_flag(Some("1")));
        assert!(!env_flag(Some("false")));
        assert!(!env_flag(None));
    }

    #[test]
    fn effective_threads_clamps() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(10_000),
            progressive: false,
        };
        assert_eq!(effective_threads(&config), cores);
        let config = ProcessingConfig {
            max_processes: Some(0),
            progressive: false,
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn merge_toml_overlays_tables() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config.manifest.theme_color, "#3c2252");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r##"
[manifest]
name = "Jane Doe"
icon_prefix = "/assets/"

[source]
keywords = ["logo"]
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.manifest.name, "Jane Doe");
        assert_eq!(config.manifest.icon_prefix, "/assets/");
        assert_eq!(config.source.keywords, vec!["logo".to_string()]);
        assert_eq!(config.manifest.short_name, "Portfolio");
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[maskable]\nicon_size = 511\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[manifest\nname = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }
}
