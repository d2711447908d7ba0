//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to the content file; stock defaults are the base
//! layer and the user file overrides any subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_file = "cv.json"  # Content file, relative to the content root
//! assets_dir = "public"     # Copied verbatim to the output root
//!
//! [site]
//! title = ""                # <title>; empty = general.displayName
//! description = ""          # <meta name="description">
//!
//! [theme]
//! font_family = "\"Inter Variable\", \"Atkinson Hyperlegible\", system-ui, sans-serif"
//! gap = "1rem"              # Gap between cards, rows, and media
//!
//! [theme.page_padding]
//! size = "4vw"
//! min = "1rem"
//! max = "3rem"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"    # Years, counters, nav
//! border = "#e0e0e0"
//! link = "#333333"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//! link_hover = "#ffffff"
//!
//! [animation]
//! stagger_ms = 100          # Delay between consecutive fade-ins
//! settle_ms = 500           # Extra wait before index rows drop their offset
//! fade_ms = 500             # Fade-in duration
//!
//! [swipe]
//! delta = 10                # Minimum travel (px) for a swipe
//! track_mouse = true
//! track_touch = true
//!
//! [loading]
//! eager_covers = 6          # Overview covers loaded eagerly
//! high_priority = 3         # Covers/gallery media with fetchpriority=high
//! eager_index_images = 3    # Index media loaded eagerly per row
//!
//! [compress]
//! media_dir = "public/content/media"
//! backup_dir = "image-backups"
//! level = "best"            # fast | default | best
//! adaptive_filter = true
//!
//! [headers]
//! media_path = "/content/media/*"
//! cache_control = "public, max-age=31536000, immutable"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::CompressionLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content file, relative to the content root.
    pub content_file: String,
    /// Directory (relative to the content root) copied to the output root.
    pub assets_dir: String,
    /// Document metadata.
    pub site: SiteMeta,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Layout settings.
    pub theme: ThemeConfig,
    /// Entrance animation timing.
    pub animation: AnimationConfig,
    /// Swipe recognition.
    pub swipe: SwipeConfig,
    /// Loading hints for media.
    pub loading: LoadingConfig,
    /// Batch PNG recompression.
    pub compress: CompressConfig,
    /// Static-host response headers.
    pub headers: HeadersConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_file: "cv.json".to_string(),
            assets_dir: "public".to_string(),
            site: SiteMeta::default(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
            animation: AnimationConfig::default(),
            swipe: SwipeConfig::default(),
            loading: LoadingConfig::default(),
            compress: CompressConfig::default(),
            headers: HeadersConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content_file must not be empty".into(),
            ));
        }
        if self.swipe.delta == 0 {
            return Err(ConfigError::Validation(
                "swipe.delta must be at least 1".into(),
            ));
        }
        if self.animation.fade_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.fade_ms must be non-zero".into(),
            ));
        }
        if self.compress.media_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "compress.media_dir must not be empty".into(),
            ));
        }
        if self.compress.media_dir == self.compress.backup_dir {
            return Err(ConfigError::Validation(
                "compress.backup_dir must differ from compress.media_dir".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Page title: the configured one, or the owner's display name.
    pub fn page_title<'a>(&'a self, display_name: &'a str) -> &'a str {
        if self.site.title.is_empty() {
            display_name
        } else {
            &self.site.title
        }
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compression workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Entrance animation timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Delay between consecutive items fading in.
    pub stagger_ms: u64,
    /// Extra wait after the last index row before rows drop their offset.
    pub settle_ms: u64,
    /// Fade-in duration.
    pub fade_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            stagger_ms: 100,
            settle_ms: 500,
            fade_ms: 500,
        }
    }
}

/// Swipe recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwipeConfig {
    /// Minimum travel in pixels along the dominant axis.
    pub delta: u32,
    /// Recognize mouse drags as swipes.
    pub track_mouse: bool,
    /// Recognize touch drags as swipes.
    pub track_touch: bool,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            delta: 10,
            track_mouse: true,
            track_touch: true,
        }
    }
}

/// Loading hints for `<img>` elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    /// Overview covers before this position load eagerly.
    pub eager_covers: usize,
    /// Covers and gallery media before this position get `fetchpriority=high`.
    pub high_priority: usize,
    /// Index media before this position load eagerly.
    pub eager_index_images: usize,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            eager_covers: 6,
            high_priority: 3,
            eager_index_images: 3,
        }
    }
}

/// Batch PNG recompression settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressConfig {
    /// Directory (relative to the content root) whose PNGs are recompressed.
    pub media_dir: String,
    /// Where originals are backed up before being replaced.
    pub backup_dir: String,
    /// zlib effort.
    pub level: CompressionLevel,
    /// Pick the PNG row filter per scanline.
    pub adaptive_filter: bool,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            media_dir: "public/content/media".to_string(),
            backup_dir: "image-backups".to_string(),
            level: CompressionLevel::Best,
            adaptive_filter: true,
        }
    }
}

/// Static-host header rules written to `_headers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadersConfig {
    /// URL pattern the cache header applies to.
    pub media_path: String,
    /// `Cache-Control` value for media.
    pub cache_control: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            media_path: "/content/media/*".to_string(),
            cache_control: "public, max-age=31536000, immutable".to_string(),
        }
    }
}

/// A responsive CSS size expressed as `clamp(min, size, max)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    /// Preferred/fluid value, typically viewport-relative (e.g. `"4vw"`).
    pub size: String,
    /// Minimum bound (e.g. `"1rem"`).
    pub min: String,
    /// Maximum bound (e.g. `"3rem"`).
    pub max: String,
}

impl ClampSize {
    /// Render as a CSS `clamp()` expression.
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

/// Theme/layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// CSS `font-family` stack.
    pub font_family: String,
    /// Gap between overview cards, index rows, and gallery media.
    pub gap: String,
    /// Padding around the page.
    pub page_padding: ClampSize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            font_family: "\"Inter Variable\", \"Atkinson Hyperlegible\", system-ui, sans-serif"
                .to_string(),
            gap: "1rem".to_string(),
            page_padding: ClampSize {
                size: "4vw".to_string(),
                min: "1rem".to_string(),
                max: "3rem".to_string(),
            },
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Muted/secondary text color (years, counters, inactive nav).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the content root, next to the content file.
# Unknown keys will cause an error.

# Content file (projects, experience, contact), relative to the content root.
content_file = "cv.json"

# Directory copied verbatim to the output root. Attachment URLs such as
# /content/media/cover.png resolve against it.
assets_dir = "public"

# ---------------------------------------------------------------------------
# Document metadata
# ---------------------------------------------------------------------------
[site]
# Page <title>. Empty uses general.displayName from the content file.
title = ""
# <meta name="description">.
description = ""

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
font_family = "\"Inter Variable\", \"Atkinson Hyperlegible\", system-ui, sans-serif"

# Gap between overview cards, index rows, and gallery media (CSS value).
gap = "1rem"

# Padding around the page, as CSS clamp(min, size, max).
[theme.page_padding]
size = "4vw"
min = "1rem"
max = "3rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Years, counters, inactive nav
border = "#e0e0e0"
link = "#333333"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# Entrance animations (milliseconds)
# ---------------------------------------------------------------------------
[animation]
# Delay between consecutive items fading in.
stagger_ms = 100
# Extra wait after the last index row before rows drop their offset.
settle_ms = 500
# Fade-in duration.
fade_ms = 500

# ---------------------------------------------------------------------------
# Swipe navigation
# ---------------------------------------------------------------------------
[swipe]
# Minimum travel in pixels before a drag counts as a swipe.
delta = 10
track_mouse = true
track_touch = true

# ---------------------------------------------------------------------------
# Loading hints
# ---------------------------------------------------------------------------
[loading]
# Overview covers before this position load eagerly, the rest lazily.
eager_covers = 6
# Covers and gallery media before this position get fetchpriority="high".
high_priority = 3
# Index media before this position load eagerly, the rest lazily.
eager_index_images = 3

# ---------------------------------------------------------------------------
# PNG recompression (`folio compress`)
# ---------------------------------------------------------------------------
[compress]
media_dir = "public/content/media"
# Originals are copied here once, before the first recompression.
backup_dir = "image-backups"
# zlib effort: "fast", "default", or "best".
level = "best"
# Choose the PNG row filter per scanline.
adaptive_filter = true

# ---------------------------------------------------------------------------
# Response headers for static hosts (written to _headers)
# ---------------------------------------------------------------------------
[headers]
media_path = "/content/media/*"
cache_control = "public, max-age=31536000, immutable"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel compression workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}

/// Generate CSS custom properties from theme and animation config.
pub fn generate_theme_css(theme: &ThemeConfig, animation: &AnimationConfig) -> String {
    format!(
        r#":root {{
    --font-family: {font_family};
    --gap: {gap};
    --page-padding: {page_padding};
    --fade-duration: {fade_ms}ms;
}}"#,
        font_family = theme.font_family,
        gap = theme.gap,
        page_padding = theme.page_padding.to_css(),
        fade_ms = animation.fade_ms,
    )
}
