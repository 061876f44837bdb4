//! Site configuration module.
//!
//! Handles loading, validating, and merging `folio.toml`. The file is
//! sparse: stock defaults are the base layer and any key present in the
//! user file overrides it.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content = "content.json"             # Path or http(s) URL of the content document
//! default_locale = "en"                # Locale used for index.html and flat documents
//! site_url = "http://localhost:8000/"  # Page address, used to resolve relative links
//!
//! [modal]
//! advance_interval_ms = 4000           # Carousel auto-advance period
//! close_transition_ms = 300            # Fade-out before the modal is hidden
//!
//! [contact]
//! status_display_ms = 5000             # How long the form status message stays up
//! request_timeout_secs = 10
//!
//! [fetch]
//! timeout_secs = 10                    # Content document fetch timeout
//! retries = 1                          # Extra attempts on transport errors
//!
//! [viewer]
//! pdf_embed_url = "https://docs.google.com/gview"
//! user_agent = "Mozilla/5.0 (X11; Linux x86_64)"
//!
//! [storage]
//! preferences_path = ".folio/preferences.json"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `folio.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Filesystem path or `http(s)://` URL of the content document.
    pub content: String,
    /// Locale rendered at the output root and assumed for flat documents.
    pub default_locale: String,
    /// Address the page is served from.
    pub site_url: String,
    pub modal: ModalConfig,
    pub contact: ContactConfig,
    pub fetch: FetchConfig,
    pub viewer: ViewerConfig,
    pub storage: StorageConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content: "content.json".to_string(),
            default_locale: "en".to_string(),
            site_url: "http://localhost:8000/".to_string(),
            modal: ModalConfig::default(),
            contact: ContactConfig::default(),
            fetch: FetchConfig::default(),
            viewer: ViewerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_locale must not be empty".into(),
            ));
        }
        if url::Url::parse(&self.site_url).is_err() {
            return Err(ConfigError::Validation(format!(
                "site_url is not a valid URL: {}",
                self.site_url
            )));
        }
        if self.modal.advance_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "modal.advance_interval_ms must be non-zero".into(),
            ));
        }
        if self.contact.request_timeout_secs == 0 || self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request timeouts must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Modal and carousel timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModalConfig {
    pub advance_interval_ms: u64,
    pub close_transition_ms: u64,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            advance_interval_ms: 4000,
            close_transition_ms: 300,
        }
    }
}

impl ModalConfig {
    pub fn advance_interval(&self) -> Duration {
        Duration::from_millis(self.advance_interval_ms)
    }

    pub fn close_transition(&self) -> Duration {
        Duration::from_millis(self.close_transition_ms)
    }
}

/// Contact form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub status_display_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            status_display_ms: 5000,
            request_timeout_secs: 10,
        }
    }
}

/// Content document fetch settings (URL sources only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Extra attempts after a transport error. HTTP error statuses are not retried.
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            retries: 1,
        }
    }
}

/// Document viewer and simulated browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Third-party embed used to show PDFs on mobile devices.
    pub pdf_embed_url: String,
    /// User agent the headless runtime reports.
    pub user_agent: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pdf_embed_url: "https://docs.google.com/gview".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub preferences_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            preferences_path: ".folio/preferences.json".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
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

/// Read a config file as a raw TOML value. `Ok(None)` when the file is absent.
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
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `folio.toml` from `path`, falling back to stock defaults when it
/// doesn't exist.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        log::info!("loaded config from {}", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `folio.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Path or http(s) URL of the content document.
content = "content.json"

# Locale rendered at the output root. Flat (non-localized) documents are
# stored under this code.
default_locale = "en"

# Address the page is served from. Relative PDF links are resolved against
# it, and private/loopback hosts disable the mobile PDF embed.
site_url = "http://localhost:8000/"

# ---------------------------------------------------------------------------
# Detail modal
# ---------------------------------------------------------------------------
[modal]
# Carousel auto-advance period in milliseconds.
advance_interval_ms = 4000

# Fade-out duration before the modal is hidden and emptied.
close_transition_ms = 300

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[contact]
# How long the success/failure message stays visible.
status_display_ms = 5000

# The POST is never retried, so a hung endpoint fails after this timeout.
request_timeout_secs = 10

# ---------------------------------------------------------------------------
# Content fetch (URL sources only)
# ---------------------------------------------------------------------------
[fetch]
timeout_secs = 10

# Extra attempts after a transport error. HTTP error statuses fail at once.
retries = 1

# ---------------------------------------------------------------------------
# Viewers
# ---------------------------------------------------------------------------
[viewer]
# Document viewer embed used for PDFs on mobile devices.
pdf_embed_url = "https://docs.google.com/gview"

# User agent reported by `folio preview`. Use a phone UA to exercise the
# mobile PDF paths.
user_agent = "Mozilla/5.0 (X11; Linux x86_64)"

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# JSON file holding the persisted locale preference.
preferences_path = ".folio/preferences.json"
"##
}
