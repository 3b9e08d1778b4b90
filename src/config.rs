//! Project configuration module.
//!
//! Handles loading, validating, and merging `site-forge.toml`. Stock defaults
//! are serialized to a TOML table, the user's file is merged on top, and the
//! result is deserialized and validated. Command-line flags override the
//! resolved values for a single run.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! catalog_root = "web-components-v2"  # Component catalog
//! output_dir = "web-folder"           # Generated site
//! master_root = "master"              # Country legal content
//!
//! [site]
//! title = "Professional Casino Website"
//! description = "Experience the best online casino games"
//! author = "site-forge"
//! lang = "en"
//! legal_notice = "18+ Only. Please gamble responsibly. BeGambleAware.org"
//!
//! [theme]
//! seed = "#d4af37"     # Primary brand color
//! mode = "dark"        # "light" or "dark"
//!
//! [selection]
//! policy = "single"    # "single", "smart" or "wild"
//! components = ["header", "hero", "footer"]
//! # rng_seed = 42      # Fix for reproducible picks
//! ```
//!
//! Config files are sparse; override just the values you want. Unknown keys
//! are rejected to catch typos early, and a malformed `theme.seed` fails at
//! load time, before any theme is generated.

use crate::color::Color;
use crate::document::SiteMeta;
use crate::selector::MixingPolicy;
use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config filename, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "site-forge.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteForgeConfig {
    pub catalog_root: String,
    pub output_dir: String,
    pub master_root: String,
    /// Page metadata and legal notice text.
    pub site: SiteMeta,
    pub theme: ThemeSettings,
    pub selection: SelectionSettings,
}

impl Default for SiteForgeConfig {
    fn default() -> Self {
        Self {
            catalog_root: "web-components-v2".to_string(),
            output_dir: "web-folder".to_string(),
            master_root: "master".to_string(),
            site: SiteMeta::default(),
            theme: ThemeSettings::default(),
            selection: SelectionSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSettings {
    pub seed: Color,
    pub mode: ThemeMode,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            seed: Color::rgb(0xd4, 0xaf, 0x37),
            mode: ThemeMode::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionSettings {
    pub policy: MixingPolicy,
    pub components: Vec<String>,
    /// Seed for variant picks. Unset means seeded from the clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            policy: MixingPolicy::Single,
            components: ["header", "hero", "footer"].map(String::from).to_vec(),
            rng_seed: None,
        }
    }
}

impl SiteForgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection.components.is_empty() {
            return Err(ConfigError::Validation(
                "selection.components must not be empty".into(),
            ));
        }
        if self.selection.components.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "selection.components must not contain blank names".into(),
            ));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock default config as a `toml::Value::Table`, the base layer for
/// merging user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteForgeConfig::default())?)
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

/// Read a config file as a raw TOML value. `Ok(None)` when it doesn't exist.
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
) -> Result<SiteForgeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteForgeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when the file is
/// absent.
pub fn load_config(path: &Path) -> Result<SiteForgeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// A fully-commented stock `site-forge.toml`. Used by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# site-forge configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
# Command-line flags override these values for a single run.

# Directory holding one sub-directory per component, each with a
# component.json descriptor and {variant}.html/.css/.js assets.
catalog_root = "web-components-v2"

# Where index.html, css/styles.css and js/main.js are written.
output_dir = "web-folder"

# Country legal content: master/footer/<Country>/, master/offers/<Country>/
master_root = "master"

# ---------------------------------------------------------------------------
# Page metadata
# ---------------------------------------------------------------------------
[site]
title = "Professional Casino Website"
description = "Experience the best online casino games"
author = "site-forge"
lang = "en"
# Rendered in the fixed notice at the end of every page.
legal_notice = "18+ Only. Please gamble responsibly. BeGambleAware.org"

# ---------------------------------------------------------------------------
# Theme generation
# ---------------------------------------------------------------------------
[theme]
# Primary brand color, #RGB or #RRGGBB. Every other color derives from it.
seed = "#d4af37"
# "light" or "dark"
mode = "dark"

# ---------------------------------------------------------------------------
# Variant selection
# ---------------------------------------------------------------------------
[selection]
# single: one random variant per component
# smart:  random variants from a compatible theme family
# wild:   random variants among those with files present
policy = "single"
components = ["header", "hero", "footer"]
# Fix the random seed to make picks reproducible.
# rng_seed = 42
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = SiteForgeConfig::default();
        assert_eq!(config.catalog_root, "web-components-v2");
        assert_eq!(config.output_dir, "web-folder");
        assert_eq!(config.theme.mode, ThemeMode::Dark);
        assert_eq!(config.theme.seed.to_hex(), "#d4af37");
        assert_eq!(config.selection.policy, MixingPolicy::Single);
        assert_eq!(config.selection.components, vec!["header", "hero", "footer"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_template_matches_defaults() {
        let parsed: SiteForgeConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, SiteForgeConfig::default());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, SiteForgeConfig::default());
    }

    #[test]
    fn load_config_merges_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r##"
output_dir = "dist"

[theme]
seed = "#0af"
mode = "light"

[selection]
policy = "smart"
rng_seed = 7
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.output_dir, "dist");
        assert_eq!(config.catalog_root, "web-components-v2");
        assert_eq!(config.theme.seed.to_hex(), "#00aaff");
        assert_eq!(config.theme.mode, ThemeMode::Light);
        assert_eq!(config.selection.policy, MixingPolicy::Smart);
        assert_eq!(config.selection.rng_seed, Some(7));
        // Untouched keys inside a merged table survive.
        assert_eq!(config.selection.components.len(), 3);
        assert_eq!(config.site.lang, "en");
    }

    #[test]
    fn malformed_seed_fails_at_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[theme]\nseed = \"#12345\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("#12345"));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[selection]\npolicyy = \"wild\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteForgeConfig, _> = toml::from_str("[images]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_policy_rejected() {
        let result: Result<SiteForgeConfig, _> =
            toml::from_str("[selection]\npolicy = \"chaos\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn policy_accepts_menu_number() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[selection]\npolicy = \"2\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.selection.policy, MixingPolicy::Smart);
        // Written back by name.
        let written = toml::to_string(&config).unwrap();
        assert!(written.contains("policy = \"smart\""));
    }

    #[test]
    fn empty_components_fail_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[selection]\ncomponents = []\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("selection.components"));
    }

    #[test]
    fn blank_title_fails_validation() {
        let mut config = SiteForgeConfig::default();
        config.site.title = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "this is not toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"output_dir = "a""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"output_dir = "b""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("output_dir").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[selection]
policy = "single"
components = ["header", "hero"]
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[selection]
policy = "wild"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let selection = merged.get("selection").unwrap();
        assert_eq!(selection.get("policy").unwrap().as_str(), Some("wild"));
        assert_eq!(selection.get("components").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn merge_toml_arrays_replace_not_append() {
        let base: toml::Value = toml::from_str(r#"components = ["a", "b", "c"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"components = ["z"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("components").unwrap().as_array().unwrap().len(), 1);
    }
}
