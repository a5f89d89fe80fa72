// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Report configuration
//!
//! Stored as pretty JSON under the platform config directory. A missing file
//! means defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ReportError, Result};
use crate::report::format::NumberFormat;

fn default_company_name() -> String {
    "Coffee Chain".to_string()
}

fn default_max_items() -> usize {
    6
}

fn default_min_line_len() -> usize {
    10
}

fn default_max_header_len() -> usize {
    60
}

fn default_bar_label_chars() -> usize {
    18
}

fn default_settle_delay_ms() -> u64 {
    500
}

/// Keys accepted by `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "company_name",
    "max_items_per_section",
    "min_line_len",
    "max_header_len",
    "bar_label_chars",
    "settle_delay_ms",
    "thousands_separator",
    "decimal_separator",
    "currency_suffix",
    "output_dir",
    "browser",
];

/// Report generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Name printed in the report header and footer
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Lines kept per narrative section
    #[serde(default = "default_max_items")]
    pub max_items_per_section: usize,

    /// Narrative lines shorter than this are dropped as noise
    #[serde(default = "default_min_line_len")]
    pub min_line_len: usize,

    /// Longest narrative line that may still be a section heading
    #[serde(default = "default_max_header_len")]
    pub max_header_len: usize,

    /// Bar chart labels are cut past this many characters
    #[serde(default = "default_bar_label_chars")]
    pub bar_label_chars: usize,

    /// Pause between injecting the document and printing
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default)]
    pub number_format: NumberFormat,

    /// Where rendered reports are written (defaults to the current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Command used to open reports instead of the platform opener
    #[serde(default)]
    pub browser: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            max_items_per_section: default_max_items(),
            min_line_len: default_min_line_len(),
            max_header_len: default_max_header_len(),
            bar_label_chars: default_bar_label_chars(),
            settle_delay_ms: default_settle_delay_ms(),
            number_format: NumberFormat::default(),
            output_dir: None,
            browser: None,
        }
    }
}

impl ReportConfig {
    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("cafe-report").join("config.json"))
    }

    /// Update one setting from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || ReportError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "company_name" => self.company_name = value.to_string(),
            "max_items_per_section" => {
                self.max_items_per_section = value.parse().map_err(|_| invalid())?;
                if self.max_items_per_section == 0 {
                    return Err(invalid());
                }
            }
            "min_line_len" => self.min_line_len = value.parse().map_err(|_| invalid())?,
            "max_header_len" => self.max_header_len = value.parse().map_err(|_| invalid())?,
            "bar_label_chars" => {
                self.bar_label_chars = value.parse().map_err(|_| invalid())?;
                if self.bar_label_chars < 2 {
                    return Err(invalid());
                }
            }
            "settle_delay_ms" => self.settle_delay_ms = value.parse().map_err(|_| invalid())?,
            "thousands_separator" => self.number_format.thousands_separator = value.to_string(),
            "decimal_separator" => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.number_format.decimal_separator = value.to_string();
            }
            "currency_suffix" => self.number_format.currency_suffix = value.to_string(),
            "output_dir" => {
                self.output_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "browser" => {
                self.browser = (!value.is_empty()).then(|| value.to_string());
            }
            _ => return Err(ReportError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// Current value of one setting as a display string
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "company_name" => self.company_name.clone(),
            "max_items_per_section" => self.max_items_per_section.to_string(),
            "min_line_len" => self.min_line_len.to_string(),
            "max_header_len" => self.max_header_len.to_string(),
            "bar_label_chars" => self.bar_label_chars.to_string(),
            "settle_delay_ms" => self.settle_delay_ms.to_string(),
            "thousands_separator" => self.number_format.thousands_separator.clone(),
            "decimal_separator" => self.number_format.decimal_separator.clone(),
            "currency_suffix" => self.number_format.currency_suffix.clone(),
            "output_dir" => self
                .output_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "browser" => self.browser.clone().unwrap_or_default(),
            _ => return Err(ReportError::UnknownConfigKey(key.to_string())),
        };
        Ok(value)
    }

    /// Directory for rendered reports
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ReportConfig = serde_json::from_str(r#"{"company_name": "Highland"}"#).unwrap();
        assert_eq!(config.company_name, "Highland");
        assert_eq!(config.max_items_per_section, 6);
        assert_eq!(config.number_format, NumberFormat::default());
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ReportConfig::default();
        config.set("settle_delay_ms", "250").unwrap();
        config.set("currency_suffix", "VND").unwrap();
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.get("currency_suffix").unwrap(), "VND");

        config.set("browser", "firefox").unwrap();
        assert_eq!(config.browser.as_deref(), Some("firefox"));
        config.set("browser", "").unwrap();
        assert!(config.browser.is_none());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = ReportConfig::default();
        assert!(matches!(
            config.set("settle_delay_ms", "soon"),
            Err(ReportError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("max_items_per_section", "0"),
            Err(ReportError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("colour", "blue"),
            Err(ReportError::UnknownConfigKey(_))
        ));
    }

    #[test]
    fn test_every_listed_key_is_readable() {
        let config = ReportConfig::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_ok(), "key {} not readable", key);
        }
    }
}
