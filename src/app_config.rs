use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Container file extension scanned in batch mode
    #[serde(default = "default_container_extension")]
    pub container_extension: String,

    /// Recognized subtitle file extensions for candidate pairing
    #[serde(default = "default_subtitle_extensions")]
    pub subtitle_extensions: Vec<String>,

    /// Merge options
    #[serde(default)]
    pub merge: MergeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Options that drive the merge engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MergeConfig {
    // @field: Suffix token appended to derived style names
    #[serde(default = "default_style_suffix")]
    pub style_suffix: String,

    // @field: Fixed padding added on top of margin + fontsize
    #[serde(default = "default_margin_padding")]
    pub margin_padding: f64,

    // @field: Name suffix for the merged output file stem
    #[serde(default = "default_merged_suffix")]
    pub merged_suffix: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            style_suffix: default_style_suffix(),
            margin_padding: default_margin_padding(),
            merged_suffix: default_merged_suffix(),
        }
    }
}

/// Log level for application logging
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_container_extension() -> String {
    "mkv".to_string()
}

fn default_subtitle_extensions() -> Vec<String> {
    vec!["ass".to_string(), "srt".to_string()]
}

fn default_style_suffix() -> String {
    "Add".to_string()
}

fn default_margin_padding() -> f64 {
    10.0
}

fn default_merged_suffix() -> String {
    "merged".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            container_extension: default_container_extension(),
            subtitle_extensions: default_subtitle_extensions(),
            merge: MergeConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<()> {
        if self.container_extension.trim().is_empty() {
            return Err(anyhow!("Container extension must not be empty"));
        }

        if self.subtitle_extensions.is_empty() {
            return Err(anyhow!("At least one subtitle extension is required"));
        }

        if self
            .subtitle_extensions
            .iter()
            .any(|ext| ext.trim().is_empty() || ext.starts_with('.'))
        {
            return Err(anyhow!(
                "Subtitle extensions must be bare extensions without a leading dot"
            ));
        }

        if self.merge.style_suffix.trim().is_empty() {
            return Err(anyhow!("Derived style suffix must not be empty"));
        }

        if !self.merge.margin_padding.is_finite() || self.merge.margin_padding < 0.0 {
            return Err(anyhow!(
                "Margin padding must be a non-negative number, got {}",
                self.merge.margin_padding
            ));
        }

        Ok(())
    }
}
