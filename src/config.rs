//! Configuration management for paylink-e2e

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Error-rendering conventions the login form may use, across component libraries
pub const DEFAULT_VALIDATION_SELECTORS: &[&str] = &[
    ".error-message",
    ".invalid-feedback",
    ".text-danger",
    ".mat-error",
    ".mat-mdc-form-field-error",
    ".ant-form-item-explain-error",
    ".el-form-item__error",
    ".p-error",
    "[role='alert']",
];

/// Harness configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CDP endpoint of a Chrome started with `--remote-debugging-port`
    pub cdp_endpoint: String,

    /// Default timeout for bounded waits in milliseconds
    pub default_timeout_ms: u64,

    /// Outline elements before click/fill
    pub highlight: bool,

    /// How long the highlight stays on, in milliseconds
    pub highlight_pause_ms: u64,

    /// Delay between characters when typing, in milliseconds
    pub type_delay_ms: u64,

    /// Extra settle time after the login page reports network-idle
    pub settle_delay_ms: u64,

    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,

    /// Credential records file
    pub test_data_path: PathBuf,

    /// Selectors joined into the login validation-message locator
    pub validation_selectors: Vec<String>,

    /// Raw `TEST_ENV` override, resolved by [`crate::environment`]
    pub environment: Option<String>,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cdp_endpoint: "ws://localhost:9222".to_string(),
            default_timeout_ms: 30_000,
            highlight: true,
            highlight_pause_ms: 200,
            type_delay_ms: 100,
            settle_delay_ms: 2_000,
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            test_data_path: PathBuf::from("test-data/users.json"),
            validation_selectors: DEFAULT_VALIDATION_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            environment: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(endpoint) = env::var("PAYLINK_CDP_ENDPOINT") {
            config.cdp_endpoint = endpoint;
        }

        if let Ok(timeout) = env::var("PAYLINK_DEFAULT_TIMEOUT") {
            config.default_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid PAYLINK_DEFAULT_TIMEOUT"))?;
        }

        if let Ok(highlight) = env::var("PAYLINK_HIGHLIGHT") {
            config.highlight = highlight
                .parse()
                .map_err(|_| Error::configuration("Invalid PAYLINK_HIGHLIGHT"))?;
        }

        if let Ok(pause) = env::var("PAYLINK_HIGHLIGHT_MS") {
            config.highlight_pause_ms = pause
                .parse()
                .map_err(|_| Error::configuration("Invalid PAYLINK_HIGHLIGHT_MS"))?;
        }

        if let Ok(delay) = env::var("PAYLINK_TYPE_DELAY") {
            config.type_delay_ms = delay
                .parse()
                .map_err(|_| Error::configuration("Invalid PAYLINK_TYPE_DELAY"))?;
        }

        if let Ok(settle) = env::var("PAYLINK_SETTLE_MS") {
            config.settle_delay_ms = settle
                .parse()
                .map_err(|_| Error::configuration("Invalid PAYLINK_SETTLE_MS"))?;
        }

        if let Ok(dir) = env::var("PAYLINK_SCREENSHOT_DIR") {
            config.screenshot_dir = PathBuf::from(dir);
        }

        if let Ok(path) = env::var("PAYLINK_TEST_DATA") {
            config.test_data_path = PathBuf::from(path);
        }

        // Extra selectors extend the defaults rather than replacing them
        if let Ok(extra) = env::var("PAYLINK_VALIDATION_SELECTORS") {
            config.extend_validation_selectors(extra.split(','));
        }

        if let Ok(value) = env::var(crate::environment::ENV_OVERRIDE_VAR) {
            config.environment = Some(value);
        }

        if let Ok(log_level) = env::var("PAYLINK_LOG_LEVEL") {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))
    }

    /// Append selectors, skipping blanks and duplicates
    pub fn extend_validation_selectors<I, S>(&mut self, selectors: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for selector in selectors {
            let selector = selector.as_ref().trim();
            if !selector.is_empty() && !self.validation_selectors.iter().any(|s| s == selector) {
                self.validation_selectors.push(selector.to_string());
            }
        }
    }

    /// Default bound for waits
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn highlight_pause(&self) -> Duration {
        Duration::from_millis(self.highlight_pause_ms)
    }

    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
