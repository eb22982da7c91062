//! Common types and utilities shared across Scout crates.
//!
//! This crate defines configuration, observability helpers, and the shared
//! error type used throughout the Scout workspace. It is intentionally
//! lightweight so that every crate can depend on it without introducing
//! heavy transitive costs.
//!
//! # Overview
//!
//! - [`ScoutConfig`]: Top‑level runtime configuration and its sections
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`ScoutError`] and [`Result`]: Shared error handling
//! - [`OutputFormat`]: how the binary renders extracted constituents
//!
//! # Examples
//!
//! Constructing a default configuration:
//!
//! ```rust
//! use scout_common::{OutputFormat, ScoutConfig};
//!
//! let mut cfg = ScoutConfig::default();
//! cfg.output = OutputFormat::Json;
//! assert_eq!(cfg.scenarios.top_n, 10);
//! assert_eq!(cfg.scenarios.page_bound, 5);
//! ```
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod observability;

/// Configuration for a Scout run.
///
/// Every section falls back to its defaults, so a partial YAML document
/// (or none at all) still yields a complete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub browser: BrowserConfig,
    pub table: TableConfig,
    pub scenarios: ScenarioConfig,
    pub timeouts: TimeoutConfig,
    pub logging: LoggingConfig,
    /// Preferred output format for rendered results.
    pub output: OutputFormat,
}

/// WebDriver connection and target site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Endpoint of a running WebDriver service (Chromedriver by default).
    pub webdriver_url: String,
    /// Whether to run browser automation without a visible window.
    pub headless: bool,
    /// Address loaded by `navigate()`.
    pub base_url: String,
    pub window_size: (u32, u32),
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            base_url: "https://www.londonstockexchange.com/".to_string(),
            window_size: (1920, 1080),
        }
    }
}

/// Where the constituents table lives and how its cells are laid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Visible text of the link leading from the base page to the table.
    pub link_text: String,
    /// Fragment the address must contain once the table page is loaded.
    pub path_fragment: String,
    pub columns: ColumnsConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            link_text: "View FTSE 100".to_string(),
            path_fragment: "indices/ftse-100/constituents".to_string(),
            columns: ColumnsConfig::default(),
        }
    }
}

/// Zero-based `td` indices within a table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub name_index: usize,
    pub market_cap_index: usize,
    pub percent_change_index: Option<usize>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            name_index: 1,
            market_cap_index: 3,
            percent_change_index: None,
        }
    }
}

/// Parameters of the three extraction scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub top_n: usize,
    pub bottom_n: usize,
    /// Market cap (in millions) a row must strictly exceed in the threshold scan.
    pub threshold_millions: f64,
    /// Number of pages visited by the threshold scan.
    pub page_bound: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            bottom_n: 10,
            threshold_millions: 7.0,
            page_bound: 5,
        }
    }
}

/// Bounds for every asynchronous UI wait, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Controls, menus and pager links becoming visible.
    pub element_ms: u64,
    /// Cookie banner appearance.
    pub consent_ms: u64,
    /// Page loads and address changes.
    pub navigation_ms: u64,
    /// Stabilization wait after selecting a sort option.
    pub settle_ms: u64,
    /// Quiet window with no new network activity that counts as settled.
    pub network_quiet_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            element_ms: 5_000,
            consent_ms: 10_000,
            navigation_ms: 30_000,
            settle_ms: 500,
            network_quiet_ms: 500,
            poll_interval_ms: 100,
        }
    }
}

impl TimeoutConfig {
    pub fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    pub fn consent(&self) -> Duration {
        Duration::from_millis(self.consent_ms)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn network_quiet(&self) -> Duration {
        Duration::from_millis(self.network_quiet_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: observability::LogFormat,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: observability::LogFormat::Text,
            stderr: false,
            filter: "info".to_string(),
        }
    }
}

/// Preferred output format for extracted constituents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Error types used across the Scout system.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// A control, menu or page did not become ready within its bound.
    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    /// Navigation landed somewhere other than expected.
    #[error("Expected address containing `{expected}`, got `{actual}`")]
    StructuralMismatch { expected: String, actual: String },

    /// An operation was issued out of order.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Pages are numbered from 1.
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// A driver (WebDriver session, script execution, ...) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScoutError {
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;
