use clap::{Parser, ValueEnum};
use scout_common::{OutputFormat, ScoutConfig};
use std::path::PathBuf;

/// Extract FTSE 100 constituents from the London Stock Exchange table.
#[derive(Debug, Parser)]
#[command(name = "scout", version, about)]
pub struct Cli {
    /// Scenario to run.
    #[arg(value_enum, default_value_t = ScenarioArg::All)]
    pub scenario: ScenarioArg,

    /// YAML configuration file; defaults to `<config_dir>/scout/scout.yaml` if present.
    #[arg(short, long, env = "SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override `browser.base_url`.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override `browser.webdriver_url`.
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window.
    #[arg(long)]
    pub headless: bool,

    /// Override the output format.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Mirror log events to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioArg {
    Top,
    Bottom,
    Threshold,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Table,
    Json,
}

/// The extraction scenarios the binary knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Top,
    Bottom,
    Threshold,
}

impl Scenario {
    pub fn key(self) -> &'static str {
        match self {
            Scenario::Top => "top",
            Scenario::Bottom => "bottom",
            Scenario::Threshold => "threshold",
        }
    }
}

impl ScenarioArg {
    pub fn scenarios(self) -> Vec<Scenario> {
        match self {
            ScenarioArg::Top => vec![Scenario::Top],
            ScenarioArg::Bottom => vec![Scenario::Bottom],
            ScenarioArg::Threshold => vec![Scenario::Threshold],
            ScenarioArg::All => vec![Scenario::Top, Scenario::Bottom, Scenario::Threshold],
        }
    }
}

impl Cli {
    /// Command-line flags win over file and environment settings.
    pub fn apply_overrides(&self, cfg: &mut ScoutConfig) {
        if let Some(url) = &self.base_url {
            cfg.browser.base_url = url.clone();
        }
        if let Some(url) = &self.webdriver_url {
            cfg.browser.webdriver_url = url.clone();
        }
        if self.headless {
            cfg.browser.headless = true;
        }
        if let Some(format) = self.format {
            cfg.output = match format {
                FormatArg::Table => OutputFormat::Table,
                FormatArg::Json => OutputFormat::Json,
            };
        }
        if self.verbose {
            cfg.logging.stderr = true;
        }
    }
}
