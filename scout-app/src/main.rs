use anyhow::Result;
use clap::Parser;
use cli::Cli;
use scout_common::observability::{LogConfig, init_logging};
use scout_common::ScoutConfig;
use scout_config::{ScoutConfigLoader, default_config_path};
use scout_drivers::scout_browser::driver::ScoutDriver;
use tracing::{error, info};

mod cli;
mod report;
mod runner;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (flags > env > file > defaults)
    let mut cfg = load_config(&cli)?;
    cli.apply_overrides(&mut cfg);

    // 2) Logging from the resolved settings
    let log_path = init_logging(LogConfig::from_settings("scout", &cfg.logging))?;
    info!(log = %log_path.display(), webdriver = %cfg.browser.webdriver_url, "scout starting");

    // 3) One browser session for every requested scenario
    let driver = ScoutDriver::connect(&cfg.browser, &cfg.timeouts).await?;
    let mut reports = Vec::new();
    let mut outcome = Ok(());
    for scenario in cli.scenario.scenarios() {
        match runner::run_scenario(driver.page(), &cfg, scenario).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!(scenario = scenario.key(), error = %e, "scenario failed");
                outcome = Err(e);
                break;
            }
        }
    }

    if let Err(e) = driver.close().await {
        error!(error = %e, "failed to close browser session");
    }

    if !reports.is_empty() {
        print!("{}", report::render(&reports, cfg.output)?);
    }
    outcome?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ScoutConfig> {
    let mut loader = ScoutConfigLoader::new();
    if let Some(path) = default_config_path() {
        loader = loader.with_optional_file(path);
    }
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    Ok(loader.load()?)
}
