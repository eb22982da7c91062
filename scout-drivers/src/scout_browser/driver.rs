use crate::scout_browser::page::ScoutPage;
use anyhow::Context;
use fantoccini::{wd::TimeoutConfiguration, Client, ClientBuilder};
use scout_common::{BrowserConfig, Result, ScoutError, TimeoutConfig};
use serde_json::json;
use std::collections::HashMap;
use tracing::info;
use url::Url;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct ScoutDriver {
    pub client: Client,
    timeouts: TimeoutConfig,
}

impl ScoutDriver {
    /// Create a new driver connected to the WebDriver service named in
    /// `browser.webdriver_url` (Chromedriver on `localhost:9515` by default).
    ///
    /// Page loads are bounded by `timeouts.navigation_ms`.
    pub async fn connect(browser: &BrowserConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let endpoint = Url::parse(&browser.webdriver_url).map_err(|e| {
            ScoutError::Config(format!(
                "invalid webdriver_url `{}`: {e}",
                browser.webdriver_url
            ))
        })?;

        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(build_chrome_arguments(browser)));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(endpoint.as_str())
            .await
            .with_context(|| format!("failed to start WebDriver session at {endpoint}"))?;

        client
            .update_timeouts(TimeoutConfiguration::new(
                None,
                Some(timeouts.navigation()),
                None,
            ))
            .await
            .map_err(anyhow::Error::from)?;

        info!(target: "browser.driver", %endpoint, headless = browser.headless, "session started");

        Ok(Self {
            client,
            timeouts: timeouts.clone(),
        })
    }

    /// A [`ScoutPage`] over this session's current browsing context.
    pub fn page(&self) -> ScoutPage {
        ScoutPage::new(self.client.clone(), &self.timeouts)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await.map_err(anyhow::Error::from)?;
        Ok(())
    }
}

/// Chrome command-line arguments for the configured window.
pub fn build_chrome_arguments(browser: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-extensions".to_string(),
        format!(
            "--window-size={},{}",
            browser.window_size.0, browser.window_size.1
        ),
    ];
    if browser.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_adds_flags() {
        let browser = BrowserConfig {
            headless: true,
            ..BrowserConfig::default()
        };
        let args = build_chrome_arguments(&browser);
        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
    }

    #[test]
    fn headed_by_default() {
        let args = build_chrome_arguments(&BrowserConfig::default());
        assert!(!args.iter().any(|a| a == "--headless"));
    }
}
