use crate::scout_browser::{
    context::{BrowsingContext, Target},
    wait::poll_until,
};
use async_trait::async_trait;
use fantoccini::{elements::Element, Client, Locator};
use scout_common::{Result, ScoutError, TimeoutConfig};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

const READ_ROWS_SCRIPT: &str = r#"
    const rows = Array.from(document.querySelectorAll(arguments[0]));
    return rows.map(r =>
        Array.from(r.querySelectorAll(arguments[1])).map(c => c.textContent || '')
    );
"#;

const LOAD_STATE_SCRIPT: &str = r#"
    return [document.readyState, performance.getEntriesByType('resource').length];
"#;

/// [`BrowsingContext`] backed by a live WebDriver session.
pub struct ScoutPage {
    pub(crate) client: Client,
    poll_interval: Duration,
    quiet_window: Duration,
}

impl ScoutPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client, timeouts: &TimeoutConfig) -> Self {
        Self {
            client,
            poll_interval: timeouts.poll_interval(),
            quiet_window: timeouts.network_quiet(),
        }
    }

    /// Currently displayed elements matching `target`, text filter applied.
    async fn displayed_matches(&self, target: &Target) -> Result<Vec<Element>> {
        let elements = self
            .client
            .find_all(Locator::Css(&target.css))
            .await
            .map_err(anyhow::Error::from)?;

        let mut matches = Vec::new();
        for element in elements {
            // Elements detached between lookup and inspection count as not displayed.
            if !element.is_displayed().await.unwrap_or(false) {
                continue;
            }
            if target.text.is_some() {
                let text = element.text().await.unwrap_or_default();
                if !target.accepts_text(&text) {
                    continue;
                }
            }
            matches.push(element);
        }
        Ok(matches)
    }

    async fn first_displayed(&self, target: &Target, timeout: Duration) -> Result<Element> {
        let what = target.to_string();
        let page = self;
        poll_until(&what, timeout, self.poll_interval, move || async move {
            Ok(page.displayed_matches(target).await?.into_iter().next())
        })
        .await
    }

    async fn load_state(&self) -> Result<(bool, u64)> {
        let value = self
            .client
            .execute(LOAD_STATE_SCRIPT, vec![])
            .await
            .map_err(anyhow::Error::from)?;
        let ready = value.get(0).and_then(Value::as_str) == Some("complete");
        let resources = value.get(1).and_then(Value::as_u64).unwrap_or(0);
        Ok((ready, resources))
    }
}

#[async_trait]
impl BrowsingContext for ScoutPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        debug!(target: "browser.page", url, "navigating");
        self.client.goto(url).await.map_err(anyhow::Error::from)?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)?)
    }

    async fn wait_for_visible(&self, target: &Target, timeout: Duration) -> Result<()> {
        self.first_displayed(target, timeout).await.map(|_| ())
    }

    async fn click(&mut self, target: &Target, timeout: Duration) -> Result<()> {
        let element = self.first_displayed(target, timeout).await?;
        element.click().await.map_err(anyhow::Error::from)?;
        Ok(())
    }

    async fn evaluate_on(
        &mut self,
        target: &Target,
        script: &str,
        timeout: Duration,
    ) -> Result<Value> {
        let element = self.first_displayed(target, timeout).await?;
        let arg = serde_json::to_value(&element).map_err(anyhow::Error::from)?;
        Ok(self
            .client
            .execute(script, vec![arg])
            .await
            .map_err(anyhow::Error::from)?)
    }

    async fn wait_for_network_settle(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut last_count = None;
        let mut quiet_since = Instant::now();
        loop {
            let (ready, count) = self.load_state().await?;
            let now = Instant::now();
            if last_count != Some(count) {
                last_count = Some(count);
                quiet_since = now;
            }
            if ready && now.duration_since(quiet_since) >= self.quiet_window {
                debug!(target: "browser.wait", resources = count, "network settled");
                return Ok(());
            }
            if now >= deadline {
                return Err(ScoutError::timeout("network to settle", timeout));
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    async fn read_rows(&self, row_css: &str, cell_css: &str) -> Result<Vec<Vec<String>>> {
        let value = self
            .client
            .execute(READ_ROWS_SCRIPT, vec![json!(row_css), json!(cell_css)])
            .await
            .map_err(anyhow::Error::from)?;
        let rows: Vec<Vec<String>> =
            serde_json::from_value(value).map_err(anyhow::Error::from)?;
        Ok(rows)
    }
}
