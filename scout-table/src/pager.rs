use crate::selectors;
use scout_common::{Result, ScoutError, TimeoutConfig};
use scout_drivers::scout_browser::context::BrowsingContext;
use std::time::Duration;
use tracing::{debug, info};

/// Moves the table between its 1-based pages.
///
/// Paging goes through the site's own pager, so whatever sort was applied
/// stays in effect.
#[derive(Debug)]
pub struct PageNavigator {
    current: u32,
    element_timeout: Duration,
    navigation_timeout: Duration,
}

impl PageNavigator {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        Self {
            current: 1,
            element_timeout: timeouts.element(),
            navigation_timeout: timeouts.navigation(),
        }
    }

    /// Page the table was last known to show.
    pub fn current_page(&self) -> u32 {
        self.current
    }

    /// Forget navigation history; the table was freshly loaded on page 1.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Show page `page`, returning once its rows are rendered.
    ///
    /// Staying on the current page is a no-op. A pager link that never
    /// becomes visible is reported as a timeout: either the table has fewer
    /// pages or the pager changed. Callers should stop there.
    pub async fn go_to_page(&mut self, ctx: &mut dyn BrowsingContext, page: u32) -> Result<()> {
        if page == 0 {
            return Err(ScoutError::InvalidPage(page));
        }
        if page == self.current {
            debug!(target: "table.pager", page, "already on page");
            return Ok(());
        }

        let link = selectors::pager_link(page);
        ctx.wait_for_visible(&link, self.element_timeout).await?;
        ctx.click(&link, self.element_timeout).await?;
        ctx.wait_for_network_settle(self.navigation_timeout).await?;
        ctx.wait_for_visible(&selectors::rows(), self.element_timeout)
            .await?;

        info!(target: "table.pager", from = self.current, to = page, "page changed");
        self.current = page;
        Ok(())
    }
}
