use crate::model::Constituent;
use crate::pager::PageNavigator;
use crate::rows::{extract_rows, ColumnMapping};
use crate::scenario::ScenarioPlan;
use crate::selectors;
use crate::sort::SortController;
use scout_common::{Result, ScenarioConfig, ScoutConfig, ScoutError, TimeoutConfig};
use scout_drivers::scout_browser::{
    consent::accept_cookies,
    context::BrowsingContext,
    wait::poll_until,
};
use tracing::{debug, info};
use url::Url;

const SAME_TAB_SCRIPT: &str = "arguments[0].removeAttribute('target'); return null;";

/// Exclusive session over the constituents table.
///
/// Owns the browsing context together with the table's sort and page
/// state. Every operation takes `&mut self`, so one scenario cannot
/// interleave with another on the same view.
pub struct IndexTable<B> {
    ctx: B,
    base_url: String,
    link_text: String,
    path_fragment: String,
    columns: ColumnMapping,
    scenarios: ScenarioConfig,
    timeouts: TimeoutConfig,
    sort: SortController,
    pager: PageNavigator,
}

impl<B: BrowsingContext> IndexTable<B> {
    pub fn new(ctx: B, config: &ScoutConfig) -> Self {
        Self {
            ctx,
            base_url: config.browser.base_url.clone(),
            link_text: config.table.link_text.clone(),
            path_fragment: config.table.path_fragment.clone(),
            columns: ColumnMapping::from(&config.table.columns),
            scenarios: config.scenarios.clone(),
            timeouts: config.timeouts.clone(),
            sort: SortController::new(&config.timeouts),
            pager: PageNavigator::new(&config.timeouts),
        }
    }

    /// The underlying browsing context.
    pub fn context(&self) -> &B {
        &self.ctx
    }

    pub fn sort_controller(&self) -> &SortController {
        &self.sort
    }

    pub fn current_page(&self) -> u32 {
        self.pager.current_page()
    }

    /// Load the base address and dismiss the cookie banner if one shows up.
    pub async fn navigate(&mut self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ScoutError::Config(format!("invalid base_url `{}`: {e}", self.base_url)))?;
        self.ctx.goto(url.as_str()).await?;
        accept_cookies(&mut self.ctx, self.timeouts.consent()).await?;
        info!(target: "table.session", url = %self.ctx.current_url().await?, "landing page loaded");
        Ok(())
    }

    /// Follow the link to the constituents table in the same tab.
    ///
    /// Fails with [`ScoutError::StructuralMismatch`] when the address does
    /// not come to contain the configured path fragment in time.
    pub async fn go_to_table(&mut self) -> Result<()> {
        let link = selectors::table_link(&self.link_text);
        let element_timeout = self.timeouts.element();
        self.ctx
            .evaluate_on(&link, SAME_TAB_SCRIPT, element_timeout)
            .await?;
        self.ctx.click(&link, element_timeout).await?;

        let ctx = &self.ctx;
        let fragment = self.path_fragment.as_str();
        let landed = poll_until(
            "table address",
            self.timeouts.navigation(),
            self.timeouts.poll_interval(),
            move || async move {
                let url = ctx.current_url().await?;
                Ok(url.contains(fragment).then_some(url))
            },
        )
        .await;

        match landed {
            Ok(url) => {
                info!(target: "table.session", %url, "constituents table loaded");
                self.pager.reset();
                self.sort.reset();
                Ok(())
            }
            Err(e) if e.is_timeout() => Err(ScoutError::StructuralMismatch {
                expected: self.path_fragment.clone(),
                actual: self.ctx.current_url().await?,
            }),
            Err(e) => Err(e),
        }
    }

    /// Top `scenarios.top_n` constituents by percent change, highest first.
    pub async fn extract_top_n(&mut self) -> Result<Vec<Constituent>> {
        self.run(&ScenarioPlan::top_n(self.scenarios.top_n)).await
    }

    /// Bottom `scenarios.bottom_n` constituents by percent change, lowest first.
    pub async fn extract_bottom_n(&mut self) -> Result<Vec<Constituent>> {
        self.run(&ScenarioPlan::bottom_n(self.scenarios.bottom_n))
            .await
    }

    /// Constituents above `scenarios.threshold_millions` market cap across
    /// the first `scenarios.page_bound` pages, largest first within each page.
    pub async fn extract_threshold_scan(&mut self) -> Result<Vec<Constituent>> {
        self.run(&ScenarioPlan::threshold_scan(
            self.scenarios.threshold_millions,
            self.scenarios.page_bound,
        ))
        .await
    }

    /// Sort, then read and filter pages `1..=plan.pages` in order.
    ///
    /// Any failed wait aborts the run; nothing accumulated so far is returned.
    pub async fn run(&mut self, plan: &ScenarioPlan) -> Result<Vec<Constituent>> {
        info!(target: "table.session", scenario = plan.name, column = %plan.column, direction = ?plan.direction, pages = plan.pages, "scenario started");

        let ctx: &mut dyn BrowsingContext = &mut self.ctx;
        self.sort.open_sort_menu(ctx, plan.column).await?;
        self.sort
            .select_sort_option(ctx, plan.column, plan.direction)
            .await?;
        if plan.close_menu_after_sort {
            self.sort.close_sort_menu(ctx).await?;
        } else {
            self.sort.finish();
        }

        let mut collected = Vec::new();
        for page in 1..=plan.pages {
            self.pager.go_to_page(ctx, page).await?;
            let rows = extract_rows(&*ctx, plan.rows_per_page, &self.columns).await?;
            let before = collected.len();
            collected.extend(rows.into_iter().filter(|c| plan.filter.admits(c)));
            debug!(target: "table.session", scenario = plan.name, page, kept = collected.len() - before, "page read");
        }

        info!(target: "table.session", scenario = plan.name, results = collected.len(), "scenario finished");
        Ok(collected)
    }
}
