use crate::cli::Scenario;
use crate::report::ScenarioReport;
use scout_common::{Result, ScoutConfig};
use scout_drivers::scout_browser::context::BrowsingContext;
use scout_table::IndexTable;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Run one scenario from a fresh landing page.
///
/// Each run navigates and opens the table itself, so scenarios never share
/// sort or page state.
pub async fn run_scenario<B: BrowsingContext>(
    ctx: B,
    cfg: &ScoutConfig,
    scenario: Scenario,
) -> Result<ScenarioReport> {
    let run_id = Uuid::new_v4();
    let span = info_span!("scenario", name = scenario.key(), %run_id);

    async move {
        let mut table = IndexTable::new(ctx, cfg);
        table.navigate().await?;
        table.go_to_table().await?;

        let constituents = match scenario {
            Scenario::Top => table.extract_top_n().await?,
            Scenario::Bottom => table.extract_bottom_n().await?,
            Scenario::Threshold => table.extract_threshold_scan().await?,
        };

        if let Some(wanted) = expected_yield(scenario, cfg) {
            if constituents.len() < wanted {
                warn!(
                    wanted,
                    got = constituents.len(),
                    "fewer constituents than requested"
                );
            }
        }
        info!(results = constituents.len(), "scenario complete");

        Ok(ScenarioReport::new(scenario, cfg, constituents))
    }
    .instrument(span)
    .await
}

/// Row count a scenario should produce, where one is known up front.
fn expected_yield(scenario: Scenario, cfg: &ScoutConfig) -> Option<usize> {
    match scenario {
        Scenario::Top => Some(cfg.scenarios.top_n),
        Scenario::Bottom => Some(cfg.scenarios.bottom_n),
        Scenario::Threshold => None,
    }
}
