use crate::model::Constituent;
use crate::selectors;
use scout_common::{ColumnsConfig, Result};
use scout_drivers::scout_browser::context::BrowsingContext;
use tracing::{debug, warn};

/// Which `td` of a row holds which field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub name: usize,
    pub market_cap: Option<usize>,
    pub percent_change: Option<usize>,
}

impl From<&ColumnsConfig> for ColumnMapping {
    fn from(cfg: &ColumnsConfig) -> Self {
        Self {
            name: cfg.name_index,
            market_cap: Some(cfg.market_cap_index),
            percent_change: cfg.percent_change_index,
        }
    }
}

impl ColumnMapping {
    /// Turn the cell texts of one row into a constituent, or `None` when
    /// the name cell is missing or blank.
    pub fn project(&self, cells: &[String]) -> Option<Constituent> {
        let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(|s| s.trim());

        let mut constituent = Constituent::new(cell(Some(self.name)).unwrap_or(""))?;
        if let Some(text) = cell(self.market_cap) {
            constituent = constituent.with_market_cap_text(text);
        }
        if let Some(text) = cell(self.percent_change) {
            constituent = constituent.with_percent_change_text(text);
        }
        Some(constituent)
    }
}

/// Read up to `max_rows` rows of the page currently shown (all of them when
/// `None`) and project each through `mapping`.
///
/// The bound applies to rows read, not rows kept: nameless rows are skipped
/// with a warning, so fewer than `max_rows` constituents may come back.
pub async fn extract_rows(
    ctx: &dyn BrowsingContext,
    max_rows: Option<usize>,
    mapping: &ColumnMapping,
) -> Result<Vec<Constituent>> {
    let rows = ctx.read_rows(selectors::ROWS, selectors::CELLS).await?;
    let available = rows.len();
    let limit = max_rows.unwrap_or(available).min(available);

    let mut out = Vec::with_capacity(limit);
    for (index, cells) in rows.iter().take(limit).enumerate() {
        match mapping.project(cells) {
            Some(constituent) => out.push(constituent),
            None => warn!(target: "table.rows", row = index, "name missing; row skipped"),
        }
    }

    debug!(target: "table.rows", available, read = limit, kept = out.len(), "rows extracted");
    Ok(out)
}
