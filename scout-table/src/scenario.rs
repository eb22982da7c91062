use crate::model::Constituent;
use crate::selectors::{Column, SortDirection};
use scout_common::ScenarioConfig;
use tracing::warn;

/// Which rows of a page make it into the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowFilter {
    /// Every named row.
    Any,
    /// Rows whose parsed market cap is strictly greater than the value.
    MarketCapAbove(f64),
}

impl RowFilter {
    pub fn admits(&self, constituent: &Constituent) -> bool {
        match *self {
            RowFilter::Any => true,
            RowFilter::MarketCapAbove(threshold) => {
                match (
                    constituent.market_cap_text(),
                    constituent.market_cap_in_millions(),
                ) {
                    (_, Some(value)) => value > threshold,
                    (Some(text), None) => {
                        warn!(
                            target: "table.rows",
                            name = constituent.name(),
                            text,
                            "unparseable market cap; row excluded"
                        );
                        false
                    }
                    (None, None) => false,
                }
            }
        }
    }
}

/// One "sort, page through, read, filter" run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPlan {
    pub name: &'static str,
    pub column: Column,
    pub direction: SortDirection,
    /// Toggle the header again after sorting. The ascending menu stays open
    /// over the first rows, so the bottom-N run closes it before reading.
    pub close_menu_after_sort: bool,
    /// Pages 1..=pages are read in order.
    pub pages: u32,
    /// Rows read per page; `None` reads the whole page.
    pub rows_per_page: Option<usize>,
    pub filter: RowFilter,
}

impl ScenarioPlan {
    /// Highest percent change first, first `n` rows of page 1.
    pub fn top_n(n: usize) -> Self {
        Self {
            name: "top-n",
            column: Column::PercentChange,
            direction: SortDirection::Descending,
            close_menu_after_sort: false,
            pages: 1,
            rows_per_page: Some(n),
            filter: RowFilter::Any,
        }
    }

    /// Lowest percent change first, first `n` rows of page 1.
    pub fn bottom_n(n: usize) -> Self {
        Self {
            name: "bottom-n",
            column: Column::PercentChange,
            direction: SortDirection::Ascending,
            close_menu_after_sort: true,
            pages: 1,
            rows_per_page: Some(n),
            filter: RowFilter::Any,
        }
    }

    /// Largest market cap first, every row of pages `1..=pages` above `threshold`.
    pub fn threshold_scan(threshold: f64, pages: u32) -> Self {
        Self {
            name: "threshold-scan",
            column: Column::MarketCap,
            direction: SortDirection::Descending,
            close_menu_after_sort: false,
            pages,
            rows_per_page: None,
            filter: RowFilter::MarketCapAbove(threshold),
        }
    }

    /// The three plans with the configured sizes, in run order.
    pub fn all(cfg: &ScenarioConfig) -> [ScenarioPlan; 3] {
        [
            Self::top_n(cfg.top_n),
            Self::bottom_n(cfg.bottom_n),
            Self::threshold_scan(cfg.threshold_millions, cfg.page_bound),
        ]
    }
}
