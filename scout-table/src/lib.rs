//! Extraction of index constituents from a client-sorted, paginated web table.
//!
//! The table lives in a browser page reached through a
//! [`BrowsingContext`](scout_drivers::scout_browser::context::BrowsingContext).
//! Sorting, paging and reading are separate components, composed by
//! [`IndexTable`] into three scenarios:
//!
//! - top-N rows by percent change, highest first ([`IndexTable::extract_top_n`])
//! - bottom-N rows by percent change, lowest first ([`IndexTable::extract_bottom_n`])
//! - rows whose market cap exceeds a threshold across the first pages,
//!   largest first ([`IndexTable::extract_threshold_scan`])
//!
//! Every UI wait is bounded; a wait that elapses aborts the scenario with
//! [`ScoutError::Timeout`](scout_common::ScoutError::Timeout). Rows without a
//! name, or without a parseable market cap where one is required, are skipped
//! with a warning and only reduce the yield.
pub mod model;
pub mod number;
pub mod pager;
pub mod rows;
pub mod scenario;
pub mod selectors;
pub mod session;
pub mod sort;

pub use model::Constituent;
pub use rows::ColumnMapping;
pub use scenario::{RowFilter, ScenarioPlan};
pub use selectors::{Column, SortDirection};
pub use session::IndexTable;
