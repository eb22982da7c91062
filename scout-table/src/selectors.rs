//! DOM contract with the constituents page.
//!
//! These strings must match the markup exactly; they are the only coupling
//! between the extraction logic and the site.
use scout_drivers::scout_browser::context::Target;
use std::fmt;

pub const ROWS: &str = "tbody tr";
pub const CELLS: &str = "td";
pub const PAGER_LINKS: &str = ".paginator a.page-number";

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    PercentChange,
    MarketCap,
}

impl Column {
    /// CSS class carried by the column's `th`.
    pub fn header_class(self) -> &'static str {
        match self {
            Column::PercentChange => "percentualchange",
            Column::MarketCap => "marketcap",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_class())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Descending,
    Ascending,
}

impl SortDirection {
    /// Label of the matching entry in the sort menu (note the en dash).
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Descending => "Highest \u{2013} lowest",
            SortDirection::Ascending => "Lowest \u{2013} highest",
        }
    }
}

/// Clickable indicator in the column header that toggles the sort menu.
pub fn header_control(column: Column) -> Target {
    Target::css(format!("th.{} span.indented.clickable", column.header_class()))
}

/// The expanded sort menu, scoped to its header.
pub fn sort_menu(column: Column) -> Target {
    Target::css(menu_css(column))
}

pub fn sort_option(column: Column, direction: SortDirection) -> Target {
    Target::css(format!(
        "{} li.sort-option div[title=\"{}\"]",
        menu_css(column),
        direction.label()
    ))
}

/// Pager link whose text is exactly `page`.
pub fn pager_link(page: u32) -> Target {
    Target::css(PAGER_LINKS).with_exact_text(page.to_string())
}

pub fn rows() -> Target {
    Target::css(ROWS)
}

/// Anchor leading from the landing page to the table.
pub fn table_link(text: &str) -> Target {
    Target::css("a").with_text_containing(text)
}

fn menu_css(column: Column) -> String {
    format!("th.{} .dropmenu.dropdown.expanded", column.header_class())
}
