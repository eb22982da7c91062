#![allow(dead_code)]

use async_trait::async_trait;
use scout_common::observability::{init_logging, LogConfig};
use scout_common::{Result, ScoutConfig, ScoutError};
use scout_drivers::scout_browser::consent::consent_button;
use scout_drivers::scout_browser::context::{BrowsingContext, Target};
use scout_table::selectors::{self, Column, SortDirection};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

pub const HOME_URL: &str = "https://www.example.test/";
pub const TABLE_URL: &str = "https://www.example.test/indices/ftse-100/constituents/table";

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "scout-tests",
            emit_stderr: true,
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };
        init_logging(config).unwrap_or_default()
    });
}

/// One recorded event: level, target, and rendered message.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Layer that keeps every event it sees.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<CapturedEvent>>>);

impl EventLog {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, level: Level, target: &str, message: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.level == level && e.target == target && e.message == message)
            .count()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageVisitor(String::new());
        event.record(&mut message);
        let meta = event.metadata();
        self.0.lock().unwrap().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: message.0,
        });
    }
}

/// Route this thread's events into a fresh [`EventLog`] until the guard drops.
///
/// `#[tokio::test]` runs on a current-thread runtime, so every event of the
/// test body lands here.
pub fn capture_events() -> (EventLog, DefaultGuard) {
    let log = EventLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    (log, tracing::subscriber::set_default(subscriber))
}

/// Configuration with waits short enough for the in-memory page.
pub fn test_config() -> ScoutConfig {
    let mut cfg = ScoutConfig::default();
    cfg.browser.base_url = HOME_URL.to_string();
    cfg.timeouts.settle_ms = 1;
    cfg.timeouts.navigation_ms = 30;
    cfg.timeouts.poll_interval_ms = 1;
    cfg
}

#[derive(Debug, Clone)]
pub struct FakeRow {
    pub name: String,
    pub market_cap: String,
    pub change: f64,
}

impl FakeRow {
    pub fn new(name: &str, market_cap: &str, change: f64) -> Self {
        Self {
            name: name.to_string(),
            market_cap: market_cap.to_string(),
            change,
        }
    }

    fn cap_value(&self) -> Option<f64> {
        self.market_cap.replace(',', "").trim().parse().ok()
    }
}

/// In-memory stand-in for the constituents site.
///
/// Models the landing page, the cookie banner, the same-tab link, the
/// header sort menus, the pager, and the table rows. Waits never sleep:
/// an element that is not visible fails its wait at once.
#[derive(Debug)]
pub struct FakeSite {
    pub url: String,
    pub consent_banner: bool,
    pub link_opens_new_tab: bool,
    /// The link keeps its `target` even after the script strips it.
    pub ignores_same_tab_script: bool,
    pub headers_present: bool,
    pub menus_open: bool,
    pub broken_pager_links: Vec<u32>,
    pub network_stalls: bool,
    pub rows: Vec<FakeRow>,
    pub page_size: usize,
    pub order: Vec<usize>,
    pub open_menu: Option<Column>,
    pub shown_page: u32,
    pub actions: Vec<String>,
}

impl FakeSite {
    pub fn new(rows: Vec<FakeRow>) -> Self {
        let order = (0..rows.len()).collect();
        Self {
            url: "about:blank".to_string(),
            consent_banner: true,
            link_opens_new_tab: true,
            ignores_same_tab_script: false,
            headers_present: true,
            menus_open: true,
            broken_pager_links: Vec::new(),
            network_stalls: false,
            rows,
            page_size: 20,
            order,
            open_menu: None,
            shown_page: 1,
            actions: Vec::new(),
        }
    }

    /// Already on the table page, as if `go_to_table` had run.
    pub fn on_table(rows: Vec<FakeRow>) -> Self {
        let mut site = Self::new(rows);
        site.url = TABLE_URL.to_string();
        site.consent_banner = false;
        site
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_count(&self) -> u32 {
        self.rows.len().div_ceil(self.page_size.max(1)) as u32
    }

    pub fn count_actions(&self, action: &str) -> usize {
        self.actions.iter().filter(|a| a.as_str() == action).count()
    }

    fn on_table_page(&self) -> bool {
        self.url == TABLE_URL
    }

    fn column_for_header(&self, target: &Target) -> Option<Column> {
        [Column::PercentChange, Column::MarketCap]
            .into_iter()
            .find(|c| selectors::header_control(*c).css == target.css)
    }

    fn column_for_menu(&self, target: &Target) -> Option<Column> {
        [Column::PercentChange, Column::MarketCap]
            .into_iter()
            .find(|c| selectors::sort_menu(*c).css == target.css)
    }

    fn sort_option_for(&self, target: &Target) -> Option<(Column, SortDirection)> {
        [Column::PercentChange, Column::MarketCap]
            .into_iter()
            .flat_map(|c| [(c, SortDirection::Descending), (c, SortDirection::Ascending)])
            .find(|(c, d)| selectors::sort_option(*c, *d).css == target.css)
    }

    fn pager_target_page(&self, target: &Target) -> Option<u32> {
        if target.css != selectors::PAGER_LINKS || !self.on_table_page() {
            return None;
        }
        (1..=self.page_count())
            .filter(|p| !self.broken_pager_links.contains(p))
            .find(|p| target.accepts_text(&p.to_string()))
    }

    fn is_consent_button(&self, target: &Target) -> bool {
        target.css == consent_button().css && target.accepts_text("Accept all cookies")
    }

    fn is_table_link(&self, target: &Target) -> bool {
        target.css == "a" && target.accepts_text("View FTSE 100 constituents")
    }

    fn visible(&self, target: &Target) -> bool {
        if self.is_consent_button(target) {
            return self.consent_banner;
        }
        if self.is_table_link(target) {
            return self.url == HOME_URL;
        }
        if !self.on_table_page() {
            return false;
        }
        if self.column_for_header(target).is_some() {
            return self.headers_present;
        }
        if let Some(column) = self.column_for_menu(target) {
            return self.menus_open && self.open_menu == Some(column);
        }
        if let Some((column, _)) = self.sort_option_for(target) {
            return self.menus_open && self.open_menu == Some(column);
        }
        if target.css == selectors::PAGER_LINKS {
            return self.pager_target_page(target).is_some();
        }
        if target.css == selectors::ROWS {
            return !self.rows.is_empty();
        }
        false
    }

    fn require_visible(&self, target: &Target, timeout: Duration) -> Result<()> {
        if self.visible(target) {
            Ok(())
        } else {
            Err(ScoutError::timeout(target.to_string(), timeout))
        }
    }

    fn apply_sort(&mut self, column: Column, direction: SortDirection) {
        let key = |row: &FakeRow| match column {
            Column::PercentChange => Some(row.change),
            Column::MarketCap => row.cap_value(),
        };
        let rows = &self.rows;
        self.order.sort_by(|a, b| {
            match (key(&rows[*a]), key(&rows[*b])) {
                (Some(x), Some(y)) => match direction {
                    SortDirection::Descending => y.total_cmp(&x),
                    SortDirection::Ascending => x.total_cmp(&y),
                },
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }

    fn render_row(row: &FakeRow) -> Vec<String> {
        vec![
            format!("{}.L", row.name.chars().take(3).collect::<String>().to_uppercase()),
            format!("  {}  ", row.name),
            "GBX".to_string(),
            row.market_cap.clone(),
            "1,234.00".to_string(),
            format!("{:.2}", row.change * 10.0),
            format!("{:+.2}%", row.change),
        ]
    }
}

#[async_trait]
impl BrowsingContext for FakeSite {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.actions.push(format!("goto {url}"));
        self.url = url.to_string();
        self.open_menu = None;
        self.shown_page = 1;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn wait_for_visible(&self, target: &Target, timeout: Duration) -> Result<()> {
        self.require_visible(target, timeout)
    }

    async fn click(&mut self, target: &Target, timeout: Duration) -> Result<()> {
        self.require_visible(target, timeout)?;

        if self.is_consent_button(target) {
            self.actions.push("accept cookies".to_string());
            self.consent_banner = false;
        } else if self.is_table_link(target) {
            self.actions.push("click table link".to_string());
            if !self.link_opens_new_tab {
                self.url = TABLE_URL.to_string();
                self.open_menu = None;
                self.shown_page = 1;
            }
        } else if let Some(column) = self.column_for_header(target) {
            self.actions.push(format!("toggle {column}"));
            self.open_menu = match self.open_menu {
                Some(open) if open == column => None,
                _ => Some(column),
            };
        } else if let Some(page) = self.pager_target_page(target) {
            self.actions.push(format!("page {page}"));
            self.shown_page = page;
        } else {
            self.actions.push(format!("click {target}"));
        }
        Ok(())
    }

    async fn evaluate_on(
        &mut self,
        target: &Target,
        script: &str,
        timeout: Duration,
    ) -> Result<Value> {
        self.require_visible(target, timeout)?;

        if self.is_table_link(target) && script.contains("removeAttribute('target')") {
            self.actions.push("same tab".to_string());
            if !self.ignores_same_tab_script {
                self.link_opens_new_tab = false;
            }
        } else if let Some((column, direction)) = self.sort_option_for(target) {
            if script.contains(".click()") {
                self.actions.push(format!("sort {column} {direction:?}"));
                self.apply_sort(column, direction);
            }
        }
        Ok(Value::Null)
    }

    async fn wait_for_network_settle(&self, timeout: Duration) -> Result<()> {
        if self.network_stalls {
            return Err(ScoutError::timeout("network to settle", timeout));
        }
        Ok(())
    }

    async fn read_rows(&self, row_css: &str, cell_css: &str) -> Result<Vec<Vec<String>>> {
        if row_css != selectors::ROWS || cell_css != selectors::CELLS || !self.on_table_page() {
            return Ok(Vec::new());
        }
        let start = (self.shown_page as usize - 1) * self.page_size;
        Ok(self
            .order
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|i| Self::render_row(&self.rows[*i]))
            .collect())
    }
}

/// Twelve rows with distinct percent changes, in table order.
pub fn twelve_movers() -> Vec<FakeRow> {
    [
        ("Shell", 0.5),
        ("HSBC", -1.2),
        ("AstraZeneca", 2.4),
        ("Unilever", -0.3),
        ("BP", 1.1),
        ("Diageo", -2.2),
        ("Rio Tinto", 3.3),
        ("GSK", 0.1),
        ("Barclays", -0.9),
        ("Lloyds", 1.7),
        ("Tesco", -3.1),
        ("Vodafone", 0.8),
    ]
    .into_iter()
    .map(|(name, change)| FakeRow::new(name, "1,000.00", change))
    .collect()
}
