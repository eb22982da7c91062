use crate::selectors::{self, Column, SortDirection};
use scout_common::{Result, ScoutError, TimeoutConfig};
use scout_drivers::scout_browser::context::BrowsingContext;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Clicks the option element in page script rather than through WebDriver,
/// so an overlapping menu or header cannot intercept it.
const CLICK_SCRIPT: &str = "arguments[0].click(); return null;";

/// Where the controller is in the open → select → close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMenuState {
    Idle,
    MenuOpening,
    MenuVisible,
    OptionSelected,
}

/// Applies a sort direction to a column through the header's sort menu.
///
/// The controller never reads rows; it only drives the menu and waits for
/// the table to settle.
#[derive(Debug)]
pub struct SortController {
    state: SortMenuState,
    column: Option<Column>,
    /// Menu a finished cycle left open on the page.
    left_open: Option<Column>,
    element_timeout: Duration,
    settle: Duration,
}

impl SortController {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        Self {
            state: SortMenuState::Idle,
            column: None,
            left_open: None,
            element_timeout: timeouts.element(),
            settle: timeouts.settle(),
        }
    }

    pub fn state(&self) -> SortMenuState {
        self.state
    }

    /// Column whose sort menu is currently expanded on the page, if any.
    pub fn open_menu(&self) -> Option<Column> {
        match self.state {
            SortMenuState::MenuVisible | SortMenuState::OptionSelected => self.column,
            SortMenuState::Idle | SortMenuState::MenuOpening => self.left_open,
        }
    }

    /// Click the header control of `column` and wait for its menu.
    ///
    /// A menu left open by an earlier [`finish`](Self::finish) is reused when
    /// it belongs to `column` and folded away first otherwise.
    ///
    /// Fails with a timeout if the header control or the menu does not show
    /// up in time; the controller is then back to `Idle`.
    pub async fn open_sort_menu(
        &mut self,
        ctx: &mut dyn BrowsingContext,
        column: Column,
    ) -> Result<()> {
        if matches!(
            self.state,
            SortMenuState::MenuOpening | SortMenuState::MenuVisible
        ) {
            return Err(ScoutError::InvalidState(format!(
                "sort menu already {:?}",
                self.state
            )));
        }

        self.state = SortMenuState::MenuOpening;
        self.column = Some(column);
        debug!(target: "table.sort", %column, "opening sort menu");

        let timeout = self.element_timeout;
        let left_open = self.left_open.take();
        let opened = async {
            match left_open {
                Some(open) if open == column => {
                    debug!(target: "table.sort", %column, "sort menu still open");
                }
                Some(open) => {
                    ctx.click(&selectors::header_control(open), timeout)
                        .await?;
                    ctx.click(&selectors::header_control(column), timeout)
                        .await?;
                }
                None => {
                    ctx.click(&selectors::header_control(column), timeout)
                        .await?;
                }
            }
            ctx.wait_for_visible(&selectors::sort_menu(column), timeout)
                .await
        }
        .await;

        match opened {
            Ok(()) => {
                self.state = SortMenuState::MenuVisible;
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Pick `direction` in the open menu of `column`, then wait out the
    /// stabilization delay before returning.
    pub async fn select_sort_option(
        &mut self,
        ctx: &mut dyn BrowsingContext,
        column: Column,
        direction: SortDirection,
    ) -> Result<()> {
        if self.state != SortMenuState::MenuVisible || self.column != Some(column) {
            return Err(ScoutError::InvalidState(format!(
                "cannot select `{}` on {column}: menu is {:?} for {:?}",
                direction.label(),
                self.state,
                self.column
            )));
        }

        let option = selectors::sort_option(column, direction);
        if let Err(e) = ctx
            .evaluate_on(&option, CLICK_SCRIPT, self.element_timeout)
            .await
        {
            self.reset();
            return Err(e);
        }
        self.state = SortMenuState::OptionSelected;

        sleep(self.settle).await;
        info!(target: "table.sort", %column, ?direction, "sort applied");
        Ok(())
    }

    /// Toggle the header control again to fold the menu away from the rows.
    pub async fn close_sort_menu(&mut self, ctx: &mut dyn BrowsingContext) -> Result<()> {
        let column = match (self.state, self.column) {
            (SortMenuState::OptionSelected, Some(column)) => column,
            (state, _) => {
                return Err(ScoutError::InvalidState(format!(
                    "no sort selection to close (menu is {state:?})"
                )))
            }
        };
        ctx.click(&selectors::header_control(column), self.element_timeout)
            .await?;
        debug!(target: "table.sort", %column, "sort menu closed");
        self.reset();
        Ok(())
    }

    /// Accept the selection and leave the menu expanded.
    ///
    /// The next [`open_sort_menu`](Self::open_sort_menu) accounts for it.
    pub fn finish(&mut self) {
        self.left_open = self.open_menu();
        self.state = SortMenuState::Idle;
    }

    /// Forget all menu state, e.g. after the table page was reloaded.
    pub fn reset(&mut self) {
        self.state = SortMenuState::Idle;
        self.left_open = None;
    }
}
