//! Driver layer for browser automation.
//!
//! This crate exposes the narrow browsing-context interface the table
//! extraction core is written against, plus its WebDriver implementation.
//!
//! - [`scout_browser::context::BrowsingContext`]: async page operations with explicit timeouts
//! - [`scout_browser::context::Target`]: CSS selector with an optional text filter
//! - [`scout_browser::driver::ScoutDriver`]: `fantoccini` WebDriver client wrapper
//! - [`scout_browser::page::ScoutPage`]: `BrowsingContext` backed by a live session
//! - [`scout_browser::consent::accept_cookies`]: best-effort cookie banner dismissal
pub mod scout_browser;
