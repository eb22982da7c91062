use crate::scout_browser::context::{BrowsingContext, Target};
use regex::Regex;
use scout_common::Result;
use std::time::Duration;
use tracing::{info, warn};

/// Buttons (native or ARIA) labelled "accept all cookies", any casing.
pub fn consent_button() -> Target {
    let label = Regex::new("(?i)accept all cookies").expect("static pattern");
    Target::css(r#"button, [role="button"]"#).with_text_pattern(label)
}

/// Dismiss the cookie banner if it shows up within `timeout`.
///
/// A banner that never appears is not an error; returns whether a click
/// happened. Driver failures other than the wait elapsing still propagate.
pub async fn accept_cookies(ctx: &mut dyn BrowsingContext, timeout: Duration) -> Result<bool> {
    let button = consent_button();
    match ctx.click(&button, timeout).await {
        Ok(()) => {
            info!(target: "browser.consent", "cookies accepted");
            Ok(true)
        }
        Err(e) if e.is_timeout() => {
            warn!(target: "browser.consent", ?timeout, "cookie banner not visible");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
