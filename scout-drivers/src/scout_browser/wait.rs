use scout_common::{Result, ScoutError};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Poll `probe` every `interval` until it yields `Some`, or fail with a
/// timeout naming `what` once `timeout` has elapsed.
///
/// The probe always runs at least once, so a zero timeout still observes
/// the current state. Probe errors abort the wait immediately.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if let Some(value) = probe().await? {
            debug!(target: "browser.wait", what, attempts, "condition met");
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            debug!(target: "browser.wait", what, attempts, "gave up");
            return Err(ScoutError::timeout(what, timeout));
        }
        sleep(interval.min(deadline - now)).await;
    }
}
