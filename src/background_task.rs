use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::FixedWindowLimiter;

/// Drops rate-limit entries whose window has already expired, bounding the
/// map's growth. Runs for the lifetime of the process.
pub async fn start_sweep_task(limiter: Arc<FixedWindowLimiter>, period: Duration) {
    let mut interval = interval(period);

    loop {
        interval.tick().await;

        let removed = limiter.sweep_expired();
        tracing::info!("Swept {} expired rate-limit entries", removed);
    }
}
