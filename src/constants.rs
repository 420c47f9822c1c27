use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Submission budget per client IP within one window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 5;

/// Window length in seconds (one hour, matching the sweep cadence).
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 3600;
