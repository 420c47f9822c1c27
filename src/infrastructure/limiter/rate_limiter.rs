use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of a rate-limit check for a single client key.
#[derive(Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied { retry_after_secs: u64 },
}

#[derive(Debug)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by client IP. Best-effort abuse
/// throttling: state is process-lifetime only and per instance.
pub struct FixedWindowLimiter {
    entries: DashMap<String, WindowEntry>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        FixedWindowLimiter {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Check-and-increment for one key. The map's entry lock makes the
    /// read-modify-write atomic per key, so concurrent requests from the
    /// same IP cannot both observe the pre-increment count.
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| WindowEntry {
                count: 0,
                reset_at: now + self.window,
            });

        if now >= entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return RateLimitDecision::Allowed;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            RateLimitDecision::Allowed
        } else {
            RateLimitDecision::Denied {
                retry_after_secs: retry_after_secs(entry.reset_at - now),
            }
        }
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Removes entries whose window has passed. Racing with a live check
    /// is harmless: a removed entry is by definition expired, and a
    /// concurrent submission simply recreates it with a fresh window.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.reset_at);
        before - self.entries.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }
}

fn retry_after_secs(remaining: Duration) -> u64 {
    (remaining.as_secs_f64().ceil() as u64).max(1)
}
