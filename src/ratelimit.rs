use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default window of the wave endpoint limiter
pub const WINDOW: Duration = Duration::from_secs(60);

/// Default number of accepted requests per window and client
pub const MAX_HITS: usize = 5;

/// Per-client sliding window limiter
///
/// Lives only in process memory and starts empty on every restart. Keys are
/// never evicted, only their stale timestamps are dropped when the same key is
/// seen again.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_hits: usize,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new(WINDOW, MAX_HITS)
    }
}

impl RateLimiter {
    pub fn new(window: Duration, max_hits: usize) -> Self {
        RateLimiter {
            window,
            max_hits,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `key` now; false means it is over the limit
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Record a request from `key` at `now`
    ///
    /// Only accepted requests count toward the window.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut hits = match self.hits.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let log = hits.entry(key.to_string()).or_default();
        log.retain(|t| now.saturating_duration_since(*t) < self.window);

        if log.len() >= self.max_hits {
            return false;
        }
        log.push(now);
        true
    }

    /// Number of distinct keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        match self.hits.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
