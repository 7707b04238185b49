use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::clock::Clock;

/// Length of the fixed admission window.
const WINDOW: Duration = Duration::from_secs(60);

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Fixed-window request counter keyed by client identity.
///
/// A window opens on a client's first request and stays open for 60s;
/// expired windows are replaced whole, never merged. A client can burst up
/// to twice the limit across a window boundary — an accepted trade-off of
/// the fixed (non-sliding) window. The identity map is unbounded.
#[derive(Clone)]
pub struct RateLimiter {
    limit: u32,
    clock: Arc<dyn Clock>,
    windows: Arc<RwLock<HashMap<String, RateWindow>>>,
}

struct RateWindow {
    start: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(limit: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit,
            clock,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Admit or reject one request for `identity`, updating its window.
    ///
    /// The whole read-modify-write runs under the write lock, so racing
    /// requests for the same identity cannot both observe `count < limit`.
    pub fn admit(&self, identity: &str) -> Admission {
        let now = self.clock.now();
        let mut windows = self.windows.write().unwrap_or_else(|e| e.into_inner());

        if let Some(window) = windows.get_mut(identity) {
            let elapsed = now.duration_since(window.start);
            if elapsed < WINDOW {
                if window.count >= self.limit {
                    return Admission::Rejected {
                        retry_after: WINDOW - elapsed,
                    };
                }
                window.count += 1;
                return Admission::Admitted;
            }
        }

        // First request, or the previous window expired: replace it whole.
        windows.insert(identity.to_string(), RateWindow { start: now, count: 1 });
        Admission::Admitted
    }
}
