//! Token bucket rate limiter keyed by client identity.
//!
//! Every client gets two buckets: a per-minute budget for the prediction
//! route and a broader daily budget. Admission consumes one token from each;
//! a rejected request consumes nothing, performs no cache or provider work,
//! and reports which budget was exhausted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use log::{debug, warn};
use thiserror::Error;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Which budget rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    /// The per-route rolling-minute budget.
    PerMinute,
    /// The per-client rolling-day budget.
    PerDay,
}

impl LimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitScope::PerMinute => "per minute",
            LimitScope::PerDay => "per day",
        }
    }
}

/// Rejection reported by [`RateLimiter::try_admit`].
#[derive(Error, Debug)]
#[error("Rate limit exceeded ({}) for client {}", .scope.as_str(), .client)]
pub struct RateLimitExceeded {
    /// The exhausted budget
    pub scope: LimitScope,
    /// The rejected client identity
    pub client: String,
}

/// Admission budgets per client identity.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    /// Admissions per rolling minute on the prediction route (default: 5).
    pub per_minute: u32,
    /// Admissions per rolling day across the client (default: 500).
    pub per_day: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            per_minute: 5,
            per_day: 500,
        }
    }
}

/// Token bucket for a single budget.
#[derive(Debug)]
struct TokenBucket {
    /// Current number of available tokens.
    tokens: f64,
    /// Last time the bucket was updated.
    last_update: Instant,
    /// Token refill rate (tokens per second).
    rate: f64,
    /// Maximum bucket capacity.
    capacity: f64,
}

impl TokenBucket {
    fn new(budget: u32, window_seconds: f64) -> Self {
        let capacity = budget as f64;
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: capacity / window_seconds,
            capacity,
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn has_token(&self) -> bool {
        self.tokens >= 1.0
    }

    fn take(&mut self) {
        self.tokens -= 1.0;
    }
}

/// Per-client budget pair.
#[derive(Debug)]
struct ClientBudgets {
    minute: TokenBucket,
    day: TokenBucket,
}

impl ClientBudgets {
    fn new(policy: &RateLimitPolicy) -> Self {
        Self {
            minute: TokenBucket::new(policy.per_minute, SECONDS_PER_MINUTE),
            day: TokenBucket::new(policy.per_day, SECONDS_PER_DAY),
        }
    }
}

/// Thread-safe admission gate for the prediction route.
///
/// Buckets are created on demand per client identity; counters are
/// process-scoped and reset on restart.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    clients: Mutex<HashMap<String, ClientBudgets>>,
}

impl RateLimiter {
    /// Create a rate limiter with the given budgets.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the clients mutex, recovering from poison if necessary.
    ///
    /// Worst case after recovery is slightly incorrect rate limiting, which
    /// beats panicking the request path.
    fn lock_clients(&self) -> MutexGuard<'_, HashMap<String, ClientBudgets>> {
        self.clients.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Admit or reject one request for the given client identity.
    ///
    /// Both budgets must have capacity; on rejection neither is consumed.
    pub fn try_admit(&self, client: &str) -> Result<(), RateLimitExceeded> {
        let mut clients = self.lock_clients();
        let budgets = clients
            .entry(client.to_string())
            .or_insert_with(|| ClientBudgets::new(&self.policy));

        budgets.minute.refill();
        budgets.day.refill();

        if !budgets.minute.has_token() {
            return Err(RateLimitExceeded {
                scope: LimitScope::PerMinute,
                client: client.to_string(),
            });
        }
        if !budgets.day.has_token() {
            return Err(RateLimitExceeded {
                scope: LimitScope::PerDay,
                client: client.to_string(),
            });
        }

        budgets.minute.take();
        budgets.day.take();
        debug!("Rate limiter: admitted client '{}'", client);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}
