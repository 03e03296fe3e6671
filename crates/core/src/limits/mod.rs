//! Admission control for the prediction route.

mod rate_limiter;

pub use rate_limiter::{LimitScope, RateLimitExceeded, RateLimitPolicy, RateLimiter};
