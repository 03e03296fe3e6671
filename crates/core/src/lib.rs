//! Pricecast Core Crate
//!
//! The prediction pipeline and its admission control:
//!
//! - [`prediction`] - the fetch-cache-train-predict pipeline
//! - [`limits`] - per-client rate limiting applied before the pipeline
//! - [`errors`] - the pipeline-level error taxonomy
//!
//! The pipeline owns no ambient state: the quote cache and quote feed are
//! injected at construction, and the rate limiter is a separate
//! process-scoped store the HTTP layer consults before invoking the
//! pipeline. Neither survives a process restart.

pub mod errors;
pub mod limits;
pub mod prediction;

pub use errors::{PredictionError, Result};
pub use limits::{LimitScope, RateLimitExceeded, RateLimitPolicy, RateLimiter};
pub use prediction::{PredictionRequest, PredictionResult, PredictionService};

// Re-export the algorithm tag for API layers
pub use pricecast_forecast::Algorithm;
