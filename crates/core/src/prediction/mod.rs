//! The prediction pipeline.
//!
//! - [`model`] - validated request and result types
//! - [`series`] - feature/target extraction from quote series
//! - [`service`] - the fetch-cache-train-predict orchestration
//!
//! The pipeline is the only component with cross-cutting control flow; the
//! cache, feed, and strategies it touches are each single-purpose and
//! injected at construction.

pub mod model;
pub mod series;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use model::{PredictionRequest, PredictionResult};
pub use service::{PredictionService, QUOTE_CACHE_TTL};
