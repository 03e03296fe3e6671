//! Pricecast Forecast Crate
//!
//! Interchangeable regression strategies for single-point price forecasting,
//! plus the closed algorithm registry that resolves a wire-level algorithm
//! tag to a strategy instance.
//!
//! Each strategy fits `target = f(feature)` over scalar features (ordinal
//! day numbers upstream) and predicts one scalar for a future feature value.
//! Models are ephemeral: fitted per request, never cached or shared.

pub mod error;
pub mod registry;
pub mod strategy;

pub use error::ForecastError;
pub use registry::{resolve, Algorithm};
pub use strategy::ForecastStrategy;
