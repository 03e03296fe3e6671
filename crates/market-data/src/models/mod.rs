//! Domain models for intraday market data.

mod quote;

pub use quote::{Quote, QuoteSeries};
