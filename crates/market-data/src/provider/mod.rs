//! Quote provider implementations.

pub mod alpha_vantage;
mod traits;

pub use traits::QuoteFeed;
