//! Quote feed trait definition.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::QuoteSeries;

/// Trait for upstream intraday quote sources.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry; a failure is reported to the caller as a [`ProviderError`] variant
/// and the caller decides what to do with it.
#[async_trait]
pub trait QuoteFeed: Send + Sync {
    /// Unique identifier for this feed.
    ///
    /// Should be a constant string like "ALPHA_VANTAGE".
    /// Used for logging and error context.
    fn id(&self) -> &'static str;

    /// Fetch the recent 5-minute intraday series for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The ticker symbol, e.g. "AAPL"
    ///
    /// # Returns
    ///
    /// A series ordered ascending by timestamp, or a [`ProviderError`]
    /// classifying the failure.
    async fn intraday_series(&self, symbol: &str) -> Result<QuoteSeries, ProviderError>;
}
