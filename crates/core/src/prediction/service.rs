//! The fetch-cache-train-predict orchestration.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error};

use pricecast_forecast::registry;
use pricecast_market_data::{QuoteCache, QuoteFeed, QuoteSeries};

use crate::errors::Result;
use crate::prediction::model::{PredictionRequest, PredictionResult};
use crate::prediction::series::{ordinal_day, SeriesBuilder};

/// Freshness window for cached intraday series.
pub const QUOTE_CACHE_TTL: Duration = Duration::from_secs(600);

/// Orchestrates one prediction per request.
///
/// The cache and feed are process-scoped stores injected at construction;
/// the fitted model is scoped to a single request and discarded with the
/// response. A provider failure is terminal for the request - nothing here
/// retries.
pub struct PredictionService {
    cache: Arc<QuoteCache>,
    feed: Arc<dyn QuoteFeed>,
}

impl PredictionService {
    pub fn new(cache: Arc<QuoteCache>, feed: Arc<dyn QuoteFeed>) -> Self {
        Self { cache, feed }
    }

    /// Predict tomorrow's closing price for the requested symbol.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        self.predict_at(request, Utc::now()).await
    }

    /// Predict with an explicit invocation instant.
    ///
    /// The forecast horizon is always the calendar day after `now`,
    /// regardless of how recent the newest cached observation is.
    pub(crate) async fn predict_at(
        &self,
        request: &PredictionRequest,
        now: DateTime<Utc>,
    ) -> Result<PredictionResult> {
        let series = self.fetch_series(&request.symbol).await?;

        let sample = SeriesBuilder::build(series.quotes()).map_err(|e| {
            error!(
                "Series build failed for {} ({}): {}",
                request.symbol, request.algorithm, e
            );
            e
        })?;

        let mut strategy = registry::resolve(request.algorithm);

        strategy.fit(&sample.features, &sample.targets).map_err(|e| {
            error!(
                "Training failed for {} ({}): {}",
                request.symbol, request.algorithm, e
            );
            e
        })?;
        debug!(
            "Trained {} on {} observations for {}",
            request.algorithm,
            sample.targets.len(),
            request.symbol
        );

        let horizon = ordinal_day(now + chrono::Duration::days(1)) as f64;
        let value = strategy.predict(horizon).map_err(|e| {
            error!(
                "Prediction failed for {} ({}): {}",
                request.symbol, request.algorithm, e
            );
            e
        })?;

        debug!(
            "Forecast for {} ({}): {}",
            request.symbol, request.algorithm, value
        );
        Ok(PredictionResult { prediction: value })
    }

    /// Return the cached series for a symbol, fetching upstream on a miss.
    ///
    /// Only a successful fetch is cached; provider failures leave the cache
    /// untouched and stop the request.
    async fn fetch_series(&self, symbol: &str) -> Result<QuoteSeries> {
        let key = Self::cache_key(symbol);

        if let Some(series) = self.cache.get(&key) {
            debug!("Using cached series for {}", symbol);
            return Ok(series);
        }

        let series = self.feed.intraday_series(symbol).await.map_err(|e| {
            error!("Quote fetch failed for {}: {}", symbol, e);
            e
        })?;

        self.cache.set(&key, series.clone(), QUOTE_CACHE_TTL);
        Ok(series)
    }

    pub(crate) fn cache_key(symbol: &str) -> String {
        format!("intraday:{}", symbol)
    }
}
