//! Tests for the prediction pipeline contract.
//!
//! A mock quote feed with a call counter stands in for the upstream
//! provider, so cache idempotence, freshness, and failure classification
//! are all observable without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pricecast_forecast::Algorithm;
use pricecast_market_data::{ProviderError, Quote, QuoteCache, QuoteFeed, QuoteSeries};

use crate::errors::PredictionError;
use crate::prediction::model::PredictionRequest;
use crate::prediction::series::ordinal_day;
use crate::prediction::service::PredictionService;

// =========================================================================
// Mock QuoteFeed
// =========================================================================

enum MockResponse {
    Series(QuoteSeries),
    Premium,
    Malformed,
}

struct MockFeed {
    calls: AtomicUsize,
    response: MockResponse,
}

impl MockFeed {
    fn with_series(series: QuoteSeries) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: MockResponse::Series(series),
        }
    }

    fn failing(response: MockResponse) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteFeed for MockFeed {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn intraday_series(&self, _symbol: &str) -> Result<QuoteSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            MockResponse::Series(series) => Ok(series.clone()),
            MockResponse::Premium => Err(ProviderError::PremiumRequired {
                provider: "MOCK".to_string(),
            }),
            MockResponse::Malformed => Err(ProviderError::MalformedResponse {
                provider: "MOCK".to_string(),
                message: "time series field absent".to_string(),
            }),
        }
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn daily_close_quote(day: u32, close: Decimal) -> Quote {
    Quote::ohlcv(
        Utc.with_ymd_and_hms(2024, 3, day, 19, 55, 0).unwrap(),
        close,
        close,
        close,
        close,
        dec!(1000),
    )
}

/// Closes 100..=103 over four consecutive days.
fn rising_series() -> QuoteSeries {
    QuoteSeries::from_quotes(vec![
        daily_close_quote(1, dec!(100)),
        daily_close_quote(2, dec!(101)),
        daily_close_quote(3, dec!(102)),
        daily_close_quote(4, dec!(103)),
    ])
}

fn service_with(feed: Arc<MockFeed>) -> (PredictionService, Arc<QuoteCache>) {
    let cache = Arc::new(QuoteCache::new());
    (PredictionService::new(cache.clone(), feed), cache)
}

/// Independent ordinary least squares fit, for cross-checking the pipeline.
fn ols_extrapolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let ss_xx: f64 = xs.iter().map(|v| (v - mean_x).powi(2)).sum();
    let ss_xy: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum();
    let slope = ss_xy / ss_xx;
    mean_y + slope * (x - mean_x)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_linear_prediction_matches_independent_ols() {
    let feed = Arc::new(MockFeed::with_series(rising_series()));
    let (service, _) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap();
    let result = service.predict_at(&request, now).await.unwrap();

    let xs: Vec<f64> = (1..=4)
        .map(|day| {
            ordinal_day(Utc.with_ymd_and_hms(2024, 3, day, 19, 55, 0).unwrap()) as f64
        })
        .collect();
    let ys = vec![100.0, 101.0, 102.0, 103.0];
    let tomorrow = ordinal_day(Utc.with_ymd_and_hms(2024, 3, 5, 21, 0, 0).unwrap()) as f64;
    let expected = ols_extrapolate(&xs, &ys, tomorrow);

    assert!(result.prediction.is_finite());
    assert!(
        (result.prediction - expected).abs() < 1e-6,
        "pipeline {} vs independent fit {}",
        result.prediction,
        expected
    );
    // One point per day, unit slope: tomorrow extends the line to 104
    assert!((result.prediction - 104.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_cache_idempotence_single_upstream_fetch() {
    let feed = Arc::new(MockFeed::with_series(rising_series()));
    let (service, _) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap();

    let first = service.predict_at(&request, now).await.unwrap();
    let second = service.predict_at(&request, now).await.unwrap();

    assert_eq!(feed.call_count(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_expired_cache_entry_triggers_refetch() {
    let feed = Arc::new(MockFeed::with_series(rising_series()));
    let (service, cache) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap();

    service.predict_at(&request, now).await.unwrap();
    assert_eq!(feed.call_count(), 1);

    // Replace the entry with one whose freshness window has already elapsed
    cache.set(
        &PredictionService::cache_key("IBM"),
        rising_series(),
        Duration::ZERO,
    );

    service.predict_at(&request, now).await.unwrap();
    assert_eq!(feed.call_count(), 2);
}

#[tokio::test]
async fn test_symbols_cache_independently() {
    let feed = Arc::new(MockFeed::with_series(rising_series()));
    let (service, _) = service_with(feed.clone());

    let now = Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap();
    let ibm = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let aapl = PredictionRequest::new("AAPL", "linear_regression").unwrap();

    service.predict_at(&ibm, now).await.unwrap();
    service.predict_at(&aapl, now).await.unwrap();

    assert_eq!(feed.call_count(), 2);
}

#[tokio::test]
async fn test_premium_failure_writes_no_cache() {
    let feed = Arc::new(MockFeed::failing(MockResponse::Premium));
    let (service, cache) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let err = service.predict(&request).await.unwrap_err();

    assert!(matches!(err, PredictionError::UpstreamPremiumRequired));
    assert!(cache.get(&PredictionService::cache_key("IBM")).is_none());
    assert_eq!(feed.call_count(), 1);
}

#[tokio::test]
async fn test_malformed_failure_writes_no_cache() {
    let feed = Arc::new(MockFeed::failing(MockResponse::Malformed));
    let (service, cache) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let err = service.predict(&request).await.unwrap_err();

    assert!(matches!(err, PredictionError::UpstreamMalformed(_)));
    assert!(cache.get(&PredictionService::cache_key("IBM")).is_none());
}

#[tokio::test]
async fn test_provider_failure_is_not_retried() {
    let feed = Arc::new(MockFeed::failing(MockResponse::Premium));
    let (service, _) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    service.predict(&request).await.unwrap_err();

    assert_eq!(feed.call_count(), 1);
}

#[tokio::test]
async fn test_empty_series_is_insufficient_data() {
    let feed = Arc::new(MockFeed::with_series(QuoteSeries::from_quotes(Vec::new())));
    let (service, _) = service_with(feed.clone());

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let err = service.predict(&request).await.unwrap_err();

    assert!(matches!(err, PredictionError::InsufficientData));
}

#[tokio::test]
async fn test_every_algorithm_produces_a_finite_forecast() {
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap();

    for algorithm in [Algorithm::LinearRegression, Algorithm::Svm, Algorithm::RandomForest] {
        let feed = Arc::new(MockFeed::with_series(rising_series()));
        let (service, _) = service_with(feed);

        let request = PredictionRequest::new("IBM", algorithm.as_str()).unwrap();
        let result = service.predict_at(&request, now).await.unwrap();

        assert!(
            result.prediction.is_finite(),
            "{} produced a non-finite forecast",
            algorithm
        );
    }
}

#[tokio::test]
async fn test_single_day_series_trains_successfully() {
    // Four 5-minute bars all on one calendar day: the feature collapses to
    // one value and linear regression falls back to the mean close
    let series = QuoteSeries::from_quotes(
        (0..4)
            .map(|i| {
                Quote::ohlcv(
                    Utc.with_ymd_and_hms(2024, 3, 4, 19, 5 * i, 0).unwrap(),
                    dec!(100),
                    dec!(104),
                    dec!(99),
                    Decimal::from(100 + i),
                    dec!(1000),
                )
            })
            .collect(),
    );
    let feed = Arc::new(MockFeed::with_series(series));
    let (service, _) = service_with(feed);

    let request = PredictionRequest::new("IBM", "linear_regression").unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 0).unwrap();
    let result = service.predict_at(&request, now).await.unwrap();

    assert!((result.prediction - 101.5).abs() < 1e-9);
}
