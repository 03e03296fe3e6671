use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use pricecast_core::{PredictionService, RateLimiter};
use pricecast_market_data::{AlphaVantageProvider, QuoteCache};

use crate::config::Config;

/// Process-scoped state shared by all requests.
///
/// The quote cache lives inside the prediction service; the rate limiter is
/// consulted by handlers before the pipeline runs. Neither survives a
/// restart.
pub struct AppState {
    pub prediction_service: Arc<PredictionService>,
    pub rate_limiter: Arc<RateLimiter>,
}

pub fn init_tracing() {
    let log_format =
        std::env::var("PRICECAST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    if config.alpha_vantage_api_key.is_none() {
        tracing::warn!(
            "ALPHA_VANTAGE_API_KEY is not set; predictions will fail until it is provided"
        );
    }

    let cache = Arc::new(QuoteCache::new());
    let feed = Arc::new(AlphaVantageProvider::new(
        config.alpha_vantage_api_key.clone(),
    ));
    let prediction_service = Arc::new(PredictionService::new(cache, feed));
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));

    Arc::new(AppState {
        prediction_service,
        rate_limiter,
    })
}
