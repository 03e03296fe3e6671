//! Pipeline-level error taxonomy.
//!
//! Every stage of the prediction pipeline returns a typed outcome; provider
//! and forecast errors are folded into [`PredictionError`] here so the
//! pipeline body stays `?`-driven and the HTTP layer maps each variant onto
//! exactly one status code. Nothing in this module is retried - a failure at
//! any stage is terminal for the request.

use thiserror::Error;

use pricecast_forecast::ForecastError;
use pricecast_market_data::ProviderError;

/// Type alias for Result using [`PredictionError`].
pub type Result<T> = std::result::Result<T, PredictionError>;

/// Errors surfaced by the prediction pipeline.
#[derive(Error, Debug)]
pub enum PredictionError {
    /// The client request failed validation (missing/empty symbol).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream provider requires a paid tier for this data.
    #[error("Upstream data requires a premium subscription")]
    UpstreamPremiumRequired,

    /// The upstream response lacked the expected series payload.
    #[error("Upstream response malformed: {0}")]
    UpstreamMalformed(String),

    /// The upstream provider could not be reached or answered non-2xx.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The fetched series contained no observations.
    #[error("No observations available to fit a model")]
    InsufficientData,

    /// The algorithm tag is outside the closed set.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Model fitting failed.
    #[error("Model training failed: {0}")]
    TrainingFailed(String),

    /// The fitted model could not produce a forecast.
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// A required credential or setting is absent.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<ProviderError> for PredictionError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        match err {
            ProviderError::PremiumRequired { .. } => Self::UpstreamPremiumRequired,
            ProviderError::MalformedResponse { .. } => Self::UpstreamMalformed(message),
            ProviderError::Timeout { .. } | ProviderError::Transport { .. } => {
                Self::UpstreamUnavailable(message)
            }
            ProviderError::MissingCredential { .. } => Self::Configuration(message),
        }
    }
}

impl From<ForecastError> for PredictionError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::UnknownAlgorithm(tag) => Self::UnknownAlgorithm(tag),
            ForecastError::Training(message) => Self::TrainingFailed(message),
            ForecastError::Prediction(message) => Self::PredictionFailed(message),
        }
    }
}
