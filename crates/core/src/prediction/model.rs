//! Request and result types for the prediction pipeline.

use std::str::FromStr;

use serde::Serialize;

use pricecast_forecast::Algorithm;

use crate::errors::{PredictionError, Result};

/// A validated prediction request.
///
/// Construction is the validation boundary: an empty symbol or an algorithm
/// tag outside the closed set is rejected here, before any cache access or
/// upstream call happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    /// Ticker symbol, non-empty.
    pub symbol: String,
    /// The forecasting algorithm to fit.
    pub algorithm: Algorithm,
}

impl PredictionRequest {
    /// Validate raw request input.
    pub fn new(symbol: &str, algorithm: &str) -> Result<Self> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(PredictionError::InvalidRequest(
                "Symbol parameter is required".to_string(),
            ));
        }

        let algorithm = Algorithm::from_str(algorithm)?;

        Ok(Self {
            symbol: symbol.to_string(),
            algorithm,
        })
    }
}

/// A single next-day point forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Forecast closing price for tomorrow relative to the invocation instant.
    pub prediction: f64,
}
