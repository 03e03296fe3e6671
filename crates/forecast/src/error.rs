//! Error types for forecast strategies.

use thiserror::Error;

/// Type alias for Result using [`ForecastError`].
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while resolving, fitting, or applying a strategy.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The algorithm tag is not in the closed set.
    /// Rejected before any data is fetched or fitted.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Model fitting failed (degenerate input, non-convergence).
    /// Terminal for the request, never fatal to the process.
    #[error("Model training failed: {0}")]
    Training(String),

    /// The fitted model could not produce a forecast.
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ForecastError::UnknownAlgorithm("quantum".to_string());
        assert_eq!(format!("{}", error), "Unknown algorithm: quantum");

        let error = ForecastError::Training("empty input".to_string());
        assert_eq!(format!("{}", error), "Model training failed: empty input");
    }
}
