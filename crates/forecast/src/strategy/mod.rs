//! Forecast strategy trait and implementations.

pub mod forest;
pub mod linear;
pub mod svr;

use crate::error::Result;

/// A fit/predict capability pair implementing one regression algorithm.
///
/// Strategies are single-use: a fresh instance is fitted per request and
/// discarded with the response.
pub trait ForecastStrategy: Send {
    /// Fit the strategy to parallel feature/target slices.
    ///
    /// Fails with [`ForecastError::Training`](crate::ForecastError::Training)
    /// on empty or mismatched input, or when the solver cannot produce a
    /// usable model.
    fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<()>;

    /// Forecast the target for a single future feature value.
    ///
    /// Fails with
    /// [`ForecastError::Prediction`](crate::ForecastError::Prediction) when
    /// called before a successful fit.
    fn predict(&self, feature: f64) -> Result<f64>;

    /// The wire-level name of this strategy.
    fn name(&self) -> &'static str;
}

/// Shared input validation for `fit` implementations.
pub(crate) fn check_training_input(features: &[f64], targets: &[f64]) -> Result<()> {
    use crate::error::ForecastError;

    if features.is_empty() {
        return Err(ForecastError::Training("empty training input".to_string()));
    }
    if features.len() != targets.len() {
        return Err(ForecastError::Training(format!(
            "feature/target length mismatch: {} vs {}",
            features.len(),
            targets.len()
        )));
    }
    if features.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
        return Err(ForecastError::Training(
            "non-finite value in training input".to_string(),
        ));
    }
    Ok(())
}
