//! Ordinary least squares regression.
//!
//! Fits `target = intercept + slope * feature`. The intraday feed collapses
//! every bar of a trading day onto one ordinal-day feature value, so the
//! zero-variance case (a series spanning a single day) is common; it
//! degenerates to the minimum-norm solution, a flat line through the mean,
//! rather than an error.

use crate::error::Result;
use crate::strategy::{check_training_input, ForecastStrategy};
use crate::ForecastError;

/// Ordinary least squares line through (feature, target) pairs.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    intercept: f64,
    slope: f64,
    fitted: bool,
}

impl LinearRegression {
    /// Create a new, unfitted model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slope of the fitted line (price change per feature unit).
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Intercept of the fitted line.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl ForecastStrategy for LinearRegression {
    fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<()> {
        check_training_input(features, targets)?;

        let n = features.len() as f64;
        let mean_x: f64 = features.iter().sum::<f64>() / n;
        let mean_y: f64 = targets.iter().sum::<f64>() / n;

        let ss_xx: f64 = features.iter().map(|x| (x - mean_x).powi(2)).sum();
        let ss_xy: f64 = features
            .iter()
            .zip(targets.iter())
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        if ss_xx.abs() < 1e-10 {
            // All features identical: minimum-norm least squares solution
            self.slope = 0.0;
            self.intercept = mean_y;
        } else {
            self.slope = ss_xy / ss_xx;
            self.intercept = mean_y - self.slope * mean_x;
        }

        if !self.slope.is_finite() || !self.intercept.is_finite() {
            return Err(ForecastError::Training(
                "least squares solution is not finite".to_string(),
            ));
        }

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, feature: f64) -> Result<f64> {
        if !self.fitted {
            return Err(ForecastError::Prediction("model not fitted".to_string()));
        }
        Ok(self.intercept + self.slope * feature)
    }

    fn name(&self) -> &'static str {
        "linear_regression"
    }
}
