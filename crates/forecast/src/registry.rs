//! Closed algorithm registry.
//!
//! Maps a wire-level algorithm tag onto a forecast strategy. The set is
//! closed: adding a strategy means adding a variant here, and nothing in the
//! pipeline's control flow has to change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::strategy::forest::RandomForestRegressor;
use crate::strategy::linear::LinearRegression;
use crate::strategy::svr::SvrRegressor;
use crate::strategy::ForecastStrategy;

/// The closed set of supported forecasting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Ordinary least squares over (ordinal day, close).
    #[default]
    LinearRegression,
    /// Support-vector regression with default kernel and hyperparameters.
    Svm,
    /// Ensemble regression with default tree count.
    RandomForest,
}

impl Algorithm {
    /// The wire-level tag for this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::LinearRegression => "linear_regression",
            Algorithm::Svm => "svm",
            Algorithm::RandomForest => "random_forest",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear_regression" => Ok(Algorithm::LinearRegression),
            "svm" => Ok(Algorithm::Svm),
            "random_forest" => Ok(Algorithm::RandomForest),
            other => Err(ForecastError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Resolve an algorithm tag to a fresh, unfitted strategy.
///
/// Every call returns a new instance; fitted state never leaks between
/// requests.
pub fn resolve(algorithm: Algorithm) -> Box<dyn ForecastStrategy> {
    match algorithm {
        Algorithm::LinearRegression => Box::new(LinearRegression::new()),
        Algorithm::Svm => Box::new(SvrRegressor::new()),
        Algorithm::RandomForest => Box::new(RandomForestRegressor::new()),
    }
}
