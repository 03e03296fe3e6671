//! Feature/target extraction from an intraday quote series.
//!
//! The sole regression feature is the observation's ordinal day number: the
//! count of days since the proleptic-Gregorian epoch (0001-01-01 is day 1).
//! Every bar of a trading day collapses onto the same feature value, so the
//! fitted relationship is date-vs-close, not time-of-day-vs-close.

use chrono::{DateTime, Datelike, Utc};
use num_traits::ToPrimitive;

use pricecast_market_data::Quote;

use crate::errors::{PredictionError, Result};

/// Parallel feature/target vectors ready for model fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTargetSeries {
    /// Ordinal day number per observation.
    pub features: Vec<f64>,
    /// Closing price per observation.
    pub targets: Vec<f64>,
}

/// Ordinal day number of a timestamp's calendar date.
pub fn ordinal_day(timestamp: DateTime<Utc>) -> i32 {
    timestamp.date_naive().num_days_from_ce()
}

/// Converts raw quotes into an ordered feature/target series.
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Build the training sample from quotes in arbitrary order.
    ///
    /// Sorts ascending by timestamp; input order is not trusted. Fails with
    /// [`PredictionError::InsufficientData`] when there is nothing to fit.
    pub fn build(quotes: &[Quote]) -> Result<FeatureTargetSeries> {
        if quotes.is_empty() {
            return Err(PredictionError::InsufficientData);
        }

        let mut observations: Vec<&Quote> = quotes.iter().collect();
        observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let features = observations
            .iter()
            .map(|q| ordinal_day(q.timestamp) as f64)
            .collect();
        let targets = observations
            .iter()
            .map(|q| q.close.to_f64().unwrap_or(0.0))
            .collect();

        Ok(FeatureTargetSeries { features, targets })
    }
}
