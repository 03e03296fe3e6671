use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single intraday price observation.
///
/// All fields are required: the intraday feed always reports full OHLCV bars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Timestamp of the bar
    pub timestamp: DateTime<Utc>,

    /// Opening price
    pub open: Decimal,

    /// High price
    pub high: Decimal,

    /// Low price
    pub low: Decimal,

    /// Closing price
    pub close: Decimal,

    /// Trading volume
    pub volume: Decimal,
}

impl Quote {
    /// Create a full OHLCV quote.
    pub fn ohlcv(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// An ordered intraday series.
///
/// Construction sorts ascending by timestamp and drops duplicate timestamps,
/// so timestamps are strictly increasing in every series handed out by this
/// crate. A series may be empty; emptiness is the caller's concern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    quotes: Vec<Quote>,
}

impl QuoteSeries {
    /// Build a series from quotes in arbitrary order.
    pub fn from_quotes(mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        quotes.dedup_by(|a, b| a.timestamp == b.timestamp);
        Self { quotes }
    }

    /// The ordered observations.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
