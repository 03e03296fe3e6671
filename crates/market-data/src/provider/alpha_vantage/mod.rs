//! Alpha Vantage intraday quote provider.
//!
//! Fetches 5-minute intraday bars via the TIME_SERIES_INTRADAY endpoint.
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute, and
//! some intraday parameters are premium-only; the provider classifies the
//! premium notice into its own error variant.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{Quote, QuoteSeries};
use crate::provider::QuoteFeed;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const INTERVAL: &str = "5min";

/// Alpha Vantage intraday market data provider.
///
/// Holds an optional API key; a provider without a key reports
/// [`ProviderError::MissingCredential`] before touching the network, so a
/// misconfigured deployment fails deterministically rather than as a parse
/// error downstream.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: Option<String>,
}

// ============================================================================
// Response structures for the Alpha Vantage API
// ============================================================================

/// TIME_SERIES_INTRADAY response envelope.
#[derive(Debug, Deserialize)]
struct IntradayResponse {
    #[serde(rename = "Time Series (5min)")]
    time_series: Option<HashMap<String, IntradayBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IntradayBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider.
    ///
    /// `api_key` is `None` when the credential is absent from configuration;
    /// the provider still constructs so cached data keeps flowing, but every
    /// fetch reports the missing credential.
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential {
                provider: PROVIDER_ID.to_string(),
            })?;

        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", api_key));

        let url = reqwest::Url::parse_with_params(BASE_URL, &all_params).map_err(|e| {
            ProviderError::Transport {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(api_key, "***")
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                ProviderError::Transport {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Transport {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    /// Classify and parse a TIME_SERIES_INTRADAY response body.
    fn parse_intraday(symbol: &str, body: &str) -> Result<QuoteSeries, ProviderError> {
        let response: IntradayResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        // The premium notice arrives as an "Information" field, not an error
        if let Some(ref info) = response.information {
            if info.to_lowercase().contains("premium") {
                return Err(ProviderError::PremiumRequired {
                    provider: PROVIDER_ID.to_string(),
                });
            }
        }

        if let Some(ref msg) = response.note {
            warn!("Alpha Vantage note for {}: {}", symbol, msg);
        }

        let time_series = match response.time_series {
            Some(series) => series,
            None => {
                let detail = response
                    .error_message
                    .or(response.information)
                    .or(response.note)
                    .unwrap_or_else(|| "time series field absent".to_string());
                return Err(ProviderError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: detail,
                });
            }
        };

        let quotes: Vec<Quote> = time_series
            .into_iter()
            .filter_map(|(timestamp_str, bar)| {
                let timestamp = Self::parse_timestamp(&timestamp_str)?;
                let open = Self::parse_decimal(&bar.open)?;
                let high = Self::parse_decimal(&bar.high)?;
                let low = Self::parse_decimal(&bar.low)?;
                let close = Self::parse_decimal(&bar.close)?;
                let volume = Self::parse_decimal(&bar.volume)?;

                Some(Quote::ohlcv(timestamp, open, high, low, close, volume))
            })
            .collect();

        debug!(
            "Alpha Vantage: fetched {} intraday bars for {}",
            quotes.len(),
            symbol
        );

        Ok(QuoteSeries::from_quotes(quotes))
    }

    /// Parse a timestamp string in "YYYY-MM-DD HH:MM:SS" format to DateTime<Utc>.
    fn parse_timestamp(timestamp_str: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%d %H:%M:%S")
            .ok()
            .and_then(|dt| Utc.from_local_datetime(&dt).single())
    }

    /// Parse a decimal value from a string.
    fn parse_decimal(s: &str) -> Option<Decimal> {
        Decimal::from_str(s).ok()
    }
}

// ============================================================================
// QuoteFeed trait implementation
// ============================================================================

#[async_trait]
impl QuoteFeed for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn intraday_series(&self, symbol: &str) -> Result<QuoteSeries, ProviderError> {
        let params = [
            ("function", "TIME_SERIES_INTRADAY"),
            ("symbol", symbol),
            ("interval", INTERVAL),
        ];

        let body = self.fetch(&params).await?;
        Self::parse_intraday(symbol, &body)
    }
}
