//! Error types for the market data crate.
//!
//! Every upstream outcome a provider can observe is mapped onto exactly one
//! [`ProviderError`] variant. Callers decide policy; none of these errors is
//! retried inside this crate.

use thiserror::Error;

/// Errors that can occur while fetching quote data from a provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The upstream signalled that the requested data needs a paid tier.
    /// Terminal for the request - retrying with the same key won't help.
    #[error("Premium subscription required: {provider}")]
    PremiumRequired {
        /// The provider that refused the request
        provider: String,
    },

    /// The response parsed, but the expected series field was absent.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the response
        provider: String,
        /// What was missing or unreadable, including any upstream notes
        message: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A network failure or non-success HTTP status.
    #[error("Transport failure: {provider} - {message}")]
    Transport {
        /// The provider being called
        provider: String,
        /// The transport-level detail
        message: String,
    },

    /// The provider was constructed without a credential.
    /// Detected before any network call is made.
    #[error("Missing credential for provider: {provider}")]
    MissingCredential {
        /// The provider lacking a credential
        provider: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ProviderError::PremiumRequired {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Premium subscription required: ALPHA_VANTAGE"
        );

        let error = ProviderError::MalformedResponse {
            provider: "ALPHA_VANTAGE".to_string(),
            message: "time series field absent".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Malformed response from ALPHA_VANTAGE: time series field absent"
        );

        let error = ProviderError::MissingCredential {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Missing credential for provider: ALPHA_VANTAGE"
        );
    }
}
