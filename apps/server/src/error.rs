//! HTTP error mapping.
//!
//! Exactly one status code per pipeline error kind, and one JSON body shape
//! (`{"error": <message>}`) for every failure. Messages are the display
//! strings of the typed errors; internal representations and credentials
//! never reach the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use pricecast_core::{PredictionError, RateLimitExceeded};

pub type ApiResult<T> = Result<T, ApiError>;

/// A response-ready error: status plus user-visible message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        let status = match &err {
            PredictionError::InvalidRequest(_)
            | PredictionError::UnknownAlgorithm(_)
            | PredictionError::UpstreamMalformed(_) => StatusCode::BAD_REQUEST,
            PredictionError::UpstreamPremiumRequired => StatusCode::FORBIDDEN,
            PredictionError::UpstreamUnavailable(_)
            | PredictionError::InsufficientData
            | PredictionError::TrainingFailed(_)
            | PredictionError::PredictionFailed(_)
            | PredictionError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<RateLimitExceeded> for ApiError {
    fn from(err: RateLimitExceeded) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_core::LimitScope;

    #[test]
    fn test_client_errors_map_to_400() {
        for err in [
            PredictionError::InvalidRequest("Symbol parameter is required".to_string()),
            PredictionError::UnknownAlgorithm("quantum".to_string()),
            PredictionError::UpstreamMalformed("time series field absent".to_string()),
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_premium_maps_to_403() {
        let err = ApiError::from(PredictionError::UpstreamPremiumRequired);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_errors_map_to_500() {
        for err in [
            PredictionError::UpstreamUnavailable("HTTP 503".to_string()),
            PredictionError::InsufficientData,
            PredictionError::TrainingFailed("degenerate".to_string()),
            PredictionError::PredictionFailed("not fitted".to_string()),
            PredictionError::Configuration("credential missing".to_string()),
        ] {
            assert_eq!(
                ApiError::from(err).status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        let err = ApiError::from(RateLimitExceeded {
            scope: LimitScope::PerMinute,
            client: "203.0.113.7".to_string(),
        });
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
