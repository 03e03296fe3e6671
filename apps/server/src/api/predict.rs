use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use pricecast_core::{Algorithm, PredictionRequest, PredictionResult};

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
struct PredictParams {
    symbol: Option<String>,
    algorithm: Option<String>,
}

/// Predict tomorrow's closing price for a symbol.
///
/// Admission control runs first: a rate-limited client is rejected before
/// validation, cache access, or any upstream call.
async fn get_prediction(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(params): Query<PredictParams>,
) -> ApiResult<Json<PredictionResult>> {
    state.rate_limiter.try_admit(&addr.ip().to_string())?;

    let symbol = params.symbol.as_deref().unwrap_or_default();
    let algorithm = params
        .algorithm
        .as_deref()
        .unwrap_or(Algorithm::LinearRegression.as_str());

    let request = PredictionRequest::new(symbol, algorithm)?;
    tracing::debug!(
        symbol = %request.symbol,
        algorithm = %request.algorithm,
        client = %addr.ip(),
        "received prediction request"
    );

    let result = state.prediction_service.predict(&request).await?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/predict", get(get_prediction))
}
