//! Request handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use bond_yield_core::{analyze_bond, BondCalculationRequest, BondCalculationResult, SolverConfig};

/// Application state.
pub struct AppState {
    /// YTM solver settings applied to every calculation
    pub solver: SolverConfig,
}

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Body of every 400 response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadRequestResponse {
    #[schema(example = 400)]
    status_code: u16,
    /// One entry per rejected field.
    message: Vec<String>,
    #[schema(example = "Bad Request")]
    error: String,
}

impl BadRequestResponse {
    fn new(message: Vec<String>) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            message,
            error: "Bad Request".to_string(),
        }
    }
}

impl IntoResponse for BadRequestResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Calculate yields, classification and cash flows for one bond.
///
/// Returns 201 with the result, or 400 listing every rejected field. Bodies
/// that are not JSON objects are also answered with 400.
#[utoipa::path(
    post,
    path = "/api/v1/bond/calculate",
    tag = "Bond",
    request_body = BondCalculationRequest,
    responses(
        (status = 201, description = "Bond calculation completed", body = BondCalculationResult),
        (status = 400, description = "Invalid or missing bond parameters", body = BadRequestResponse)
    )
)]
pub async fn calculate_bond(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BondCalculationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            info!(error = %rejection.body_text(), "Rejected unreadable bond request");
            return BadRequestResponse::new(vec![rejection.body_text()]).into_response();
        }
    };

    let params = match request.validate() {
        Ok(params) => params,
        Err(errors) => {
            info!(errors = %errors, "Rejected invalid bond request");
            return BadRequestResponse::new(errors.messages()).into_response();
        }
    };

    let output = analyze_bond(&params, &state.solver);
    for warning in &output.warnings {
        warn!(face_value = %params.face_value, market_price = %params.market_price, "{}", warning);
    }

    debug!(
        face_value = %params.face_value,
        coupon_rate = %params.coupon_rate,
        market_price = %params.market_price,
        years_to_maturity = params.years_to_maturity,
        coupon_frequency = %params.coupon_frequency,
        ytm = %output.result.yield_to_maturity,
        status = %output.result.bond_status,
        elapsed_us = output.metadata.computation_time_us,
        "Bond calculated"
    );

    (StatusCode::CREATED, Json(output.result)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_body_shape() {
        let body = serde_json::to_value(BadRequestResponse::new(vec!["x".to_string()])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "statusCode": 400, "message": ["x"], "error": "Bad Request" })
        );
    }
}
