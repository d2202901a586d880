//! OpenAPI document served under `/api/docs`.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bond_yield_core::{BondCalculationRequest, BondCalculationResult, BondStatus, CashFlowEntry};

use crate::handlers::{self, BadRequestResponse, HealthResponse};

/// Swagger UI mount point.
pub const DOCS_PATH: &str = "/api/docs";

/// Raw OpenAPI JSON, next to the UI.
pub const OPENAPI_JSON_PATH: &str = "/api/docs/openapi.json";

/// Generated API description.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bond Yield Calculator API",
        description = "Current yield, yield to maturity, total interest, pricing status and cash flow schedule for fixed-coupon bonds."
    ),
    paths(handlers::calculate_bond, handlers::health),
    components(schemas(
        BondCalculationRequest,
        BondCalculationResult,
        BondStatus,
        CashFlowEntry,
        BadRequestResponse,
        HealthResponse
    )),
    tags((name = "Bond", description = "Bond yield calculations"))
)]
pub struct ApiDoc;

/// Swagger UI plus the JSON document it renders.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_calculate_route_and_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/api/v1/bond/calculate"]["post"].is_object());
        let schemas = &doc["components"]["schemas"];
        assert!(schemas["BondCalculationRequest"]["properties"]["faceValue"].is_object());
        assert!(schemas["BondCalculationRequest"]["properties"]
            .get("unknownFields")
            .is_none());
        assert!(schemas["BondCalculationResult"]["properties"]["cashFlowSchedule"].is_object());
    }
}
