use crate::{
    errors::ServiceError,
    handlers::common::ShipmentRecord,
    handlers::vendor::UpdateDeclarationRequest,
    services::declarations::DeclarationChanges,
    services::search::SearchType,
    services::shipments::DispatchOutcome,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "vendor_decl_id": "VD-2025-00042",
    "customer_email": "adaeze@example.com"
}))]
pub struct DispatchRequest {
    /// Declaration to dispatch
    #[validate(length(min = 1))]
    #[schema(example = "VD-2025-00042")]
    pub vendor_decl_id: String,
    /// Receiver email; falls back to the declared consignee email
    #[validate(email)]
    pub customer_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "tracking_id": "TRK-2025-00311",
    "already_dispatched": false
}))]
pub struct DispatchResponse {
    /// Assigned tracking ID
    #[schema(example = "TRK-2025-00311")]
    pub tracking_id: String,
    /// True when the declaration already had a shipment and nothing was written
    pub already_dispatched: bool,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            tracking_id: outcome.tracking_id,
            already_dispatched: outcome.already_dispatched,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "query": "vd-2025",
    "search_type": "vendor_decl_id"
}))]
pub struct SearchRequest {
    /// Case-insensitive substring to look for
    #[validate(length(min = 1))]
    #[schema(example = "vd-2025")]
    pub query: String,
    /// One of vendor_decl_id, tracking_id, vendor_id, consignee_email;
    /// anything else searches every field
    #[schema(example = "vendor_decl_id")]
    pub search_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub shipments: Vec<ShipmentRecord>,
    pub total: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/dispatch",
    request_body = DispatchRequest,
    responses(
        (status = 200, description = "Shipment dispatched, or already dispatched", body = ApiResponse<DispatchResponse>),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Declaration not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent dispatch lost the race", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn dispatch_shipment(
    State(state): State<AppState>,
    Json(payload): Json<DispatchRequest>,
) -> ApiResult<DispatchResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let outcome = state
        .shipment_service()
        .dispatch(&payload.vendor_decl_id, payload.customer_email)
        .await?;

    Ok(Json(ApiResponse::success(DispatchResponse::from(outcome))))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching shipments, newest first, capped at 100", body = ApiResponse<SearchResponse>),
        (status = 400, description = "Empty query", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn search_shipments(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let rows = state
        .search_service()
        .search(&payload.query, SearchType::parse(payload.search_type.as_deref()))
        .await?;

    let shipments: Vec<ShipmentRecord> = rows
        .into_iter()
        .map(|(declaration, shipment)| ShipmentRecord::from_joined(declaration, shipment))
        .collect();
    let total = shipments.len() as u64;

    Ok(Json(ApiResponse::success(SearchResponse { shipments, total })))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/shipment",
    request_body = UpdateDeclarationRequest,
    responses(
        (status = 200, description = "Updated record", body = ApiResponse<ShipmentRecord>),
        (status = 400, description = "No update fields provided", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Declaration not found", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_shipment(
    State(state): State<AppState>,
    Json(payload): Json<UpdateDeclarationRequest>,
) -> ApiResult<ShipmentRecord> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let vendor_decl_id = payload.vendor_decl_id.clone();
    state
        .declaration_service()
        .update(
            &vendor_decl_id,
            DeclarationChanges {
                item_name: payload.item_name,
                quantity: payload.quantity,
                weight_kg: payload.weight_kg,
                hs_code: payload.hs_code,
                consignee_name: payload.consignee_name,
                consignee_address: payload.consignee_address,
                consignee_email: payload.consignee_email,
                consignee_phone: payload.consignee_phone,
            },
        )
        .await?;

    let (declaration, shipment) = state.declaration_service().get(&vendor_decl_id).await?;
    Ok(Json(ApiResponse::success(ShipmentRecord::from_joined(
        declaration,
        shipment,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/shipment/:vendor_decl_id",
    params(
        ("vendor_decl_id" = String, Path, description = "Declaration ID")
    ),
    responses(
        (status = 204, description = "Declaration and dependents deleted"),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Declaration not found", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(vendor_decl_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.declaration_service().delete(&vendor_decl_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
