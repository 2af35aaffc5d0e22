use crate::{
    errors::ServiceError,
    handlers::common::ShipmentRecord,
    services::declarations::{DeclarationChanges, DeclarationReceipt, NewDeclaration, VendorStatusEntry},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "vendor_id": "VID-2025-00007",
    "item_name": "Ceramic tiles",
    "quantity": 120,
    "weight_kg": 840.5,
    "hs_code": "6907.21",
    "consignee_name": "Adaeze Obi",
    "consignee_address": "14 Marina Road, Lagos",
    "consignee_email": "adaeze@example.com",
    "consignee_phone": "+2348012345678"
}))]
pub struct DeclareRequest {
    /// Existing vendor ID; a fresh one is generated when omitted
    #[schema(example = "VID-2025-00007")]
    pub vendor_id: Option<String>,
    /// Item being shipped
    #[validate(length(min = 1))]
    #[schema(example = "Ceramic tiles")]
    pub item_name: String,
    /// Number of units, at least 1
    #[validate(range(min = 1))]
    #[schema(example = 120)]
    pub quantity: i32,
    /// Total weight in kilograms
    #[validate(range(min = 0.0))]
    #[schema(example = 840.5)]
    pub weight_kg: f64,
    /// Harmonized System code
    pub hs_code: Option<String>,
    /// Consignee name
    #[validate(length(min = 1))]
    pub consignee_name: String,
    /// Consignee address
    #[validate(length(min = 1))]
    pub consignee_address: String,
    /// Consignee email
    #[validate(email)]
    pub consignee_email: String,
    /// Consignee phone
    pub consignee_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "vendor_decl_id": "VD-2025-00042",
    "vendor_id": "VID-2025-00007",
    "qr_code_url": "/documents/qr/VD-2025-00042.png",
    "invoice_pdf_url": "/documents/invoice/VD-2025-00042.pdf",
    "packing_list_pdf_url": "/documents/packing-list/VD-2025-00042.pdf"
}))]
pub struct DeclareResponse {
    /// Generated declaration ID
    #[schema(example = "VD-2025-00042")]
    pub vendor_decl_id: String,
    /// Vendor ID, generated when not supplied
    #[schema(example = "VID-2025-00007")]
    pub vendor_id: String,
    /// QR code document link
    pub qr_code_url: String,
    /// Invoice document link
    pub invoice_pdf_url: String,
    /// Packing list document link
    pub packing_list_pdf_url: String,
}

impl From<DeclarationReceipt> for DeclareResponse {
    fn from(receipt: DeclarationReceipt) -> Self {
        Self {
            vendor_decl_id: receipt.vendor_decl_id,
            vendor_id: receipt.vendor_id,
            qr_code_url: receipt.qr_code_url,
            invoice_pdf_url: receipt.invoice_pdf_url,
            packing_list_pdf_url: receipt.packing_list_pdf_url,
        }
    }
}

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VendorListQuery {
    /// Page size, defaults to 50
    pub limit: Option<u64>,
    /// Rows to skip, defaults to 0
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorShipmentList {
    pub shipments: Vec<ShipmentRecord>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "vendor_decl_id": "VD-2025-00042",
    "quantity": 100,
    "consignee_email": "adaeze.obi@example.com"
}))]
pub struct UpdateDeclarationRequest {
    /// Declaration to update
    #[validate(length(min = 1))]
    #[schema(example = "VD-2025-00042")]
    pub vendor_decl_id: String,
    /// New item name
    #[validate(length(min = 1))]
    pub item_name: Option<String>,
    /// New quantity
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    /// New weight in kilograms
    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,
    /// New HS code
    pub hs_code: Option<String>,
    /// New consignee name
    #[validate(length(min = 1))]
    pub consignee_name: Option<String>,
    /// New consignee address
    #[validate(length(min = 1))]
    pub consignee_address: Option<String>,
    /// New consignee email, also propagated to the shipment record
    #[validate(email)]
    pub consignee_email: Option<String>,
    /// New consignee phone
    pub consignee_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "vendor_decl_id": "VD-2025-00042",
    "item_name": "Ceramic tiles",
    "quantity": 120,
    "tracking_id": "TRK-2025-00311",
    "status": "in_transit",
    "received": true,
    "in_transit": true,
    "created_at": "2025-06-01T10:30:00Z"
}))]
pub struct VendorStatusSummary {
    /// Declaration ID
    pub vendor_decl_id: String,
    /// Declared item name
    pub item_name: String,
    /// Declared quantity
    pub quantity: i32,
    /// Tracking ID once dispatched
    pub tracking_id: Option<String>,
    /// Current shipment status; null until dispatched
    pub status: Option<String>,
    /// Whether the shipment has moved past the declared stage
    pub received: bool,
    /// Whether the shipment is currently moving
    pub in_transit: bool,
    /// Declaration timestamp
    pub created_at: DateTime<Utc>,
}

impl From<VendorStatusEntry> for VendorStatusSummary {
    fn from(entry: VendorStatusEntry) -> Self {
        Self {
            vendor_decl_id: entry.vendor_decl_id,
            item_name: entry.item_name,
            quantity: entry.quantity,
            tracking_id: entry.tracking_id,
            status: entry.status,
            received: entry.received,
            in_transit: entry.in_transit,
            created_at: entry.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/vendor/declare",
    request_body = DeclareRequest,
    responses(
        (status = 200, description = "Declaration registered", body = ApiResponse<DeclareResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn declare_shipment(
    State(state): State<AppState>,
    Json(payload): Json<DeclareRequest>,
) -> ApiResult<DeclareResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let receipt = state
        .declaration_service()
        .declare(NewDeclaration {
            vendor_id: payload.vendor_id,
            item_name: payload.item_name,
            quantity: payload.quantity,
            weight_kg: payload.weight_kg,
            hs_code: payload.hs_code,
            consignee_name: payload.consignee_name,
            consignee_address: payload.consignee_address,
            consignee_email: payload.consignee_email,
            consignee_phone: payload.consignee_phone,
        })
        .await?;

    Ok(Json(ApiResponse::success(DeclareResponse::from(receipt))))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendor/shipments",
    params(VendorListQuery),
    responses(
        (status = 200, description = "Declarations listed", body = ApiResponse<VendorShipmentList>)
    ),
    tag = "vendor"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<VendorListQuery>,
) -> ApiResult<VendorShipmentList> {
    let limit = query.limit.unwrap_or(50).max(1);
    let offset = query.offset.unwrap_or(0);

    let (rows, total) = state.declaration_service().list(limit, offset).await?;
    let shipments = rows
        .into_iter()
        .map(|(declaration, shipment)| ShipmentRecord::from_joined(declaration, shipment))
        .collect();

    Ok(Json(ApiResponse::success(VendorShipmentList {
        shipments,
        total,
        limit,
        offset,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendor/shipment/:vendor_decl_id",
    params(
        ("vendor_decl_id" = String, Path, description = "Declaration ID")
    ),
    responses(
        (status = 200, description = "Declaration fetched", body = ApiResponse<ShipmentRecord>),
        (status = 404, description = "Declaration not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(vendor_decl_id): Path<String>,
) -> ApiResult<ShipmentRecord> {
    let (declaration, shipment) = state.declaration_service().get(&vendor_decl_id).await?;
    Ok(Json(ApiResponse::success(ShipmentRecord::from_joined(
        declaration,
        shipment,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/vendor/shipment",
    request_body = UpdateDeclarationRequest,
    responses(
        (status = 204, description = "Declaration updated"),
        (status = 400, description = "No update fields provided", body = crate::errors::ErrorResponse),
        (status = 404, description = "Declaration not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn update_shipment(
    State(state): State<AppState>,
    Json(payload): Json<UpdateDeclarationRequest>,
) -> Result<StatusCode, ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    state
        .declaration_service()
        .update(
            &payload.vendor_decl_id,
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

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v1/vendor/shipment/:vendor_decl_id",
    params(
        ("vendor_decl_id" = String, Path, description = "Declaration ID")
    ),
    responses(
        (status = 204, description = "Declaration and dependents deleted"),
        (status = 404, description = "Declaration not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(vendor_decl_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.declaration_service().delete(&vendor_decl_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/vendor/status/:vendor_id",
    params(
        ("vendor_id" = String, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Per-declaration status summaries", body = ApiResponse<Vec<VendorStatusSummary>>),
        (status = 404, description = "No declarations for this vendor", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn check_status(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> ApiResult<Vec<VendorStatusSummary>> {
    let entries = state
        .declaration_service()
        .check_vendor_status(&vendor_id)
        .await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(VendorStatusSummary::from).collect(),
    )))
}
