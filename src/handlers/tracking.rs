use crate::{
    entities::{receiver_shipment, shipment_update},
    errors::ServiceError,
    services::shipments::TrackingView,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One entry in a shipment's status timeline.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "status": "customs",
    "location": "Apapa Port, Lagos",
    "notes": "Awaiting customs clearance",
    "timestamp": "2025-06-10T09:00:00Z"
}))]
pub struct TrackingEvent {
    /// Status recorded at this point
    pub status: String,
    /// Where the shipment was
    pub location: Option<String>,
    /// Free-form note
    pub notes: Option<String>,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
}

impl From<shipment_update::Model> for TrackingEvent {
    fn from(model: shipment_update::Model) -> Self {
        Self {
            status: model.status,
            location: model.location,
            notes: model.notes,
            timestamp: model.timestamp,
        }
    }
}

/// Full tracking view: shipment and declaration fields flattened together,
/// plus the timeline ordered oldest-first.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingResponse {
    /// Tracking ID
    #[schema(example = "TRK-2025-00311")]
    pub tracking_id: String,
    /// Owning declaration ID
    #[schema(example = "VD-2025-00042")]
    pub vendor_decl_id: String,
    /// Current status
    #[schema(example = "in_transit")]
    pub status: String,
    /// When the shipment was dispatched
    pub dispatch_date: Option<DateTime<Utc>>,
    /// Container the shipment travels in, if any
    pub container_id: Option<String>,
    /// Receiver email
    pub customer_email: String,
    /// Declared item name
    pub item_name: String,
    /// Declared quantity
    pub quantity: i32,
    /// Declared weight in kilograms
    pub weight_kg: f64,
    /// Harmonized System code
    pub hs_code: Option<String>,
    /// Consignee name
    pub consignee_name: String,
    /// Consignee address
    pub consignee_address: String,
    /// Consignee email
    pub consignee_email: String,
    /// Consignee phone
    pub consignee_phone: Option<String>,
    /// Status timeline, oldest first
    pub updates: Vec<TrackingEvent>,
}

impl From<TrackingView> for TrackingResponse {
    fn from(view: TrackingView) -> Self {
        Self {
            tracking_id: view.shipment.tracking_id,
            vendor_decl_id: view.shipment.vendor_decl_id,
            status: view.shipment.status,
            dispatch_date: view.shipment.dispatch_date,
            container_id: view.shipment.container_id,
            customer_email: view.shipment.customer_email,
            item_name: view.declaration.item_name,
            quantity: view.declaration.quantity,
            weight_kg: view.declaration.weight_kg,
            hs_code: view.declaration.hs_code,
            consignee_name: view.declaration.consignee_name,
            consignee_address: view.declaration.consignee_address,
            consignee_email: view.declaration.consignee_email,
            consignee_phone: view.declaration.consignee_phone,
            updates: view.updates.into_iter().map(TrackingEvent::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "qr_data": "OLU-SHIPPING:VD-2025-00042" }))]
pub struct QrScanRequest {
    /// Raw payload from the scanned QR code
    #[validate(length(min = 1))]
    #[schema(example = "OLU-SHIPPING:VD-2025-00042")]
    pub qr_data: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "tracking_id": "TRK-2025-00311",
    "status": "delivered",
    "location": "Lagos",
    "notes": "Left with gatehouse"
}))]
pub struct UpdateStatusRequest {
    /// Tracking ID of the shipment to update
    #[validate(length(min = 1))]
    #[schema(example = "TRK-2025-00311")]
    pub tracking_id: String,
    /// New status
    #[validate(length(min = 1))]
    #[schema(example = "delivered")]
    pub status: String,
    /// Where the change happened
    pub location: Option<String>,
    /// Free-form note
    pub notes: Option<String>,
}

/// Shipment row as returned after a status change.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentSnapshot {
    /// Tracking ID
    pub tracking_id: String,
    /// Owning declaration ID
    pub vendor_decl_id: String,
    /// Receiver email
    pub customer_email: String,
    /// Status after the update
    pub status: String,
    /// Dispatch timestamp
    pub dispatch_date: Option<DateTime<Utc>>,
    /// Container assignment
    pub container_id: Option<String>,
    /// Row creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<receiver_shipment::Model> for ShipmentSnapshot {
    fn from(model: receiver_shipment::Model) -> Self {
        Self {
            tracking_id: model.tracking_id,
            vendor_decl_id: model.vendor_decl_id,
            customer_email: model.customer_email,
            status: model.status,
            dispatch_date: model.dispatch_date,
            container_id: model.container_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tracking/:tracking_id",
    params(
        ("tracking_id" = String, Path, description = "Tracking ID, or a VD- prefixed declaration ID")
    ),
    responses(
        (status = 200, description = "Tracking view", body = ApiResponse<TrackingResponse>),
        (status = 404, description = "Tracking ID not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn track(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
) -> ApiResult<TrackingResponse> {
    let view = state.shipment_service().track(&tracking_id).await?;
    Ok(Json(ApiResponse::success(TrackingResponse::from(view))))
}

#[utoipa::path(
    post,
    path = "/api/v1/tracking/search-qr",
    request_body = QrScanRequest,
    responses(
        (status = 200, description = "Tracking view", body = ApiResponse<TrackingResponse>),
        (status = 400, description = "Empty QR payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "No shipment for this QR code", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn search_by_qr(
    State(state): State<AppState>,
    Json(payload): Json<QrScanRequest>,
) -> ApiResult<TrackingResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let view = state.shipment_service().track_by_qr(&payload.qr_data).await?;
    Ok(Json(ApiResponse::success(TrackingResponse::from(view))))
}

#[utoipa::path(
    post,
    path = "/api/v1/tracking/update-status",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status recorded", body = ApiResponse<ShipmentSnapshot>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Tracking ID not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<ShipmentSnapshot> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let updated = state
        .shipment_service()
        .update_status(
            &payload.tracking_id,
            &payload.status,
            payload.location,
            payload.notes,
        )
        .await?;

    Ok(Json(ApiResponse::success(ShipmentSnapshot::from(updated))))
}
