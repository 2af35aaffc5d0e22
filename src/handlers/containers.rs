use crate::{
    entities::{container, receiver_shipment, vendor_declaration},
    errors::ServiceError,
    services::containers::ContainerWithCount,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "container_name": "MV Atlantic 2025-W23",
    "status": "pending"
}))]
pub struct CreateContainerRequest {
    /// Human-readable container name
    #[validate(length(min = 1))]
    #[schema(example = "MV Atlantic 2025-W23")]
    pub container_name: String,
    /// Initial status; defaults to pending
    #[schema(example = "pending")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "container_id": "CNT-2025-00003",
    "status": "customs"
}))]
pub struct UpdateContainerRequest {
    /// Container to update
    #[validate(length(min = 1))]
    #[schema(example = "CNT-2025-00003")]
    pub container_id: String,
    /// New name
    #[validate(length(min = 1))]
    pub container_name: Option<String>,
    /// New status, propagated to every shipment in the container
    #[validate(length(min = 1))]
    #[schema(example = "customs")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "tracking_id": "TRK-2025-00311",
    "container_id": "CNT-2025-00003"
}))]
pub struct AssignContainerRequest {
    /// Shipment to move
    #[validate(length(min = 1))]
    #[schema(example = "TRK-2025-00311")]
    pub tracking_id: String,
    /// Target container; null detaches the shipment
    #[schema(example = "CNT-2025-00003")]
    pub container_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "container_id": "CNT-2025-00003",
    "container_name": "MV Atlantic 2025-W23",
    "status": "customs",
    "created_at": "2025-06-01T10:30:00Z",
    "updated_at": "2025-06-10T09:00:00Z"
}))]
pub struct ContainerSummary {
    /// Container ID
    #[schema(example = "CNT-2025-00003")]
    pub container_id: String,
    /// Container name
    pub container_name: String,
    /// Current status
    #[schema(example = "customs")]
    pub status: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<container::Model> for ContainerSummary {
    fn from(model: container::Model) -> Self {
        Self {
            container_id: model.container_id,
            container_name: model.container_name,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Container listing entry with the number of shipments currently inside.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContainerListEntry {
    /// Container ID
    pub container_id: String,
    /// Container name
    pub container_name: String,
    /// Current status
    pub status: String,
    /// Shipments currently assigned
    #[schema(example = 12)]
    pub shipment_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<ContainerWithCount> for ContainerListEntry {
    fn from(row: ContainerWithCount) -> Self {
        Self {
            container_id: row.container_id,
            container_name: row.container_name,
            status: row.status,
            shipment_count: row.shipment_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Member shipment of a container with the declaration it came from.
/// Declaration fields are optional to survive an interrupted cascade delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContainerShipmentRecord {
    /// Tracking ID
    pub tracking_id: String,
    /// Owning declaration ID
    pub vendor_decl_id: String,
    /// Receiver email
    pub customer_email: String,
    /// Current status
    pub status: String,
    /// Dispatch timestamp
    pub dispatch_date: Option<DateTime<Utc>>,
    /// Declared item name
    pub item_name: Option<String>,
    /// Declared quantity
    pub quantity: Option<i32>,
    /// Consignee name
    pub consignee_name: Option<String>,
    /// Shipment creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ContainerShipmentRecord {
    fn from_member(
        shipment: receiver_shipment::Model,
        declaration: Option<vendor_declaration::Model>,
    ) -> Self {
        Self {
            tracking_id: shipment.tracking_id,
            vendor_decl_id: shipment.vendor_decl_id,
            customer_email: shipment.customer_email,
            status: shipment.status,
            dispatch_date: shipment.dispatch_date,
            item_name: declaration.as_ref().map(|d| d.item_name.clone()),
            quantity: declaration.as_ref().map(|d| d.quantity),
            consignee_name: declaration.map(|d| d.consignee_name),
            created_at: shipment.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/container",
    request_body = CreateContainerRequest,
    responses(
        (status = 200, description = "Container created", body = ApiResponse<ContainerSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn create_container(
    State(state): State<AppState>,
    Json(payload): Json<CreateContainerRequest>,
) -> ApiResult<ContainerSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let created = state
        .container_service()
        .create(payload.container_name, payload.status)
        .await?;

    Ok(Json(ApiResponse::success(ContainerSummary::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/containers",
    responses(
        (status = 200, description = "Containers with shipment counts, newest first", body = ApiResponse<Vec<ContainerListEntry>>),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn list_containers(State(state): State<AppState>) -> ApiResult<Vec<ContainerListEntry>> {
    let rows = state.container_service().list().await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(ContainerListEntry::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/container",
    request_body = UpdateContainerRequest,
    responses(
        (status = 200, description = "Updated container; a status change also updated every member shipment", body = ApiResponse<ContainerSummary>),
        (status = 400, description = "No update fields provided", body = crate::errors::ErrorResponse),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Container not found", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn update_container(
    State(state): State<AppState>,
    Json(payload): Json<UpdateContainerRequest>,
) -> ApiResult<ContainerSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let (updated, _affected) = state
        .container_service()
        .update(&payload.container_id, payload.container_name, payload.status)
        .await?;

    Ok(Json(ApiResponse::success(ContainerSummary::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/container/:container_id",
    params(
        ("container_id" = String, Path, description = "Container ID")
    ),
    responses(
        (status = 204, description = "Container deleted, members detached"),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Container not found", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn delete_container(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.container_service().delete(&container_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/container/:container_id/shipments",
    params(
        ("container_id" = String, Path, description = "Container ID")
    ),
    responses(
        (status = 200, description = "Shipments in the container, newest first", body = ApiResponse<Vec<ContainerShipmentRecord>>),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Container not found", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn container_shipments(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> ApiResult<Vec<ContainerShipmentRecord>> {
    let rows = state.container_service().shipments_in(&container_id).await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter()
            .map(|(shipment, declaration)| {
                ContainerShipmentRecord::from_member(shipment, declaration)
            })
            .collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/shipment/container",
    request_body = AssignContainerRequest,
    responses(
        (status = 204, description = "Shipment moved; assignment adopts the container's status"),
        (status = 403, description = "Admin secret missing or wrong", body = crate::errors::ErrorResponse),
        (status = 404, description = "Tracking ID or container not found", body = crate::errors::ErrorResponse)
    ),
    tag = "containers"
)]
pub async fn assign_shipment(
    State(state): State<AppState>,
    Json(payload): Json<AssignContainerRequest>,
) -> Result<StatusCode, ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    state
        .container_service()
        .assign_shipment(&payload.tracking_id, payload.container_id.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
