//! Olu Shipping API Library
//!
//! This crate provides the core functionality for the Olu Shipping API:
//! vendor shipment declarations, admin dispatch and container management,
//! and receiver-facing tracking lookups.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod idgen;
pub mod middleware_helpers;
pub mod migrator;
pub mod observability;
pub mod openapi;
pub mod services;

use auth::AdminRouterExt;
use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn declaration_service(&self) -> Arc<services::declarations::DeclarationService> {
        self.services.declarations.clone()
    }

    pub fn shipment_service(&self) -> Arc<services::shipments::ShipmentService> {
        self.services.shipments.clone()
    }

    pub fn container_service(&self) -> Arc<services::containers::ContainerService> {
        self.services.containers.clone()
    }

    pub fn search_service(&self) -> Arc<services::search::SearchService> {
        self.services.search.clone()
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: observability::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Builds the `/api/v1` route tree. Admin routes are wrapped in the shared
/// secret gate; everything else is public.
pub fn api_v1_routes(admin_gate: auth::AdminGate) -> Router<AppState> {
    // Vendor-facing declaration lifecycle
    let vendor = Router::new()
        .route("/vendor/declare", post(handlers::vendor::declare_shipment))
        .route("/vendor/shipments", get(handlers::vendor::list_shipments))
        .route(
            "/vendor/shipment/:vendor_decl_id",
            get(handlers::vendor::get_shipment).delete(handlers::vendor::delete_shipment),
        )
        .route("/vendor/shipment", put(handlers::vendor::update_shipment))
        .route("/vendor/status/:vendor_id", get(handlers::vendor::check_status));

    // Receiver-facing tracking; static segments take priority over the
    // tracking ID capture
    let tracking = Router::new()
        .route(
            "/tracking/update-status",
            post(handlers::tracking::update_status),
        )
        .route("/tracking/search-qr", post(handlers::tracking::search_by_qr))
        .route("/tracking/:tracking_id", get(handlers::tracking::track));

    // Admin desk: dispatch, search, declaration administration, containers
    let admin = Router::new()
        .route("/admin/dispatch", post(handlers::admin::dispatch_shipment))
        .route("/admin/search", post(handlers::admin::search_shipments))
        .route("/admin/shipment", put(handlers::admin::update_shipment))
        .route(
            "/admin/shipment/:vendor_decl_id",
            delete(handlers::admin::delete_shipment),
        )
        .route(
            "/admin/shipment/container",
            put(handlers::containers::assign_shipment),
        )
        .route(
            "/admin/container",
            post(handlers::containers::create_container)
                .put(handlers::containers::update_container),
        )
        .route("/admin/containers", get(handlers::containers::list_containers))
        .route(
            "/admin/container/:container_id",
            delete(handlers::containers::delete_container),
        )
        .route(
            "/admin/container/:container_id/shipments",
            get(handlers::containers::container_shipments),
        )
        .with_admin_gate(admin_gate);

    Router::new().merge(vendor).merge(tracking).merge(admin)
}

/// Service identity and build metadata.
pub async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "olu-shipping-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

/// Liveness plus a database ping.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
