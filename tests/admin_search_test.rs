//! End-to-end tests for the admin surface:
//! - Cross-field shipment search with type discriminators
//! - Admin secret enforcement, including the unconfigured fail-closed case
//! - Operational status and health endpoints

mod common;

use axum::{body, http::Method, response::Response};
use common::{TestApp, TEST_ADMIN_SECRET};
use serde_json::{json, Value};

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn search_matches_declaration_ids_case_insensitively() {
    let app = TestApp::new().await;
    let first = app.seed_declaration(None, "Tiles").await;
    app.seed_declaration(None, "Fabric").await;
    app.seed_dispatched_shipment("Glassware").await;

    // IDs are stored uppercase; the query is lowercase
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({
                "query": "vd-",
                "search_type": "vendor_decl_id"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let shipments = body["data"]["shipments"].as_array().expect("shipments");
    assert_eq!(shipments.len(), 3);
    assert_eq!(body["data"]["total"], 3);

    // An exact ID narrows to one row
    let body = response_json(
        app.request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({
                "query": first.vendor_decl_id.to_lowercase(),
                "search_type": "vendor_decl_id"
            })),
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(
        body["data"]["shipments"][0]["vendor_decl_id"],
        first.vendor_decl_id
    );
}

#[tokio::test]
async fn search_scans_every_field_by_default() {
    let app = TestApp::new().await;
    app.seed_declaration(None, "Tiles").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/vendor/declare",
            Some(json!({
                "item_name": "Solar panel brackets",
                "quantity": 16,
                "weight_kg": 64.0,
                "consignee_name": "Folake Adeyemi",
                "consignee_address": "2 Harbour Road, Apapa",
                "consignee_email": "folake@big-imports.example.com"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    // No search_type scans every field, here matching the email
    let body = response_json(
        app.request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({ "query": "big-imports" })),
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(
        body["data"]["shipments"][0]["consignee_email"],
        "folake@big-imports.example.com"
    );

    // Unrecognized discriminators behave like the every-field search
    let body = response_json(
        app.request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({
                "query": "SOLAR PANEL",
                "search_type": "carrier"
            })),
        )
        .await,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(
        body["data"]["shipments"][0]["item_name"],
        "Solar panel brackets"
    );
}

#[tokio::test]
async fn search_by_tracking_id_covers_dispatch_fields() {
    let app = TestApp::new().await;
    app.seed_declaration(None, "Tiles").await;
    let (vendor_decl_id, tracking_id) = app.seed_dispatched_shipment("Glassware").await;

    let body = response_json(
        app.request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({
                "query": "trk-",
                "search_type": "tracking_id"
            })),
        )
        .await,
    )
    .await;

    assert_eq!(body["data"]["total"], 1);
    let row = &body["data"]["shipments"][0];
    assert_eq!(row["vendor_decl_id"], vendor_decl_id);
    assert_eq!(row["tracking_id"], tracking_id);
    assert_eq!(row["status"], "dispatched");
    assert!(row["dispatch_date"].is_string());
}

#[tokio::test]
async fn search_requires_a_query() {
    let app = TestApp::new().await;

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({ "query": "" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({ "query": "   " })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn admin_routes_reject_without_the_secret() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/admin/containers", None)
        .await;
    assert_eq!(response.status(), 403);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Forbidden: Invalid admin secret");

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/containers",
            None,
            &[("x-admin-secret", "wrong-secret")],
        )
        .await;
    assert_eq!(response.status(), 403);

    // The gate covers every admin route, not just the listing
    let response = app
        .request(
            Method::POST,
            "/api/v1/admin/search",
            Some(json!({ "query": "vd-" })),
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/containers",
            None,
            &[("x-admin-secret", TEST_ADMIN_SECRET)],
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn admin_is_fail_closed_without_a_configured_secret() {
    let app = TestApp::with_admin_secret(None).await;

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/admin/containers",
            None,
            &[("x-admin-secret", "anything")],
        )
        .await;
    assert_eq!(response.status(), 403);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Forbidden: Admin access is not configured");
}

#[tokio::test]
async fn vendor_and_tracking_routes_stay_open() {
    let app = TestApp::new().await;
    let (_, tracking_id) = app.seed_dispatched_shipment("Tiles").await;

    // No admin header on either call
    let response = app
        .request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
        .await;
    assert_eq!(response.status(), 200);

    let response = app.request(Method::GET, "/api/v1/vendor/shipments", None).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn status_and_health_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/status", None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["service"], "olu-shipping-api");
    assert_eq!(body["data"]["status"], "ok");

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["database"], "healthy");
}
