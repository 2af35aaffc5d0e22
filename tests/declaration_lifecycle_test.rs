//! End-to-end tests for the vendor declaration lifecycle:
//! - Declaration with generated and vendor-supplied IDs
//! - Fetching and listing with pagination
//! - Partial updates, including the consignee email propagation
//! - Vendor status summaries before and after dispatch
//! - Cascade delete of declaration, shipment and timeline

mod common;

use axum::{body, http::Method, response::Response};
use common::TestApp;
use serde_json::{json, Value};

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn declare_generates_ids_and_document_links() {
    let app = TestApp::new().await;

    let payload = json!({
        "item_name": "Ceramic tiles",
        "quantity": 120,
        "weight_kg": 840.5,
        "hs_code": "6907.21",
        "consignee_name": "Adaeze Obi",
        "consignee_address": "14 Marina Road, Lagos",
        "consignee_email": "adaeze@example.com",
        "consignee_phone": "+2348012345678"
    });

    let response = app
        .request(Method::POST, "/api/v1/vendor/declare", Some(payload))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);

    let decl_id = body["data"]["vendor_decl_id"].as_str().expect("decl id");
    assert!(decl_id.starts_with("VD-"), "unexpected id {decl_id}");

    // No vendor ID supplied, so one is generated
    let vendor_id = body["data"]["vendor_id"].as_str().expect("vendor id");
    assert!(vendor_id.starts_with("VID-"), "unexpected id {vendor_id}");

    assert_eq!(
        body["data"]["qr_code_url"],
        format!("/documents/qr/{decl_id}.png")
    );
    assert_eq!(
        body["data"]["invoice_pdf_url"],
        format!("/documents/invoice/{decl_id}.pdf")
    );
    assert_eq!(
        body["data"]["packing_list_pdf_url"],
        format!("/documents/packing-list/{decl_id}.pdf")
    );
}

#[tokio::test]
async fn declare_keeps_a_supplied_vendor_id() {
    let app = TestApp::new().await;

    let payload = json!({
        "vendor_id": "VID-2025-00007",
        "item_name": "Cotton fabric",
        "quantity": 40,
        "weight_kg": 120.0,
        "consignee_name": "Chidi Okeke",
        "consignee_address": "3 Broad Street, Lagos",
        "consignee_email": "chidi@example.com"
    });

    let response = app
        .request(Method::POST, "/api/v1/vendor/declare", Some(payload))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["vendor_id"], "VID-2025-00007");
}

#[tokio::test]
async fn declare_rejects_invalid_payloads() {
    let app = TestApp::new().await;

    // Bad email
    let response = app
        .request(
            Method::POST,
            "/api/v1/vendor/declare",
            Some(json!({
                "item_name": "Tiles",
                "quantity": 1,
                "weight_kg": 5.0,
                "consignee_name": "A",
                "consignee_address": "B",
                "consignee_email": "not-an-email"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Zero quantity
    let response = app
        .request(
            Method::POST,
            "/api/v1/vendor/declare",
            Some(json!({
                "item_name": "Tiles",
                "quantity": 0,
                "weight_kg": 5.0,
                "consignee_name": "A",
                "consignee_address": "B",
                "consignee_email": "a@example.com"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn get_returns_the_joined_record_and_404_for_unknown_ids() {
    let app = TestApp::new().await;
    let receipt = app.seed_declaration(None, "Ceramic tiles").await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/vendor/shipment/{}", receipt.vendor_decl_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["vendor_decl_id"], receipt.vendor_decl_id);
    assert_eq!(body["data"]["item_name"], "Ceramic tiles");
    // Not dispatched yet
    assert_eq!(body["data"]["tracking_id"], Value::Null);
    assert_eq!(body["data"]["status"], Value::Null);

    let response = app
        .request(Method::GET, "/api/v1/vendor/shipment/VD-2025-99999", None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let app = TestApp::new().await;
    app.seed_declaration(None, "First").await;
    app.seed_declaration(None, "Second").await;
    app.seed_declaration(None, "Third").await;

    let response = app
        .request(Method::GET, "/api/v1/vendor/shipments?limit=2", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["limit"], 2);
    assert_eq!(body["data"]["offset"], 0);
    assert_eq!(body["data"]["shipments"].as_array().unwrap().len(), 2);

    let response = app
        .request(
            Method::GET,
            "/api/v1/vendor/shipments?limit=2&offset=2",
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["shipments"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["offset"], 2);
}

#[tokio::test]
async fn update_applies_partial_changes() {
    let app = TestApp::new().await;
    let receipt = app.seed_declaration(None, "Ceramic tiles").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/vendor/shipment",
            Some(json!({
                "vendor_decl_id": receipt.vendor_decl_id,
                "quantity": 99,
                "consignee_name": "Ngozi Eze"
            })),
        )
        .await;
    assert_eq!(response.status(), 204);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/vendor/shipment/{}", receipt.vendor_decl_id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["quantity"], 99);
    assert_eq!(body["data"]["consignee_name"], "Ngozi Eze");
    // Untouched fields stay as declared
    assert_eq!(body["data"]["item_name"], "Ceramic tiles");
}

#[tokio::test]
async fn update_without_fields_is_rejected() {
    let app = TestApp::new().await;
    let receipt = app.seed_declaration(None, "Ceramic tiles").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/vendor/shipment",
            Some(json!({ "vendor_decl_id": receipt.vendor_decl_id })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("No update fields provided"),
        "unexpected message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn update_of_unknown_declaration_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/vendor/shipment",
            Some(json!({
                "vendor_decl_id": "VD-2025-99999",
                "quantity": 5
            })),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn consignee_email_update_propagates_to_the_shipment() {
    let app = TestApp::new().await;
    let (vendor_decl_id, tracking_id) = app.seed_dispatched_shipment("Ceramic tiles").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/vendor/shipment",
            Some(json!({
                "vendor_decl_id": vendor_decl_id,
                "consignee_email": "new-address@example.com"
            })),
        )
        .await;
    assert_eq!(response.status(), 204);

    let response = app
        .request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["customer_email"], "new-address@example.com");
}

#[tokio::test]
async fn vendor_status_reports_per_declaration_flags() {
    let app = TestApp::new().await;

    // Unknown vendor has nothing to report
    let response = app
        .request(Method::GET, "/api/v1/vendor/status/VID-2025-99999", None)
        .await;
    assert_eq!(response.status(), 404);

    let receipt = app
        .seed_declaration(Some("VID-2025-00042"), "Ceramic tiles")
        .await;

    let response = app
        .request(Method::GET, "/api/v1/vendor/status/VID-2025-00042", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let entries = body["data"].as_array().expect("status entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["vendor_decl_id"], receipt.vendor_decl_id);
    assert_eq!(entries[0]["status"], Value::Null);
    assert_eq!(entries[0]["received"], false);
    assert_eq!(entries[0]["in_transit"], false);

    // Dispatch and check the derived flags flip
    app.state
        .services
        .shipments
        .dispatch(&receipt.vendor_decl_id, None)
        .await
        .expect("dispatch seeded declaration");

    let response = app
        .request(Method::GET, "/api/v1/vendor/status/VID-2025-00042", None)
        .await;
    let body = response_json(response).await;
    let entries = body["data"].as_array().expect("status entries");
    assert_eq!(entries[0]["status"], "dispatched");
    assert_eq!(entries[0]["received"], true);
    assert_eq!(entries[0]["in_transit"], true);
    assert!(entries[0]["tracking_id"]
        .as_str()
        .expect("tracking id after dispatch")
        .starts_with("TRK-"));
}

#[tokio::test]
async fn delete_cascades_to_shipment_and_timeline() {
    let app = TestApp::new().await;
    let (vendor_decl_id, tracking_id) = app.seed_dispatched_shipment("Ceramic tiles").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/vendor/shipment/{vendor_decl_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    // Declaration is gone
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/vendor/shipment/{vendor_decl_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);

    // So is the shipment behind the tracking ID
    let response = app
        .request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
        .await;
    assert_eq!(response.status(), 404);

    // Deleting again is a 404, not an error
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/vendor/shipment/{vendor_decl_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}
