//! End-to-end tests for container management:
//! - Container creation and listing with shipment counts
//! - Assigning and detaching shipments, with status adoption
//! - Bulk status fan-out to every member
//! - Container deletion detaching members without touching their status

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

async fn create_container(app: &TestApp, name: &str, status: Option<&str>) -> String {
    let mut payload = json!({ "container_name": name });
    if let Some(status) = status {
        payload["status"] = json!(status);
    }

    let response = app
        .request_as_admin(Method::POST, "/api/v1/admin/container", Some(payload))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    body["data"]["container_id"]
        .as_str()
        .expect("container id")
        .to_string()
}

#[tokio::test]
async fn containers_are_created_with_a_default_status() {
    let app = TestApp::new().await;

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/v1/admin/container",
            Some(json!({ "container_name": "MV Atlantic 2025-W23" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let container_id = body["data"]["container_id"].as_str().expect("container id");
    assert!(container_id.starts_with("CNT-"), "unexpected id {container_id}");
    assert_eq!(body["data"]["container_name"], "MV Atlantic 2025-W23");
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn container_creation_requires_a_name() {
    let app = TestApp::new().await;

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/v1/admin/container",
            Some(json!({ "container_name": "" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/v1/admin/container",
            Some(json!({ "container_name": "   " })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn listing_reports_shipment_counts() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", Some("in_transit")).await;
    create_container(&app, "MV Pacific", None).await;

    let (_, tracking_a) = app.seed_dispatched_shipment("Tiles").await;
    let (_, tracking_b) = app.seed_dispatched_shipment("Fabric").await;
    for tracking_id in [&tracking_a, &tracking_b] {
        let response = app
            .request_as_admin(
                Method::PUT,
                "/api/v1/admin/shipment/container",
                Some(json!({
                    "tracking_id": tracking_id,
                    "container_id": container_id
                })),
            )
            .await;
        assert_eq!(response.status(), 204);
    }

    let body = response_json(
        app.request_as_admin(Method::GET, "/api/v1/admin/containers", None)
            .await,
    )
    .await;
    let containers = body["data"].as_array().expect("containers");
    assert_eq!(containers.len(), 2);

    let loaded = containers
        .iter()
        .find(|c| c["container_id"] == container_id.as_str())
        .expect("created container listed");
    assert_eq!(loaded["shipment_count"], 2);

    let empty = containers
        .iter()
        .find(|c| c["container_id"] != container_id.as_str())
        .expect("second container listed");
    assert_eq!(empty["shipment_count"], 0);
}

#[tokio::test]
async fn assignment_adopts_the_container_status() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", Some("in_transit")).await;
    let (_, tracking_id) = app.seed_dispatched_shipment("Tiles").await;

    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/shipment/container",
            Some(json!({
                "tracking_id": tracking_id,
                "container_id": container_id
            })),
        )
        .await;
    assert_eq!(response.status(), 204);

    let view = response_json(
        app.request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
            .await,
    )
    .await;
    assert_eq!(view["data"]["container_id"], container_id);
    // Shipment took on the container's status
    assert_eq!(view["data"]["status"], "in_transit");

    let updates = view["data"]["updates"].as_array().expect("timeline");
    let last = updates.last().expect("assignment entry");
    assert_eq!(
        last["notes"],
        format!("Assigned to container {container_id}")
    );
}

#[tokio::test]
async fn detaching_keeps_the_shipment_status() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", Some("customs")).await;
    let (_, tracking_id) = app.seed_dispatched_shipment("Tiles").await;

    app.request_as_admin(
        Method::PUT,
        "/api/v1/admin/shipment/container",
        Some(json!({
            "tracking_id": tracking_id,
            "container_id": container_id
        })),
    )
    .await;

    // Null container detaches
    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/shipment/container",
            Some(json!({
                "tracking_id": tracking_id,
                "container_id": null
            })),
        )
        .await;
    assert_eq!(response.status(), 204);

    let view = response_json(
        app.request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
            .await,
    )
    .await;
    assert_eq!(view["data"]["container_id"], Value::Null);
    // Status adopted at assignment time is kept on detach
    assert_eq!(view["data"]["status"], "customs");

    let updates = view["data"]["updates"].as_array().expect("timeline");
    assert_eq!(
        updates.last().expect("detach entry")["notes"],
        "Removed from container"
    );
}

#[tokio::test]
async fn assignment_validates_both_sides() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", None).await;

    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/shipment/container",
            Some(json!({
                "tracking_id": "TRK-2025-99999",
                "container_id": container_id
            })),
        )
        .await;
    assert_eq!(response.status(), 404);

    let (_, tracking_id) = app.seed_dispatched_shipment("Tiles").await;
    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/shipment/container",
            Some(json!({
                "tracking_id": tracking_id,
                "container_id": "CNT-2025-99999"
            })),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn status_change_fans_out_to_every_member() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", Some("pending")).await;

    let (_, tracking_a) = app.seed_dispatched_shipment("Tiles").await;
    let (_, tracking_b) = app.seed_dispatched_shipment("Fabric").await;
    let (_, tracking_outside) = app.seed_dispatched_shipment("Glassware").await;

    for tracking_id in [&tracking_a, &tracking_b] {
        app.request_as_admin(
            Method::PUT,
            "/api/v1/admin/shipment/container",
            Some(json!({
                "tracking_id": tracking_id,
                "container_id": container_id
            })),
        )
        .await;
    }

    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/container",
            Some(json!({
                "container_id": container_id,
                "status": "customs"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "customs");

    // Both members follow, each with a timeline entry naming the source
    for tracking_id in [&tracking_a, &tracking_b] {
        let view = response_json(
            app.request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
                .await,
        )
        .await;
        assert_eq!(view["data"]["status"], "customs");

        let updates = view["data"]["updates"].as_array().expect("timeline");
        let last = updates.last().expect("fan-out entry");
        assert_eq!(last["status"], "customs");
        assert_eq!(last["notes"], "Status updated via container");
    }

    // The unassigned shipment is untouched
    let view = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/tracking/{tracking_outside}"),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(view["data"]["status"], "dispatched");
}

#[tokio::test]
async fn container_update_requires_fields_and_an_existing_container() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", None).await;

    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/container",
            Some(json!({ "container_id": container_id })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request_as_admin(
            Method::PUT,
            "/api/v1/admin/container",
            Some(json!({
                "container_id": "CNT-2025-99999",
                "status": "customs"
            })),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn member_listing_joins_the_declaration() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", None).await;
    let (vendor_decl_id, tracking_id) = app.seed_dispatched_shipment("Ceramic tiles").await;

    app.request_as_admin(
        Method::PUT,
        "/api/v1/admin/shipment/container",
        Some(json!({
            "tracking_id": tracking_id,
            "container_id": container_id
        })),
    )
    .await;

    let body = response_json(
        app.request_as_admin(
            Method::GET,
            &format!("/api/v1/admin/container/{container_id}/shipments"),
            None,
        )
        .await,
    )
    .await;
    let members = body["data"].as_array().expect("members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["tracking_id"], tracking_id);
    assert_eq!(members[0]["vendor_decl_id"], vendor_decl_id);
    assert_eq!(members[0]["item_name"], "Ceramic tiles");

    let response = app
        .request_as_admin(
            Method::GET,
            "/api/v1/admin/container/CNT-2025-99999/shipments",
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn deleting_a_container_detaches_members() {
    let app = TestApp::new().await;
    let container_id = create_container(&app, "MV Atlantic", Some("in_transit")).await;
    let (_, tracking_id) = app.seed_dispatched_shipment("Tiles").await;

    app.request_as_admin(
        Method::PUT,
        "/api/v1/admin/shipment/container",
        Some(json!({
            "tracking_id": tracking_id,
            "container_id": container_id
        })),
    )
    .await;

    let response = app
        .request_as_admin(
            Method::DELETE,
            &format!("/api/v1/admin/container/{container_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    // Member survives with its status, minus the container reference
    let view = response_json(
        app.request(Method::GET, &format!("/api/v1/tracking/{tracking_id}"), None)
            .await,
    )
    .await;
    assert_eq!(view["data"]["container_id"], Value::Null);
    assert_eq!(view["data"]["status"], "in_transit");

    let response = app
        .request_as_admin(
            Method::DELETE,
            &format!("/api/v1/admin/container/{container_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}
