use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Olu Shipping API",
        version = "1.0.0",
        description = r#"
# Olu Shipping Declaration & Tracking API

Vendors declare outbound shipments, the admin desk dispatches and tracks
them, and receivers follow progress by tracking ID or QR code.

## Workflow

- **Declare**: a vendor registers item and consignee details and receives a
  declaration ID (`VD-YYYY-NNNNN`) plus document links.
- **Dispatch**: the admin desk assigns a tracking ID (`TRK-YYYY-NNNNN`),
  stamps the dispatch date and opens the status timeline.
- **Track**: anyone with a tracking ID, declaration ID or shipment QR code
  can read the full journey, oldest update first.
- **Containers**: shipments can be grouped into containers; changing a
  container's status updates every shipment inside it.

## Admin access

Endpoints under `/api/v1/admin` require the `x-admin-secret` header. A
missing or mismatched secret returns 403.

## Error handling

Errors are JSON objects with `error`, `message`, optional `details`, the
`request_id` of the failed call and a `timestamp`.
        "#,
        contact(
            name = "Olu Shipping Support",
            email = "support@olushipping.example"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "vendor", description = "Vendor declaration lifecycle"),
        (name = "tracking", description = "Receiver-facing tracking lookups and status updates"),
        (name = "admin", description = "Dispatch, search and declaration administration"),
        (name = "containers", description = "Container grouping and bulk status propagation")
    ),
    paths(
        // Vendor
        crate::handlers::vendor::declare_shipment,
        crate::handlers::vendor::list_shipments,
        crate::handlers::vendor::get_shipment,
        crate::handlers::vendor::update_shipment,
        crate::handlers::vendor::delete_shipment,
        crate::handlers::vendor::check_status,

        // Tracking
        crate::handlers::tracking::track,
        crate::handlers::tracking::search_by_qr,
        crate::handlers::tracking::update_status,

        // Admin
        crate::handlers::admin::dispatch_shipment,
        crate::handlers::admin::search_shipments,
        crate::handlers::admin::update_shipment,
        crate::handlers::admin::delete_shipment,

        // Containers
        crate::handlers::containers::create_container,
        crate::handlers::containers::list_containers,
        crate::handlers::containers::update_container,
        crate::handlers::containers::delete_container,
        crate::handlers::containers::container_shipments,
        crate::handlers::containers::assign_shipment,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::ShipmentRecord,

            // Vendor types
            crate::handlers::vendor::DeclareRequest,
            crate::handlers::vendor::DeclareResponse,
            crate::handlers::vendor::VendorShipmentList,
            crate::handlers::vendor::UpdateDeclarationRequest,
            crate::handlers::vendor::VendorStatusSummary,

            // Tracking types
            crate::handlers::tracking::TrackingEvent,
            crate::handlers::tracking::TrackingResponse,
            crate::handlers::tracking::QrScanRequest,
            crate::handlers::tracking::UpdateStatusRequest,
            crate::handlers::tracking::ShipmentSnapshot,

            // Admin types
            crate::handlers::admin::DispatchRequest,
            crate::handlers::admin::DispatchResponse,
            crate::handlers::admin::SearchRequest,
            crate::handlers::admin::SearchResponse,

            // Container types
            crate::handlers::containers::CreateContainerRequest,
            crate::handlers::containers::UpdateContainerRequest,
            crate::handlers::containers::AssignContainerRequest,
            crate::handlers::containers::ContainerSummary,
            crate::handlers::containers::ContainerListEntry,
            crate::handlers::containers::ContainerShipmentRecord,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
