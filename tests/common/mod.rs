use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    routing::get,
    Router,
};
use olu_shipping_api::{
    auth::AdminGate,
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    services::declarations::{DeclarationReceipt, NewDeclaration},
    AppState,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Secret the test app accepts on admin routes.
pub const TEST_ADMIN_SECRET: &str = "test-admin-secret";

/// Helper harness for spinning up an application state backed by an in-memory
/// SQLite database. One connection keeps the in-memory database alive for the
/// lifetime of the harness.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_admin_secret(Some(TEST_ADMIN_SECRET)).await
    }

    /// Construct a test application with an explicit admin secret, or none at
    /// all to exercise the fail-closed behaviour.
    pub async fn with_admin_secret(admin_secret: Option<&str>) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.admin_secret = admin_secret.map(str::to_owned);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            event_sender,
            services,
        };

        let admin_gate = AdminGate::new(cfg.admin_secret().map(str::to_owned));

        let router = Router::new()
            .route("/status", get(olu_shipping_api::api_status))
            .route("/health", get(olu_shipping_api::health_check))
            .nest("/api/v1", olu_shipping_api::api_v1_routes(admin_gate))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with optional JSON body and headers.
    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Plain request without the admin secret.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    /// Request carrying the admin secret header accepted by the test app.
    #[allow(dead_code)]
    pub async fn request_as_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[("x-admin-secret", TEST_ADMIN_SECRET)])
            .await
    }

    /// Seed a declaration straight through the service layer.
    #[allow(dead_code)]
    pub async fn seed_declaration(
        &self,
        vendor_id: Option<&str>,
        item_name: &str,
    ) -> DeclarationReceipt {
        self.state
            .services
            .declarations
            .declare(NewDeclaration {
                vendor_id: vendor_id.map(str::to_owned),
                item_name: item_name.to_string(),
                quantity: 10,
                weight_kg: 25.0,
                hs_code: Some("6907.21".to_string()),
                consignee_name: "Adaeze Obi".to_string(),
                consignee_address: "14 Marina Road, Lagos".to_string(),
                consignee_email: "adaeze@example.com".to_string(),
                consignee_phone: Some("+2348012345678".to_string()),
            })
            .await
            .expect("seed declaration for tests")
    }

    /// Seed a declaration and dispatch it, returning (vendor_decl_id, tracking_id).
    #[allow(dead_code)]
    pub async fn seed_dispatched_shipment(&self, item_name: &str) -> (String, String) {
        let receipt = self.seed_declaration(None, item_name).await;
        let outcome = self
            .state
            .services
            .shipments
            .dispatch(&receipt.vendor_decl_id, None)
            .await
            .expect("seed dispatch for tests");
        (receipt.vendor_decl_id, outcome.tracking_id)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
