use crate::errors::ServiceError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Header carrying the admin shared secret.
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Shared-secret gate for the admin route set. Holds the expected value of
/// the `x-admin-secret` header; `None` means no secret was configured and
/// the gate fails closed.
#[derive(Clone)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Checks a presented header value against the configured secret.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), ServiceError> {
        match (&self.secret, presented) {
            (Some(expected), Some(presented)) if presented == expected => Ok(()),
            (Some(_), _) => Err(ServiceError::Forbidden("Invalid admin secret".to_string())),
            (None, _) => Err(ServiceError::Forbidden(
                "Admin access is not configured".to_string(),
            )),
        }
    }
}

/// Middleware rejecting admin requests without a matching `x-admin-secret`
/// header. Runs before the handler; failures surface as 403.
pub async fn admin_gate_middleware(
    State(gate): State<AdminGate>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let presented = request
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = gate.authorize(presented) {
        warn!(path = %request.uri().path(), "Rejected admin request");
        return Err(e);
    }

    Ok(next.run(request).await)
}

/// Router extension that wires the admin gate onto a route set.
pub trait AdminRouterExt {
    fn with_admin_gate(self, gate: AdminGate) -> Self;
}

impl<S> AdminRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_admin_gate(self, gate: AdminGate) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            gate,
            admin_gate_middleware,
        ))
    }
}
