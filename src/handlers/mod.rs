pub mod admin;
pub mod common;
pub mod containers;
pub mod tracking;
pub mod vendor;

use crate::{db::DbPool, events::EventSender};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub declarations: Arc<crate::services::declarations::DeclarationService>,
    pub shipments: Arc<crate::services::shipments::ShipmentService>,
    pub containers: Arc<crate::services::containers::ContainerService>,
    pub search: Arc<crate::services::search::SearchService>,
}

impl AppServices {
    /// Builds the services container shared by every handler.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let declarations = Arc::new(crate::services::declarations::DeclarationService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let shipments = Arc::new(crate::services::shipments::ShipmentService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let containers = Arc::new(crate::services::containers::ContainerService::new(
            db_pool.clone(),
            event_sender,
        ));
        let search = Arc::new(crate::services::search::SearchService::new(db_pool));

        Self {
            declarations,
            shipments,
            containers,
            search,
        }
    }
}
