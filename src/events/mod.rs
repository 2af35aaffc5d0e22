use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Declaration events
    DeclarationCreated {
        vendor_decl_id: String,
        vendor_id: String,
    },
    DeclarationUpdated {
        vendor_decl_id: String,
    },
    DeclarationDeleted {
        vendor_decl_id: String,
        tracking_id: Option<String>,
    },

    // Shipment events
    ShipmentDispatched {
        vendor_decl_id: String,
        tracking_id: String,
    },
    ShipmentStatusUpdated {
        tracking_id: String,
        status: String,
    },
    ShipmentContainerChanged {
        tracking_id: String,
        container_id: Option<String>,
    },

    // Container events
    ContainerCreated {
        container_id: String,
    },
    ContainerUpdated {
        container_id: String,
        status: Option<String>,
        affected_shipments: u64,
    },
    ContainerDeleted {
        container_id: String,
        detached_shipments: u64,
    },
}

/// Consumes events from the channel and logs them. Runs for the lifetime of
/// the application; ends only when every sender has been dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::DeclarationCreated {
                vendor_decl_id,
                vendor_id,
            } => {
                info!(
                    vendor_decl_id = %vendor_decl_id,
                    vendor_id = %vendor_id,
                    "Declaration created"
                );
            }
            Event::DeclarationUpdated { vendor_decl_id } => {
                info!(vendor_decl_id = %vendor_decl_id, "Declaration updated");
            }
            Event::DeclarationDeleted {
                vendor_decl_id,
                tracking_id,
            } => {
                info!(
                    vendor_decl_id = %vendor_decl_id,
                    tracking_id = tracking_id.as_deref().unwrap_or("-"),
                    "Declaration deleted"
                );
            }
            Event::ShipmentDispatched {
                vendor_decl_id,
                tracking_id,
            } => {
                info!(
                    vendor_decl_id = %vendor_decl_id,
                    tracking_id = %tracking_id,
                    "Shipment dispatched"
                );
            }
            Event::ShipmentStatusUpdated {
                tracking_id,
                status,
            } => {
                info!(tracking_id = %tracking_id, status = %status, "Shipment status updated");
            }
            Event::ShipmentContainerChanged {
                tracking_id,
                container_id,
            } => {
                info!(
                    tracking_id = %tracking_id,
                    container_id = container_id.as_deref().unwrap_or("-"),
                    "Shipment container changed"
                );
            }
            Event::ContainerCreated { container_id } => {
                info!(container_id = %container_id, "Container created");
            }
            Event::ContainerUpdated {
                container_id,
                status,
                affected_shipments,
            } => {
                info!(
                    container_id = %container_id,
                    status = status.as_deref().unwrap_or("-"),
                    affected_shipments = %affected_shipments,
                    "Container updated"
                );
            }
            Event::ContainerDeleted {
                container_id,
                detached_shipments,
            } => {
                info!(
                    container_id = %container_id,
                    detached_shipments = %detached_shipments,
                    "Container deleted"
                );
            }
        }
    }

    warn!("Event processing loop has ended");
}
