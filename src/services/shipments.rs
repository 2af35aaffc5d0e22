use crate::{
    db::DbPool,
    entities::{receiver_shipment, shipment_update, vendor_declaration, ShipmentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    idgen::{self, IdKind},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Prefix embedded in generated QR payloads ahead of the declaration ID.
pub const QR_PAYLOAD_PREFIX: &str = "OLU-SHIPPING:";

const DISPATCH_ORIGIN: &str = "Origin - China";
const DISPATCH_NOTE: &str = "Shipment dispatched to receiver";

/// Outcome of a dispatch request. `already_dispatched` is set when the
/// declaration had a shipment before this call, in which case the existing
/// tracking ID is returned and nothing is written.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub tracking_id: String,
    pub already_dispatched: bool,
}

/// Joined tracking view: the shipment, its owning declaration, and the
/// status timeline ordered oldest-first.
#[derive(Debug, Clone)]
pub struct TrackingView {
    pub shipment: receiver_shipment::Model,
    pub declaration: vendor_declaration::Model,
    pub updates: Vec<shipment_update::Model>,
}

/// Extracts the lookup key from a scanned QR payload. Payloads carry the
/// `OLU-SHIPPING:` prefix ahead of the declaration ID; bare IDs pass through.
pub fn parse_qr_payload(payload: &str) -> &str {
    let trimmed = payload.trim();
    trimmed
        .strip_prefix(QR_PAYLOAD_PREFIX)
        .unwrap_or(trimmed)
        .trim()
}

/// Service for dispatching shipments and serving tracking lookups
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ShipmentService {
    /// Creates a new shipment service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Dispatches a declared shipment: assigns a tracking ID, records the
    /// first status update and writes the tracking ID back onto the
    /// declaration. Dispatching an already-dispatched declaration returns
    /// the existing tracking ID instead of failing.
    #[instrument(skip(self))]
    pub async fn dispatch(
        &self,
        vendor_decl_id: &str,
        customer_email: Option<String>,
    ) -> Result<DispatchOutcome, ServiceError> {
        let db = &*self.db_pool;

        let declaration = vendor_declaration::Entity::find()
            .filter(vendor_declaration::Column::VendorDeclId.eq(vendor_decl_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Declaration {} not found", vendor_decl_id))
            })?;

        if let Some(existing) = receiver_shipment::Entity::find()
            .filter(receiver_shipment::Column::VendorDeclId.eq(vendor_decl_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
        {
            info!(
                vendor_decl_id = %vendor_decl_id,
                tracking_id = %existing.tracking_id,
                "Declaration already dispatched"
            );
            return Ok(DispatchOutcome {
                tracking_id: existing.tracking_id,
                already_dispatched: true,
            });
        }

        let tracking_id = idgen::generate(IdKind::Tracking, |candidate| async move {
            receiver_shipment::Entity::find()
                .filter(receiver_shipment::Column::TrackingId.eq(candidate))
                .one(db)
                .await
                .map(|found| found.is_some())
                .map_err(ServiceError::DatabaseError)
        })
        .await?;

        let customer_email =
            customer_email.unwrap_or_else(|| declaration.consignee_email.clone());
        let now = Utc::now();

        // Two concurrent dispatches can both pass the lookup above; the
        // unique index on vendor_decl_id turns the loser into a conflict.
        receiver_shipment::ActiveModel {
            id: NotSet,
            tracking_id: Set(tracking_id.clone()),
            vendor_decl_id: Set(vendor_decl_id.to_string()),
            customer_email: Set(customer_email),
            status: Set(ShipmentStatus::Dispatched.to_string()),
            dispatch_date: Set(Some(now)),
            container_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to insert shipment for {}: {}", vendor_decl_id, e);
            ServiceError::conflict_on_unique(
                e,
                format!("Declaration {} was dispatched concurrently", vendor_decl_id),
            )
        })?;

        shipment_update::ActiveModel {
            id: NotSet,
            tracking_id: Set(tracking_id.clone()),
            status: Set(ShipmentStatus::Dispatched.to_string()),
            location: Set(Some(DISPATCH_ORIGIN.to_string())),
            notes: Set(Some(DISPATCH_NOTE.to_string())),
            timestamp: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to record dispatch update for {}: {}", tracking_id, e);
            ServiceError::db_error(e)
        })?;

        let mut active: vendor_declaration::ActiveModel = declaration.into();
        active.tracking_id = Set(Some(tracking_id.clone()));
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(|e| {
            error!(
                "Failed to write tracking ID back onto declaration {}: {}",
                vendor_decl_id, e
            );
            ServiceError::db_error(e)
        })?;

        info!(
            vendor_decl_id = %vendor_decl_id,
            tracking_id = %tracking_id,
            "Shipment dispatched"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::ShipmentDispatched {
                vendor_decl_id: vendor_decl_id.to_string(),
                tracking_id: tracking_id.clone(),
            })
            .await
        {
            warn!(error = %e, tracking_id = %tracking_id, "Failed to send shipment dispatched event");
        }

        Ok(DispatchOutcome {
            tracking_id,
            already_dispatched: false,
        })
    }

    /// Records a status change on a shipment and appends it to the timeline.
    /// Setting the status back to `dispatched` re-stamps the dispatch date.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        tracking_id: &str,
        status: &str,
        location: Option<String>,
        notes: Option<String>,
    ) -> Result<receiver_shipment::Model, ServiceError> {
        if status.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Status must not be empty".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let shipment = receiver_shipment::Entity::find()
            .filter(receiver_shipment::Column::TrackingId.eq(tracking_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| ServiceError::NotFound("Tracking ID not found".to_string()))?;

        let now = Utc::now();
        let mut active: receiver_shipment::ActiveModel = shipment.into();
        active.status = Set(status.to_string());
        if status == ShipmentStatus::Dispatched.to_string() {
            active.dispatch_date = Set(Some(now));
        }
        active.updated_at = Set(now);

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to update status for {}: {}", tracking_id, e);
            ServiceError::db_error(e)
        })?;

        shipment_update::ActiveModel {
            id: NotSet,
            tracking_id: Set(tracking_id.to_string()),
            status: Set(status.to_string()),
            location: Set(location),
            notes: Set(notes),
            timestamp: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to append status update for {}: {}", tracking_id, e);
            ServiceError::db_error(e)
        })?;

        if let Err(e) = self
            .event_sender
            .send(Event::ShipmentStatusUpdated {
                tracking_id: tracking_id.to_string(),
                status: status.to_string(),
            })
            .await
        {
            warn!(error = %e, tracking_id = %tracking_id, "Failed to send status updated event");
        }

        Ok(updated)
    }

    /// Looks up a shipment by tracking key. `TRK-` prefixed and bare keys
    /// resolve against the tracking ID, `VD-` prefixed keys against the
    /// declaration ID.
    #[instrument(skip(self))]
    pub async fn track(&self, key: &str) -> Result<TrackingView, ServiceError> {
        let db = &*self.db_pool;

        let query = if key.starts_with("VD-") {
            receiver_shipment::Entity::find()
                .filter(receiver_shipment::Column::VendorDeclId.eq(key))
        } else {
            receiver_shipment::Entity::find()
                .filter(receiver_shipment::Column::TrackingId.eq(key))
        };

        let shipment = query
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| ServiceError::NotFound("Tracking ID not found".to_string()))?;

        self.joined_view(shipment).await
    }

    /// Resolves a scanned QR payload to the same joined view as `track`.
    #[instrument(skip(self))]
    pub async fn track_by_qr(&self, payload: &str) -> Result<TrackingView, ServiceError> {
        let key = parse_qr_payload(payload);
        if key.is_empty() {
            return Err(ServiceError::InvalidInput(
                "QR payload is empty".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let shipment = receiver_shipment::Entity::find()
            .filter(receiver_shipment::Column::VendorDeclId.eq(key))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| {
                ServiceError::NotFound("No shipment found for this QR code".to_string())
            })?;

        self.joined_view(shipment).await
    }

    /// Loads the declaration and ordered timeline for a shipment. A missing
    /// declaration means the cascade delete was interrupted partway, which
    /// surfaces as an internal error rather than a not-found.
    async fn joined_view(
        &self,
        shipment: receiver_shipment::Model,
    ) -> Result<TrackingView, ServiceError> {
        let db = &*self.db_pool;

        let declaration = vendor_declaration::Entity::find()
            .filter(vendor_declaration::Column::VendorDeclId.eq(shipment.vendor_decl_id.clone()))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| {
                error!(
                    "Shipment {} has no declaration row {}",
                    shipment.tracking_id, shipment.vendor_decl_id
                );
                ServiceError::InternalError("Vendor shipment data not found".to_string())
            })?;

        let updates = shipment_update::Entity::find()
            .filter(shipment_update::Column::TrackingId.eq(shipment.tracking_id.clone()))
            .order_by_asc(shipment_update::Column::Timestamp)
            .all(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?;

        Ok(TrackingView {
            shipment,
            declaration,
            updates,
        })
    }
}
