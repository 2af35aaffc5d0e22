use crate::{
    db::DbPool,
    entities::{receiver_shipment, shipment_update, vendor_declaration, ShipmentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    idgen::{self, IdKind},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Fields a vendor submits when declaring a new shipment.
#[derive(Debug, Clone)]
pub struct NewDeclaration {
    pub vendor_id: Option<String>,
    pub item_name: String,
    pub quantity: i32,
    pub weight_kg: f64,
    pub hs_code: Option<String>,
    pub consignee_name: String,
    pub consignee_address: String,
    pub consignee_email: String,
    pub consignee_phone: Option<String>,
}

/// Identifiers and document links handed back after a successful declaration.
#[derive(Debug, Clone)]
pub struct DeclarationReceipt {
    pub vendor_decl_id: String,
    pub vendor_id: String,
    pub qr_code_url: String,
    pub invoice_pdf_url: String,
    pub packing_list_pdf_url: String,
}

/// Partial edit to an existing declaration. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DeclarationChanges {
    pub item_name: Option<String>,
    pub quantity: Option<i32>,
    pub weight_kg: Option<f64>,
    pub hs_code: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub consignee_email: Option<String>,
    pub consignee_phone: Option<String>,
}

impl DeclarationChanges {
    pub fn is_empty(&self) -> bool {
        self.item_name.is_none()
            && self.quantity.is_none()
            && self.weight_kg.is_none()
            && self.hs_code.is_none()
            && self.consignee_name.is_none()
            && self.consignee_address.is_none()
            && self.consignee_email.is_none()
            && self.consignee_phone.is_none()
    }
}

/// Per-declaration delivery snapshot for the vendor status board.
#[derive(Debug, Clone)]
pub struct VendorStatusEntry {
    pub vendor_decl_id: String,
    pub item_name: String,
    pub quantity: i32,
    pub tracking_id: Option<String>,
    pub status: Option<String>,
    pub received: bool,
    pub in_transit: bool,
    pub created_at: DateTime<Utc>,
}

/// Service for the vendor-facing declaration lifecycle
#[derive(Clone)]
pub struct DeclarationService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DeclarationService {
    /// Creates a new declaration service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new vendor declaration and returns its identifiers and
    /// document links. The tracking ID is assigned later, at dispatch time.
    #[instrument(skip(self))]
    pub async fn declare(
        &self,
        declaration: NewDeclaration,
    ) -> Result<DeclarationReceipt, ServiceError> {
        let db = &*self.db_pool;

        let vendor_decl_id = idgen::generate(IdKind::Declaration, |candidate| async move {
            vendor_declaration::Entity::find()
                .filter(vendor_declaration::Column::VendorDeclId.eq(candidate))
                .one(db)
                .await
                .map(|found| found.is_some())
                .map_err(ServiceError::DatabaseError)
        })
        .await?;

        let vendor_id = match declaration.vendor_id {
            Some(vendor_id) => vendor_id,
            None => {
                idgen::generate(IdKind::Vendor, |candidate| async move {
                    vendor_declaration::Entity::find()
                        .filter(vendor_declaration::Column::VendorId.eq(candidate))
                        .one(db)
                        .await
                        .map(|found| found.is_some())
                        .map_err(ServiceError::DatabaseError)
                })
                .await?
            }
        };

        // Document generation is delegated; the stored URLs are stable paths
        // a document worker fills in out of band.
        let qr_code_url = format!("/documents/qr/{}.png", vendor_decl_id);
        let invoice_pdf_url = format!("/documents/invoice/{}.pdf", vendor_decl_id);
        let packing_list_pdf_url = format!("/documents/packing-list/{}.pdf", vendor_decl_id);

        let now = Utc::now();
        vendor_declaration::ActiveModel {
            id: NotSet,
            vendor_decl_id: Set(vendor_decl_id.clone()),
            vendor_id: Set(Some(vendor_id.clone())),
            tracking_id: Set(None),
            item_name: Set(declaration.item_name),
            quantity: Set(declaration.quantity),
            weight_kg: Set(declaration.weight_kg),
            hs_code: Set(declaration.hs_code),
            consignee_name: Set(declaration.consignee_name),
            consignee_address: Set(declaration.consignee_address),
            consignee_email: Set(declaration.consignee_email),
            consignee_phone: Set(declaration.consignee_phone),
            qr_code_url: Set(Some(qr_code_url.clone())),
            invoice_pdf_url: Set(Some(invoice_pdf_url.clone())),
            packing_list_pdf_url: Set(Some(packing_list_pdf_url.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to insert declaration {}: {}", vendor_decl_id, e);
            ServiceError::db_error(e)
        })?;

        info!(
            vendor_decl_id = %vendor_decl_id,
            vendor_id = %vendor_id,
            "Vendor declaration created"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::DeclarationCreated {
                vendor_decl_id: vendor_decl_id.clone(),
                vendor_id: vendor_id.clone(),
            })
            .await
        {
            warn!(error = %e, vendor_decl_id = %vendor_decl_id, "Failed to send declaration created event");
        }

        Ok(DeclarationReceipt {
            vendor_decl_id,
            vendor_id,
            qr_code_url,
            invoice_pdf_url,
            packing_list_pdf_url,
        })
    }

    /// Lists declarations newest-first together with their shipment, if any,
    /// plus the total number of declarations for pagination.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<
        (
            Vec<(vendor_declaration::Model, Option<receiver_shipment::Model>)>,
            u64,
        ),
        ServiceError,
    > {
        let db = &*self.db_pool;

        let total = vendor_declaration::Entity::find()
            .count(db)
            .await
            .map_err(|e| {
                error!("Failed to count declarations: {}", e);
                ServiceError::db_error(e)
            })?;

        let rows = vendor_declaration::Entity::find()
            .find_also_related(receiver_shipment::Entity)
            .order_by_desc(vendor_declaration::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list declarations: {}", e);
                ServiceError::db_error(e)
            })?;

        Ok((rows, total))
    }

    /// Fetches a single declaration with its shipment, if dispatched.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        vendor_decl_id: &str,
    ) -> Result<(vendor_declaration::Model, Option<receiver_shipment::Model>), ServiceError> {
        let db = &*self.db_pool;

        vendor_declaration::Entity::find()
            .filter(vendor_declaration::Column::VendorDeclId.eq(vendor_decl_id))
            .find_also_related(receiver_shipment::Entity)
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Declaration {} not found", vendor_decl_id))
            })
    }

    /// Applies a partial edit to a declaration. A consignee email change is
    /// propagated to the shipment's customer email when one exists.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        vendor_decl_id: &str,
        changes: DeclarationChanges,
    ) -> Result<vendor_declaration::Model, ServiceError> {
        if changes.is_empty() {
            return Err(ServiceError::InvalidInput(
                "No update fields provided".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let existing = vendor_declaration::Entity::find()
            .filter(vendor_declaration::Column::VendorDeclId.eq(vendor_decl_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Declaration {} not found", vendor_decl_id))
            })?;

        let new_email = changes.consignee_email.clone();

        let mut active: vendor_declaration::ActiveModel = existing.into();
        if let Some(item_name) = changes.item_name {
            active.item_name = Set(item_name);
        }
        if let Some(quantity) = changes.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(weight_kg) = changes.weight_kg {
            active.weight_kg = Set(weight_kg);
        }
        if let Some(hs_code) = changes.hs_code {
            active.hs_code = Set(Some(hs_code));
        }
        if let Some(consignee_name) = changes.consignee_name {
            active.consignee_name = Set(consignee_name);
        }
        if let Some(consignee_address) = changes.consignee_address {
            active.consignee_address = Set(consignee_address);
        }
        if let Some(consignee_email) = changes.consignee_email {
            active.consignee_email = Set(consignee_email);
        }
        if let Some(consignee_phone) = changes.consignee_phone {
            active.consignee_phone = Set(Some(consignee_phone));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to update declaration {}: {}", vendor_decl_id, e);
            ServiceError::db_error(e)
        })?;

        if let Some(email) = new_email {
            let shipment = receiver_shipment::Entity::find()
                .filter(receiver_shipment::Column::VendorDeclId.eq(vendor_decl_id))
                .one(db)
                .await
                .map_err(|e| ServiceError::db_error(e))?;

            if let Some(shipment) = shipment {
                let mut active: receiver_shipment::ActiveModel = shipment.into();
                active.customer_email = Set(email);
                active.updated_at = Set(Utc::now());
                active.update(db).await.map_err(|e| {
                    error!(
                        "Failed to propagate consignee email for {}: {}",
                        vendor_decl_id, e
                    );
                    ServiceError::db_error(e)
                })?;
            }
        }

        if let Err(e) = self
            .event_sender
            .send(Event::DeclarationUpdated {
                vendor_decl_id: vendor_decl_id.to_string(),
            })
            .await
        {
            warn!(error = %e, vendor_decl_id = %vendor_decl_id, "Failed to send declaration updated event");
        }

        Ok(updated)
    }

    /// Deletes a declaration and everything hanging off it: status updates
    /// first, then the shipment, then the declaration row itself. The steps
    /// run without a surrounding transaction, so a mid-sequence failure
    /// leaves the earlier deletes committed.
    #[instrument(skip(self))]
    pub async fn delete(&self, vendor_decl_id: &str) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = vendor_declaration::Entity::find()
            .filter(vendor_declaration::Column::VendorDeclId.eq(vendor_decl_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Declaration {} not found", vendor_decl_id))
            })?;

        let shipment = receiver_shipment::Entity::find()
            .filter(receiver_shipment::Column::VendorDeclId.eq(vendor_decl_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?;

        let tracking_id = shipment.as_ref().map(|s| s.tracking_id.clone());

        if let Some(shipment) = shipment {
            shipment_update::Entity::delete_many()
                .filter(shipment_update::Column::TrackingId.eq(shipment.tracking_id.clone()))
                .exec(db)
                .await
                .map_err(|e| {
                    error!(
                        "Failed to delete status updates for {}: {}",
                        shipment.tracking_id, e
                    );
                    ServiceError::db_error(e)
                })?;

            receiver_shipment::Entity::delete_by_id(shipment.id)
                .exec(db)
                .await
                .map_err(|e| {
                    error!("Failed to delete shipment for {}: {}", vendor_decl_id, e);
                    ServiceError::db_error(e)
                })?;
        }

        vendor_declaration::Entity::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(|e| {
                error!("Failed to delete declaration {}: {}", vendor_decl_id, e);
                ServiceError::db_error(e)
            })?;

        info!(vendor_decl_id = %vendor_decl_id, "Declaration deleted");

        if let Err(e) = self
            .event_sender
            .send(Event::DeclarationDeleted {
                vendor_decl_id: vendor_decl_id.to_string(),
                tracking_id,
            })
            .await
        {
            warn!(error = %e, vendor_decl_id = %vendor_decl_id, "Failed to send declaration deleted event");
        }

        Ok(())
    }

    /// Summarizes every declaration belonging to a vendor, with received and
    /// in-transit flags derived from the shipment status. Declarations that
    /// were never dispatched report no status and both flags false.
    #[instrument(skip(self))]
    pub async fn check_vendor_status(
        &self,
        vendor_id: &str,
    ) -> Result<Vec<VendorStatusEntry>, ServiceError> {
        let db = &*self.db_pool;

        let rows = vendor_declaration::Entity::find()
            .filter(vendor_declaration::Column::VendorId.eq(vendor_id))
            .find_also_related(receiver_shipment::Entity)
            .order_by_desc(vendor_declaration::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?;

        if rows.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "No declarations found for vendor {}",
                vendor_id
            )));
        }

        let entries = rows
            .into_iter()
            .map(|(declaration, shipment)| {
                let status = shipment.as_ref().map(|s| s.status.clone());
                let tracking_id = shipment
                    .as_ref()
                    .map(|s| s.tracking_id.clone())
                    .or_else(|| declaration.tracking_id.clone());
                VendorStatusEntry {
                    vendor_decl_id: declaration.vendor_decl_id,
                    item_name: declaration.item_name,
                    quantity: declaration.quantity,
                    tracking_id,
                    received: status
                        .as_deref()
                        .map(ShipmentStatus::is_received)
                        .unwrap_or(false),
                    in_transit: status
                        .as_deref()
                        .map(ShipmentStatus::is_in_transit_phase)
                        .unwrap_or(false),
                    status,
                    created_at: declaration.created_at,
                }
            })
            .collect();

        Ok(entries)
    }
}
