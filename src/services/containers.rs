use crate::{
    db::DbPool,
    entities::{container, receiver_shipment, shipment_update, vendor_declaration, ShipmentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    idgen::{self, IdKind},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType,
    NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const CONTAINER_UPDATE_NOTE: &str = "Status updated via container";

/// Container row plus how many shipments are currently assigned to it.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ContainerWithCount {
    pub id: i64,
    pub container_id: String,
    pub container_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipment_count: i64,
}

/// Service for grouping shipments into containers and propagating bulk
/// status changes to every member
#[derive(Clone)]
pub struct ContainerService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ContainerService {
    /// Creates a new container service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a container. New containers start out `pending` unless an
    /// initial status is supplied.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        container_name: String,
        status: Option<String>,
    ) -> Result<container::Model, ServiceError> {
        if container_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Container name must not be empty".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let container_id = idgen::generate(IdKind::Container, |candidate| async move {
            container::Entity::find()
                .filter(container::Column::ContainerId.eq(candidate))
                .one(db)
                .await
                .map(|found| found.is_some())
                .map_err(ServiceError::DatabaseError)
        })
        .await?;

        let now = Utc::now();
        let created = container::ActiveModel {
            id: NotSet,
            container_id: Set(container_id.clone()),
            container_name: Set(container_name),
            status: Set(status.unwrap_or_else(|| ShipmentStatus::Pending.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to insert container {}: {}", container_id, e);
            ServiceError::db_error(e)
        })?;

        info!(container_id = %created.container_id, "Container created");

        if let Err(e) = self
            .event_sender
            .send(Event::ContainerCreated {
                container_id: created.container_id.clone(),
            })
            .await
        {
            warn!(error = %e, container_id = %created.container_id, "Failed to send container created event");
        }

        Ok(created)
    }

    /// Lists containers newest-first with a per-container shipment count.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ContainerWithCount>, ServiceError> {
        let db = &*self.db_pool;

        container::Entity::find()
            .column_as(receiver_shipment::Column::Id.count(), "shipment_count")
            .join(JoinType::LeftJoin, container::Relation::ReceiverShipments.def())
            .group_by(container::Column::Id)
            .order_by_desc(container::Column::CreatedAt)
            .into_model::<ContainerWithCount>()
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list containers: {}", e);
                ServiceError::db_error(e)
            })
    }

    /// Renames a container and/or changes its status. A status change fans
    /// out to every assigned shipment: one bulk status update, then one
    /// timeline row per member. Returns the updated container and the number
    /// of shipments touched.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        container_id: &str,
        container_name: Option<String>,
        status: Option<String>,
    ) -> Result<(container::Model, u64), ServiceError> {
        if container_name.is_none() && status.is_none() {
            return Err(ServiceError::InvalidInput(
                "No update fields provided".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let existing = self.find_by_container_id(container_id).await?;

        let mut active: container::ActiveModel = existing.into();
        if let Some(container_name) = container_name {
            active.container_name = Set(container_name);
        }
        if let Some(status) = status.clone() {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to update container {}: {}", container_id, e);
            ServiceError::db_error(e)
        })?;

        let mut affected = 0;
        if let Some(status) = status.clone() {
            let members = receiver_shipment::Entity::find()
                .filter(receiver_shipment::Column::ContainerId.eq(container_id))
                .all(db)
                .await
                .map_err(|e| ServiceError::db_error(e))?;

            let result = receiver_shipment::Entity::update_many()
                .col_expr(receiver_shipment::Column::Status, Expr::value(status.clone()))
                .col_expr(receiver_shipment::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(receiver_shipment::Column::ContainerId.eq(container_id))
                .exec(db)
                .await
                .map_err(|e| {
                    error!(
                        "Failed to fan out status to container {} members: {}",
                        container_id, e
                    );
                    ServiceError::db_error(e)
                })?;
            affected = result.rows_affected;

            // One timeline row per member, written sequentially after the
            // bulk update. A failure here leaves some members without their
            // timeline entry while the status change itself is committed.
            for member in &members {
                shipment_update::ActiveModel {
                    id: NotSet,
                    tracking_id: Set(member.tracking_id.clone()),
                    status: Set(status.clone()),
                    location: Set(None),
                    notes: Set(Some(CONTAINER_UPDATE_NOTE.to_string())),
                    timestamp: Set(Utc::now()),
                }
                .insert(db)
                .await
                .map_err(|e| {
                    error!(
                        "Failed to append container update for {}: {}",
                        member.tracking_id, e
                    );
                    ServiceError::db_error(e)
                })?;
            }

            info!(
                container_id = %container_id,
                affected = affected,
                "Container status fanned out to members"
            );
        }

        if let Err(e) = self
            .event_sender
            .send(Event::ContainerUpdated {
                container_id: container_id.to_string(),
                status,
                affected_shipments: affected,
            })
            .await
        {
            warn!(error = %e, container_id = %container_id, "Failed to send container updated event");
        }

        Ok((updated, affected))
    }

    /// Deletes a container, detaching every member shipment first. Members
    /// keep their current status; only the container reference is cleared.
    /// Returns how many shipments were detached.
    #[instrument(skip(self))]
    pub async fn delete(&self, container_id: &str) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.find_by_container_id(container_id).await?;

        let result = receiver_shipment::Entity::update_many()
            .col_expr(
                receiver_shipment::Column::ContainerId,
                Expr::value(Option::<String>::None),
            )
            .col_expr(receiver_shipment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(receiver_shipment::Column::ContainerId.eq(container_id))
            .exec(db)
            .await
            .map_err(|e| {
                error!(
                    "Failed to detach shipments from container {}: {}",
                    container_id, e
                );
                ServiceError::db_error(e)
            })?;

        container::Entity::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(|e| {
                error!("Failed to delete container {}: {}", container_id, e);
                ServiceError::db_error(e)
            })?;

        info!(
            container_id = %container_id,
            detached = result.rows_affected,
            "Container deleted"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::ContainerDeleted {
                container_id: container_id.to_string(),
                detached_shipments: result.rows_affected,
            })
            .await
        {
            warn!(error = %e, container_id = %container_id, "Failed to send container deleted event");
        }

        Ok(result.rows_affected)
    }

    /// Lists the shipments assigned to a container, newest-first, together
    /// with their owning declarations.
    #[instrument(skip(self))]
    pub async fn shipments_in(
        &self,
        container_id: &str,
    ) -> Result<Vec<(receiver_shipment::Model, Option<vendor_declaration::Model>)>, ServiceError>
    {
        let db = &*self.db_pool;
        self.find_by_container_id(container_id).await?;

        receiver_shipment::Entity::find()
            .filter(receiver_shipment::Column::ContainerId.eq(container_id))
            .find_also_related(vendor_declaration::Entity)
            .order_by_desc(receiver_shipment::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!(
                    "Failed to list shipments in container {}: {}",
                    container_id, e
                );
                ServiceError::db_error(e)
            })
    }

    /// Assigns a shipment to a container, or detaches it when no container
    /// is given. Assignment overwrites the shipment status with the
    /// container's status; both directions append a timeline row.
    #[instrument(skip(self))]
    pub async fn assign_shipment(
        &self,
        tracking_id: &str,
        container_id: Option<&str>,
    ) -> Result<receiver_shipment::Model, ServiceError> {
        let db = &*self.db_pool;

        let shipment = receiver_shipment::Entity::find()
            .filter(receiver_shipment::Column::TrackingId.eq(tracking_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| ServiceError::NotFound("Tracking ID not found".to_string()))?;

        let now = Utc::now();
        let (updated, note, timeline_status) = match container_id {
            Some(container_id) => {
                let target = self.find_by_container_id(container_id).await?;
                let mut active: receiver_shipment::ActiveModel = shipment.into();
                active.container_id = Set(Some(container_id.to_string()));
                active.status = Set(target.status.clone());
                active.updated_at = Set(now);
                let updated = active.update(db).await.map_err(|e| {
                    error!(
                        "Failed to assign {} to container {}: {}",
                        tracking_id, container_id, e
                    );
                    ServiceError::db_error(e)
                })?;
                (
                    updated,
                    format!("Assigned to container {}", container_id),
                    target.status,
                )
            }
            None => {
                let current_status = shipment.status.clone();
                let mut active: receiver_shipment::ActiveModel = shipment.into();
                active.container_id = Set(None);
                active.updated_at = Set(now);
                let updated = active.update(db).await.map_err(|e| {
                    error!("Failed to detach {} from container: {}", tracking_id, e);
                    ServiceError::db_error(e)
                })?;
                (updated, "Removed from container".to_string(), current_status)
            }
        };

        shipment_update::ActiveModel {
            id: NotSet,
            tracking_id: Set(tracking_id.to_string()),
            status: Set(timeline_status),
            location: Set(None),
            notes: Set(Some(note)),
            timestamp: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(
                "Failed to append container assignment update for {}: {}",
                tracking_id, e
            );
            ServiceError::db_error(e)
        })?;

        if let Err(e) = self
            .event_sender
            .send(Event::ShipmentContainerChanged {
                tracking_id: tracking_id.to_string(),
                container_id: container_id.map(|c| c.to_string()),
            })
            .await
        {
            warn!(error = %e, tracking_id = %tracking_id, "Failed to send container assignment event");
        }

        Ok(updated)
    }

    async fn find_by_container_id(
        &self,
        container_id: &str,
    ) -> Result<container::Model, ServiceError> {
        let db = &*self.db_pool;
        container::Entity::find()
            .filter(container::Column::ContainerId.eq(container_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::db_error(e))?
            .ok_or_else(|| ServiceError::NotFound(format!("Container {} not found", container_id)))
    }
}
