use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter as StrumEnumIter, EnumString};

/// The receiver-facing shipment record, created when a declaration is
/// dispatched. Carries the customer-visible tracking ID.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receiver_shipments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub tracking_id: String,

    /// One shipment per declaration; the unique index backs the dispatch
    /// existence check under races
    #[sea_orm(unique)]
    pub vendor_decl_id: String,

    pub customer_email: String,

    /// Free-form status string; the well-known values live in [`ShipmentStatus`]
    pub status: String,

    pub dispatch_date: Option<DateTime<Utc>>,

    pub container_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor_declaration::Entity",
        from = "Column::VendorDeclId",
        to = "super::vendor_declaration::Column::VendorDeclId"
    )]
    VendorDeclaration,
    #[sea_orm(
        belongs_to = "super::container::Entity",
        from = "Column::ContainerId",
        to = "super::container::Column::ContainerId"
    )]
    Container,
    #[sea_orm(
        has_many = "super::shipment_update::Entity",
        from = "Column::TrackingId",
        to = "super::shipment_update::Column::TrackingId"
    )]
    ShipmentUpdates,
}

impl Related<super::vendor_declaration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorDeclaration.def()
    }
}

impl Related<super::container::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Container.def()
    }
}

impl Related<super::shipment_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentUpdates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Well-known shipment statuses.
///
/// Status writes are NOT validated against this set: callers may store any
/// string, and rows written by older tooling keep whatever they had. The enum
/// exists for the derived flags in vendor status summaries and for UI-facing
/// constants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, StrumEnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    Declared,
    Dispatched,
    Processing,
    InTransit,
    Customs,
    OutForDelivery,
    Delivered,
    Failed,
    Returned,
}

impl ShipmentStatus {
    /// Statuses counting as "moving" for the vendor-facing in-transit flag
    pub fn is_in_transit_phase(status: &str) -> bool {
        matches!(
            ShipmentStatus::from_str(status),
            Ok(ShipmentStatus::Dispatched)
                | Ok(ShipmentStatus::InTransit)
                | Ok(ShipmentStatus::Customs)
                | Ok(ShipmentStatus::OutForDelivery)
        )
    }

    /// A declaration counts as received once its shipment has moved past the
    /// declared state
    pub fn is_received(status: &str) -> bool {
        status != ShipmentStatus::Declared.to_string()
    }
}
