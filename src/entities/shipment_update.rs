use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only timeline entry recording one status change for a tracking ID.
/// Rows are never updated; they are deleted en masse when the owning shipment
/// is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipment_updates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub tracking_id: String,

    pub status: String,
    pub location: Option<String>,
    pub notes: Option<String>,

    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receiver_shipment::Entity",
        from = "Column::TrackingId",
        to = "super::receiver_shipment::Column::TrackingId"
    )]
    ReceiverShipment,
}

impl Related<super::receiver_shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReceiverShipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
