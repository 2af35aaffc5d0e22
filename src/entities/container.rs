use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An administrative grouping of shipments. Updating a container's status
/// fans out to every member shipment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "containers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub container_id: String,

    pub container_name: String,

    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        has_many = "super::receiver_shipment::Entity",
        from = "Column::ContainerId",
        to = "super::receiver_shipment::Column::ContainerId"
    )]
    ReceiverShipments,
}

impl Related<super::receiver_shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReceiverShipments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
