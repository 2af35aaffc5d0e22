use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A vendor's declared shipment. One row per declaration; the tracking ID
/// stays null until an admin dispatches the declaration.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_declarations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub vendor_decl_id: String,

    pub vendor_id: Option<String>,

    /// Copied from the receiver shipment at dispatch so vendors can see it
    pub tracking_id: Option<String>,

    pub item_name: String,
    pub quantity: i32,
    pub weight_kg: f64,
    pub hs_code: Option<String>,

    pub consignee_name: String,
    pub consignee_address: String,
    pub consignee_email: String,
    pub consignee_phone: Option<String>,

    pub qr_code_url: Option<String>,
    pub invoice_pdf_url: Option<String>,
    pub packing_list_pdf_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        has_one = "super::receiver_shipment::Entity",
        from = "Column::VendorDeclId",
        to = "super::receiver_shipment::Column::VendorDeclId"
    )]
    ReceiverShipment,
}

impl Related<super::receiver_shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReceiverShipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
