use crate::entities::{receiver_shipment, vendor_declaration};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Joined declaration + shipment view returned by vendor listings, lookups
/// and the admin search. Shipment-side fields stay null until dispatch.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "vendor_decl_id": "VD-2025-00042",
    "vendor_id": "VID-2025-00007",
    "tracking_id": "TRK-2025-00311",
    "item_name": "Ceramic tiles",
    "quantity": 120,
    "weight_kg": 840.5,
    "hs_code": "6907.21",
    "consignee_name": "Adaeze Obi",
    "consignee_address": "14 Marina Road, Lagos",
    "consignee_email": "adaeze@example.com",
    "consignee_phone": "+2348012345678",
    "status": "in_transit",
    "dispatch_date": "2025-06-02T08:15:00Z",
    "container_id": "CNT-2025-00003",
    "qr_code_url": "/documents/qr/VD-2025-00042.png",
    "invoice_pdf_url": "/documents/invoice/VD-2025-00042.pdf",
    "packing_list_pdf_url": "/documents/packing-list/VD-2025-00042.pdf",
    "created_at": "2025-06-01T10:30:00Z",
    "updated_at": "2025-06-02T08:15:00Z"
}))]
pub struct ShipmentRecord {
    /// Declaration ID
    #[schema(example = "VD-2025-00042")]
    pub vendor_decl_id: String,
    /// Vendor ID the declaration belongs to
    #[schema(example = "VID-2025-00007")]
    pub vendor_id: Option<String>,
    /// Tracking ID, assigned at dispatch
    #[schema(example = "TRK-2025-00311")]
    pub tracking_id: Option<String>,
    /// Declared item name
    #[schema(example = "Ceramic tiles")]
    pub item_name: String,
    /// Declared quantity
    #[schema(example = 120)]
    pub quantity: i32,
    /// Declared weight in kilograms
    #[schema(example = 840.5)]
    pub weight_kg: f64,
    /// Harmonized System code, if provided
    pub hs_code: Option<String>,
    /// Consignee name
    pub consignee_name: String,
    /// Consignee address
    pub consignee_address: String,
    /// Consignee email
    pub consignee_email: String,
    /// Consignee phone, if provided
    pub consignee_phone: Option<String>,
    /// Current shipment status; null until dispatched
    #[schema(example = "in_transit")]
    pub status: Option<String>,
    /// When the shipment was dispatched
    pub dispatch_date: Option<DateTime<Utc>>,
    /// Container the shipment is assigned to, if any
    pub container_id: Option<String>,
    /// QR code document link
    pub qr_code_url: Option<String>,
    /// Invoice document link
    pub invoice_pdf_url: Option<String>,
    /// Packing list document link
    pub packing_list_pdf_url: Option<String>,
    /// Declaration timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ShipmentRecord {
    /// Flattens a declaration and its optional shipment into one record.
    pub fn from_joined(
        declaration: vendor_declaration::Model,
        shipment: Option<receiver_shipment::Model>,
    ) -> Self {
        let tracking_id = shipment
            .as_ref()
            .map(|s| s.tracking_id.clone())
            .or_else(|| declaration.tracking_id.clone());
        Self {
            vendor_decl_id: declaration.vendor_decl_id,
            vendor_id: declaration.vendor_id,
            tracking_id,
            item_name: declaration.item_name,
            quantity: declaration.quantity,
            weight_kg: declaration.weight_kg,
            hs_code: declaration.hs_code,
            consignee_name: declaration.consignee_name,
            consignee_address: declaration.consignee_address,
            consignee_email: declaration.consignee_email,
            consignee_phone: declaration.consignee_phone,
            status: shipment.as_ref().map(|s| s.status.clone()),
            dispatch_date: shipment.as_ref().and_then(|s| s.dispatch_date),
            container_id: shipment.as_ref().and_then(|s| s.container_id.clone()),
            qr_code_url: declaration.qr_code_url,
            invoice_pdf_url: declaration.invoice_pdf_url,
            packing_list_pdf_url: declaration.packing_list_pdf_url,
            created_at: declaration.created_at,
            updated_at: declaration.updated_at,
        }
    }
}
