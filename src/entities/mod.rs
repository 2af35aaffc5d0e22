pub mod container;
pub mod receiver_shipment;
pub mod shipment_update;
pub mod vendor_declaration;

pub use receiver_shipment::ShipmentStatus;
