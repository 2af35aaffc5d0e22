// Vendor-facing declaration lifecycle
pub mod declarations;

// Receiver-side shipment tracking
pub mod shipments;

// Container grouping and bulk status propagation
pub mod containers;

// Admin cross-table search
pub mod search;
