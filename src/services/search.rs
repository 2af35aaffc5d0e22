use crate::{
    db::DbPool,
    entities::{receiver_shipment, vendor_declaration},
    errors::ServiceError,
};
use sea_orm::{
    sea_query::{Expr, Func, IntoColumnRef, SimpleExpr},
    Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::sync::Arc;
use tracing::{error, instrument};

/// Hard ceiling on admin search results. The vendor listing paginates
/// instead; this endpoint is meant for interactive lookups.
pub const SEARCH_RESULT_CAP: u64 = 100;

/// Which field an admin search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    VendorDeclId,
    TrackingId,
    VendorId,
    ConsigneeEmail,
    All,
}

impl SearchType {
    /// Parses the wire value. Anything unrecognized falls back to `All`,
    /// matching how the admin console has always treated the discriminator.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("vendor_decl_id") => Self::VendorDeclId,
            Some("tracking_id") => Self::TrackingId,
            Some("vendor_id") => Self::VendorId,
            Some("consignee_email") => Self::ConsigneeEmail,
            _ => Self::All,
        }
    }
}

fn contains_ci(col: impl IntoColumnRef, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}

/// Service for the admin cross-table shipment search
#[derive(Clone)]
pub struct SearchService {
    db_pool: Arc<DbPool>,
}

impl SearchService {
    /// Creates a new search service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Case-insensitive substring search over declarations and their
    /// shipments, newest-first, capped at `SEARCH_RESULT_CAP` rows.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
    ) -> Result<
        Vec<(vendor_declaration::Model, Option<receiver_shipment::Model>)>,
        ServiceError,
    > {
        if query.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Search query must not be empty".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let pattern = format!("%{}%", query.trim().to_lowercase());

        let decl_id = (
            vendor_declaration::Entity,
            vendor_declaration::Column::VendorDeclId,
        );
        let vendor_id = (
            vendor_declaration::Entity,
            vendor_declaration::Column::VendorId,
        );
        let consignee_email = (
            vendor_declaration::Entity,
            vendor_declaration::Column::ConsigneeEmail,
        );
        let consignee_name = (
            vendor_declaration::Entity,
            vendor_declaration::Column::ConsigneeName,
        );
        let item_name = (
            vendor_declaration::Entity,
            vendor_declaration::Column::ItemName,
        );
        let tracking_id = (
            receiver_shipment::Entity,
            receiver_shipment::Column::TrackingId,
        );

        let condition = match search_type {
            SearchType::VendorDeclId => Condition::all().add(contains_ci(decl_id, &pattern)),
            SearchType::TrackingId => Condition::all().add(contains_ci(tracking_id, &pattern)),
            SearchType::VendorId => Condition::all().add(contains_ci(vendor_id, &pattern)),
            SearchType::ConsigneeEmail => {
                Condition::all().add(contains_ci(consignee_email, &pattern))
            }
            SearchType::All => Condition::any()
                .add(contains_ci(decl_id, &pattern))
                .add(contains_ci(tracking_id, &pattern))
                .add(contains_ci(vendor_id, &pattern))
                .add(contains_ci(consignee_email, &pattern))
                .add(contains_ci(consignee_name, &pattern))
                .add(contains_ci(item_name, &pattern)),
        };

        vendor_declaration::Entity::find()
            .find_also_related(receiver_shipment::Entity)
            .filter(condition)
            .order_by_desc(vendor_declaration::Column::CreatedAt)
            .limit(SEARCH_RESULT_CAP)
            .all(db)
            .await
            .map_err(|e| {
                error!("Search query failed: {}", e);
                ServiceError::db_error(e)
            })
    }
}
