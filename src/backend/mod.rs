//! Catalog query backend.
//!
//! The backend is an explicitly constructed, passed-in handle rather than a
//! module-level singleton, so tests can substitute an in-memory fake. Each
//! operation issues a single round trip returning the entity together with
//! whatever joined data the caller needs; the visibility rules from
//! [`crate::visibility`] are applied inside the query itself, never by
//! post-filtering in application code.

pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::page::Page;

pub use pg::PgBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} {id}: expected at most one row, got {count}")]
    MultipleRows {
        entity: &'static str,
        id: Uuid,
        count: usize,
    },
}

/// Owning business of a shop; only its `is_hidden` flag participates in
/// visibility, the rest is join target data.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ShopRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub name_ml: Option<serde_json::Value>,
    pub shop_type: String,
    pub is_hidden: bool,
    pub is_verified: bool,
    pub hidden_by_admin: bool,
    pub is_temporarily_closed: bool,
    pub hide_shop_during_closure: bool,
    pub closure_reason: Option<String>,
    pub closure_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub name_ml: Option<serde_json::Value>,
    pub price: Decimal,
    pub mrp: Decimal,
    pub image_urls: Vec<String>,
    pub is_active: bool,
    pub hidden_by_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub name_ml: Option<serde_json::Value>,
    pub price: Decimal,
    pub image_urls: Vec<String>,
    pub is_active: bool,
    pub hidden_by_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// An order with its shop flattened in and its items embedded as the json
/// aggregate produced by the query. The items payload is parsed into typed
/// records at the assembler boundary, not trusted as-is.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: String,
    pub shop_id: Uuid,
    pub shop_name: String,
    pub shop_name_ml: Option<serde_json::Value>,
    pub total_amount: Decimal,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub status: String,
    pub items: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct BillRow {
    pub id: Uuid,
    pub user_id: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Read surface of the catalog store. Single-entity operations return only
/// visible rows; list operations return the page plus the total count of
/// visible rows. Order operations join the shop under the same visibility
/// rule, while the order item → product reference stays an unfiltered
/// snapshot.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn shop_by_id(&self, id: Uuid) -> Result<Option<ShopRow>, BackendError>;

    async fn visible_shops(&self, page: Page) -> Result<(Vec<ShopRow>, i64), BackendError>;

    async fn product_by_id(&self, id: Uuid) -> Result<Option<ProductRow>, BackendError>;

    async fn visible_products(
        &self,
        shop_id: Option<Uuid>,
        page: Page,
    ) -> Result<(Vec<ProductRow>, i64), BackendError>;

    async fn service_by_id(&self, id: Uuid) -> Result<Option<ServiceRow>, BackendError>;

    async fn visible_services(
        &self,
        shop_id: Option<Uuid>,
        page: Page,
    ) -> Result<(Vec<ServiceRow>, i64), BackendError>;

    async fn order_by_id(&self, id: Uuid) -> Result<Option<OrderRow>, BackendError>;

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRow>, BackendError>;

    async fn bills_for_user(&self, user_id: &str) -> Result<Vec<BillRow>, BackendError>;
}

/// Collapses a by-unique-id result set. Zero rows is a clean miss; two or
/// more rows for one id is an integrity violation, not a first-row-wins.
pub fn at_most_one<T>(
    rows: Vec<T>,
    entity: &'static str,
    id: Uuid,
) -> Result<Option<T>, BackendError> {
    match rows.len() {
        0 | 1 => Ok(rows.into_iter().next()),
        count => Err(BackendError::MultipleRows { entity, id, count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_most_one() {
        let id = Uuid::new_v4();
        assert!(matches!(at_most_one::<u32>(vec![], "product", id), Ok(None)));
        assert!(matches!(at_most_one(vec![7], "product", id), Ok(Some(7))));

        let err = at_most_one(vec![1, 2], "product", id).unwrap_err();
        assert!(matches!(
            err,
            BackendError::MultipleRows { entity: "product", count: 2, .. }
        ));
    }
}
