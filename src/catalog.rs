//! Catalog assemblers.
//!
//! Thin layer between the HTTP handlers and the backend: runs the visibility
//! query, validates the returned shape into the typed records of
//! [`crate::models`], and absorbs every failure into an empty result. "Not
//! found" and "query failed" are logged distinctly but look identical to the
//! caller; nothing from this layer ever surfaces as a raw backend error.

use std::collections::HashMap;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::backend::{BackendError, BillRow, CatalogBackend};
use crate::models::{Order, Product, Service, ShapeError, Shop};
use crate::page::{Page, PaginatedResponse};

#[derive(Clone)]
pub struct Catalog<B> {
    backend: B,
}

impl<B: CatalogBackend> Catalog<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn shop(&self, id: Uuid) -> Option<Shop> {
        flatten_single("shop", id, self.backend.shop_by_id(id).await)
    }

    pub async fn shops(&self, page: Page) -> PaginatedResponse<Shop> {
        flatten_list("shops", self.backend.visible_shops(page).await, page)
    }

    pub async fn product(&self, id: Uuid) -> Option<Product> {
        flatten_single("product", id, self.backend.product_by_id(id).await)
    }

    pub async fn products(
        &self,
        shop_id: Option<Uuid>,
        page: Page,
    ) -> PaginatedResponse<Product> {
        flatten_list(
            "products",
            self.backend.visible_products(shop_id, page).await,
            page,
        )
    }

    pub async fn service(&self, id: Uuid) -> Option<Service> {
        flatten_single("service", id, self.backend.service_by_id(id).await)
    }

    pub async fn services(
        &self,
        shop_id: Option<Uuid>,
        page: Page,
    ) -> PaginatedResponse<Service> {
        flatten_list(
            "services",
            self.backend.visible_services(shop_id, page).await,
            page,
        )
    }

    pub async fn order(&self, id: Uuid) -> Option<Order> {
        flatten_single("order", id, self.backend.order_by_id(id).await)
    }

    /// Order history for a visitor, each order decorated with the bill that
    /// claims it. The bills fetch is best-effort enrichment: if it fails, the
    /// orders are still returned, just without `bill_id`.
    pub async fn orders_for_user(&self, user_id: &str) -> Vec<Order> {
        let rows = match self.backend.orders_for_user(user_id).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(user_id, error = %e, "orders fetch failed");
                return Vec::new();
            }
        };

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            match Order::try_from(row) {
                Ok(order) => orders.push(order),
                Err(e) => {
                    error!(user_id, error = %e, "order payload failed shape validation");
                    return Vec::new();
                }
            }
        }

        match self.backend.bills_for_user(user_id).await {
            Ok(bills) => {
                let index = bill_index(&bills);
                for order in &mut orders {
                    order.bill_id = index.get(&order.id).copied();
                }
            }
            Err(e) => {
                warn!(user_id, error = %e, "bills fetch failed; orders returned without bill ids");
            }
        }

        orders
    }
}

/// Builds the `order_id → bill_id` lookup from bill metadata. Bills arrive
/// oldest first and duplicate claims are resolved last-write-wins, so the
/// newest bill takes the slot. A bill whose metadata carries no parseable
/// `order_id` contributes nothing.
pub fn bill_index(bills: &[BillRow]) -> HashMap<Uuid, Uuid> {
    let mut index = HashMap::new();
    for bill in bills {
        let Some(raw) = bill.metadata.get("order_id").and_then(|v| v.as_str()) else {
            continue;
        };
        match Uuid::parse_str(raw) {
            Ok(order_id) => {
                index.insert(order_id, bill.id);
            }
            Err(_) => debug!(bill_id = %bill.id, "bill metadata carries an unparseable order_id"),
        }
    }
    index
}

fn flatten_single<R, T>(
    entity: &'static str,
    id: Uuid,
    fetched: Result<Option<R>, BackendError>,
) -> Option<T>
where
    T: TryFrom<R, Error = ShapeError>,
{
    match fetched {
        Ok(Some(row)) => match T::try_from(row) {
            Ok(record) => Some(record),
            Err(e) => {
                error!(entity, id = %id, error = %e, "payload failed shape validation");
                None
            }
        },
        Ok(None) => {
            debug!(entity, id = %id, "no visible row");
            None
        }
        Err(e) => {
            error!(entity, id = %id, error = %e, "fetch failed");
            None
        }
    }
}

fn flatten_list<R, T>(
    entity: &'static str,
    fetched: Result<(Vec<R>, i64), BackendError>,
    page: Page,
) -> PaginatedResponse<T>
where
    T: TryFrom<R, Error = ShapeError>,
{
    let (rows, total) = match fetched {
        Ok(fetched) => fetched,
        Err(e) => {
            error!(entity, error = %e, "listing fetch failed");
            return PaginatedResponse::empty(page);
        }
    };

    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        match T::try_from(row) {
            Ok(record) => data.push(record),
            Err(e) => {
                error!(entity, error = %e, "listing payload failed shape validation");
                return PaginatedResponse::empty(page);
            }
        }
    }

    PaginatedResponse {
        data,
        total,
        page: page.number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn bill(metadata: serde_json::Value) -> BillRow {
        BillRow {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            metadata,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_bill_index_ignores_unlinked_bills() {
        let order_id = Uuid::new_v4();
        let linked = bill(json!({ "order_id": order_id }));
        let unlinked = bill(json!({}));
        let garbage = bill(json!({ "order_id": "not-a-uuid" }));

        let index = bill_index(&[linked.clone(), unlinked, garbage]);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&order_id], linked.id);
    }

    #[test]
    fn test_bill_index_last_write_wins() {
        let order_id = Uuid::new_v4();
        let older = bill(json!({ "order_id": order_id }));
        let newer = bill(json!({ "order_id": order_id }));

        let index = bill_index(&[older, newer.clone()]);
        assert_eq!(index[&order_id], newer.id);
    }
}
