//! PostgreSQL implementation of [`CatalogBackend`].
//!
//! Every operation is one statement. Visibility is enforced by the WHERE
//! clause fragments from [`crate::visibility`]; businesses are always inner
//! joined so an orphaned shop never surfaces. Aliases follow the fragment
//! convention: `s` = shops, `b` = businesses, `p` = products/services.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::page::Page;
use crate::visibility::{
    ITEM_ACTIVE_SQL, SELLS_PRODUCTS_SQL, SELLS_SERVICES_SQL, SHOP_VISIBLE_SQL,
};

use super::{
    at_most_one, BackendError, BillRow, CatalogBackend, OrderRow, ProductRow, ServiceRow, ShopRow,
};

const SHOP_COLUMNS: &str = "s.id, s.business_id, s.name, s.name_ml, s.shop_type, \
     s.is_hidden, s.is_verified, s.hidden_by_admin, s.is_temporarily_closed, \
     s.hide_shop_during_closure, s.closure_reason, s.closure_end_date, s.created_at";

const PRODUCT_COLUMNS: &str = "p.id, p.shop_id, p.category_id, p.name, p.name_ml, \
     p.price, p.mrp, p.image_urls, p.is_active, p.hidden_by_admin, p.created_at";

const SERVICE_COLUMNS: &str = "p.id, p.shop_id, p.category_id, p.name, p.name_ml, \
     p.price, p.image_urls, p.is_active, p.hidden_by_admin, p.created_at";

/// Order plus shop plus items, assembled in one round trip. Items are
/// embedded as a json aggregate; decimals are cast to text so the payload
/// survives the json hop without losing precision. The product side of each
/// item is a left join: a vanished product leaves the snapshot intact.
const ORDER_SELECT: &str = "SELECT o.id, o.user_id, o.shop_id, s.name AS shop_name, \
     s.name_ml AS shop_name_ml, o.total_amount, o.customer_name, o.customer_phone, \
     o.customer_address, o.status, COALESCE(oi.items, '[]'::jsonb) AS items, o.created_at \
     FROM orders o \
     JOIN shops s ON s.id = o.shop_id \
     JOIN businesses b ON b.id = s.business_id \
     LEFT JOIN LATERAL ( \
         SELECT jsonb_agg(jsonb_build_object( \
             'quantity', i.quantity, \
             'total', i.total::TEXT, \
             'product', CASE WHEN p.id IS NULL THEN NULL ELSE jsonb_build_object( \
                 'id', p.id, 'name', p.name, 'price', p.price::TEXT, \
                 'image_urls', p.image_urls) END \
         ) ORDER BY i.id) AS items \
         FROM order_items i \
         LEFT JOIN products p ON p.id = i.product_id \
         WHERE i.order_id = o.id \
     ) oi ON TRUE";

#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogBackend for PgBackend {
    async fn shop_by_id(&self, id: Uuid) -> Result<Option<ShopRow>, BackendError> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS} FROM shops s \
             JOIN businesses b ON b.id = s.business_id \
             WHERE s.id = $1 AND {SHOP_VISIBLE_SQL}"
        );
        let rows = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        at_most_one(rows, "shop", id)
    }

    async fn visible_shops(&self, page: Page) -> Result<(Vec<ShopRow>, i64), BackendError> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS} FROM shops s \
             JOIN businesses b ON b.id = s.business_id \
             WHERE {SHOP_VISIBLE_SQL} \
             ORDER BY s.created_at DESC, s.id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM shops s \
             JOIN businesses b ON b.id = s.business_id \
             WHERE {SHOP_VISIBLE_SQL}"
        );
        let total: (i64,) = sqlx::query_as(&count_sql).fetch_one(&self.pool).await?;
        Ok((rows, total.0))
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<ProductRow>, BackendError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN shops s ON s.id = p.shop_id \
             JOIN businesses b ON b.id = s.business_id \
             WHERE p.id = $1 AND {ITEM_ACTIVE_SQL} AND {SHOP_VISIBLE_SQL}"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        at_most_one(rows, "product", id)
    }

    async fn visible_products(
        &self,
        shop_id: Option<Uuid>,
        page: Page,
    ) -> Result<(Vec<ProductRow>, i64), BackendError> {
        let base = format!(
            "FROM products p \
             JOIN shops s ON s.id = p.shop_id \
             JOIN businesses b ON b.id = s.business_id \
             WHERE {ITEM_ACTIVE_SQL} AND {SHOP_VISIBLE_SQL} AND {SELLS_PRODUCTS_SQL}"
        );
        match shop_id {
            Some(shop) => {
                let rows = sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} {base} AND p.shop_id = $1 \
                     ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"
                ))
                .bind(shop)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: (i64,) =
                    sqlx::query_as(&format!("SELECT COUNT(*) {base} AND p.shop_id = $1"))
                        .bind(shop)
                        .fetch_one(&self.pool)
                        .await?;
                Ok((rows, total.0))
            }
            None => {
                let rows = sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} {base} \
                     ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2"
                ))
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) {base}"))
                    .fetch_one(&self.pool)
                    .await?;
                Ok((rows, total.0))
            }
        }
    }

    async fn service_by_id(&self, id: Uuid) -> Result<Option<ServiceRow>, BackendError> {
        let sql = format!(
            "SELECT {SERVICE_COLUMNS} FROM services p \
             JOIN shops s ON s.id = p.shop_id \
             JOIN businesses b ON b.id = s.business_id \
             WHERE p.id = $1 AND {ITEM_ACTIVE_SQL} AND {SHOP_VISIBLE_SQL}"
        );
        let rows = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        at_most_one(rows, "service", id)
    }

    async fn visible_services(
        &self,
        shop_id: Option<Uuid>,
        page: Page,
    ) -> Result<(Vec<ServiceRow>, i64), BackendError> {
        let base = format!(
            "FROM services p \
             JOIN shops s ON s.id = p.shop_id \
             JOIN businesses b ON b.id = s.business_id \
             WHERE {ITEM_ACTIVE_SQL} AND {SHOP_VISIBLE_SQL} AND {SELLS_SERVICES_SQL}"
        );
        match shop_id {
            Some(shop) => {
                let rows = sqlx::query_as::<_, ServiceRow>(&format!(
                    "SELECT {SERVICE_COLUMNS} {base} AND p.shop_id = $1 \
                     ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"
                ))
                .bind(shop)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: (i64,) =
                    sqlx::query_as(&format!("SELECT COUNT(*) {base} AND p.shop_id = $1"))
                        .bind(shop)
                        .fetch_one(&self.pool)
                        .await?;
                Ok((rows, total.0))
            }
            None => {
                let rows = sqlx::query_as::<_, ServiceRow>(&format!(
                    "SELECT {SERVICE_COLUMNS} {base} \
                     ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2"
                ))
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) {base}"))
                    .fetch_one(&self.pool)
                    .await?;
                Ok((rows, total.0))
            }
        }
    }

    async fn order_by_id(&self, id: Uuid) -> Result<Option<OrderRow>, BackendError> {
        let sql = format!("{ORDER_SELECT} WHERE o.id = $1 AND {SHOP_VISIBLE_SQL}");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        at_most_one(rows, "order", id)
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRow>, BackendError> {
        let sql = format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 AND {SHOP_VISIBLE_SQL} \
             ORDER BY o.created_at DESC, o.id DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn bills_for_user(&self, user_id: &str) -> Result<Vec<BillRow>, BackendError> {
        // Oldest first: the correlation map is last-write-wins, so the newest
        // bill claiming an order ends up in the map.
        let rows = sqlx::query_as::<_, BillRow>(
            "SELECT id, user_id, metadata, created_at FROM bills \
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
