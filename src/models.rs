//! Typed storefront records.
//!
//! These are the flat shapes handed to the HTTP layer after the assemblers
//! discard join scaffolding. Conversions from backend rows parse-or-reject:
//! an unknown enum value or a malformed embedded payload is a [`ShapeError`],
//! never a silently trusted shape.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::{OrderRow, ProductRow, ServiceRow, ShopRow};

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("unknown shop_type `{0}`")]
    ShopType(String),

    #[error("unknown order status `{0}`")]
    OrderStatus(String),

    #[error("malformed order items payload: {0}")]
    OrderItems(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopType {
    Retail,
    Service,
    Both,
}

impl ShopType {
    pub fn sells_products(self) -> bool {
        matches!(self, Self::Retail | Self::Both)
    }

    pub fn sells_services(self) -> bool {
        matches!(self, Self::Service | Self::Both)
    }
}

impl FromStr for ShopType {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retail" => Ok(Self::Retail),
            "service" => Ok(Self::Service),
            "both" => Ok(Self::Both),
            other => Err(ShapeError::ShopType(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    OutForDelivery,
    Completed,
    Cancelled,
}

impl FromStr for OrderStatus {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ShapeError::OrderStatus(other.to_string())),
        }
    }
}

/// Per-language display names, keyed by language code.
pub type LocalizedNames = HashMap<String, String>;

#[derive(Clone, Debug, Serialize)]
pub struct Shop {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub name_ml: Option<LocalizedNames>,
    pub shop_type: ShopType,
    pub is_hidden: bool,
    pub is_verified: bool,
    pub hidden_by_admin: bool,
    pub is_temporarily_closed: bool,
    pub hide_shop_during_closure: bool,
    pub closure_reason: Option<String>,
    pub closure_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = ShapeError;

    fn try_from(row: ShopRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            name_ml: parse_localized(row.name_ml),
            shop_type: row.shop_type.parse()?,
            is_hidden: row.is_hidden,
            is_verified: row.is_verified,
            hidden_by_admin: row.hidden_by_admin,
            is_temporarily_closed: row.is_temporarily_closed,
            hide_shop_during_closure: row.hide_shop_during_closure,
            closure_reason: row.closure_reason,
            closure_end_date: row.closure_end_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub name_ml: Option<LocalizedNames>,
    pub price: Decimal,
    pub mrp: Decimal,
    pub image_urls: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = ShapeError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            shop_id: row.shop_id,
            category_id: row.category_id,
            name: row.name,
            name_ml: parse_localized(row.name_ml),
            price: row.price,
            mrp: row.mrp,
            image_urls: row.image_urls,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// Like [`Product`], but shops offer services without an MRP or a stock
/// notion.
#[derive(Clone, Debug, Serialize)]
pub struct Service {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub name_ml: Option<LocalizedNames>,
    pub price: Decimal,
    pub image_urls: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for Service {
    type Error = ShapeError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            shop_id: row.shop_id,
            category_id: row.category_id,
            name: row.name,
            name_ml: parse_localized(row.name_ml),
            price: row.price,
            image_urls: row.image_urls,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// Shop summary embedded in an order view.
#[derive(Clone, Debug, Serialize)]
pub struct OrderShop {
    pub id: Uuid,
    pub name: String,
    pub name_ml: Option<LocalizedNames>,
}

/// Snapshot of a purchased line. `total` captured the price at order time;
/// the product reference may have vanished since and is therefore optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    pub quantity: i32,
    pub total: Decimal,
    pub product: Option<OrderItemProduct>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItemProduct {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_urls: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: String,
    pub shop: OrderShop,
    pub total_amount: Decimal,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Filled in by bill correlation; stays `None` when no bill claims the
    /// order or the bills fetch was unavailable.
    pub bill_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = ShapeError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_value(row.items)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            shop: OrderShop {
                id: row.shop_id,
                name: row.shop_name,
                name_ml: parse_localized(row.shop_name_ml),
            },
            total_amount: row.total_amount,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            status: row.status.parse()?,
            items,
            bill_id: None,
            created_at: row.created_at,
        })
    }
}

/// Multilingual names are stored as a free-form json object; anything that is
/// not a map of strings is dropped rather than surfaced malformed.
fn parse_localized(value: Option<serde_json::Value>) -> Option<LocalizedNames> {
    value.and_then(|v| serde_json::from_value(v).ok())
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: Uuid,
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
    pub address_line: String,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shop_type_parsing() {
        assert_eq!("retail".parse::<ShopType>().unwrap(), ShopType::Retail);
        assert_eq!("both".parse::<ShopType>().unwrap(), ShopType::Both);
        assert!("grocery".parse::<ShopType>().is_err());

        assert!(ShopType::Retail.sells_products());
        assert!(!ShopType::Retail.sells_services());
        assert!(ShopType::Service.sells_services());
        assert!(ShopType::Both.sells_products() && ShopType::Both.sells_services());
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!(
            "out_for_delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    fn order_row(status: &str, items: serde_json::Value) -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            shop_id: Uuid::new_v4(),
            shop_name: "Corner Store".into(),
            shop_name_ml: Some(json!({"ml": "കോർണർ സ്റ്റോർ"})),
            total_amount: Decimal::new(4999, 2),
            customer_name: Some("Asha".into()),
            customer_phone: None,
            customer_address: None,
            status: status.into(),
            items,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_from_row() {
        let product_id = Uuid::new_v4();
        let row = order_row(
            "accepted",
            json!([
                {"quantity": 2, "total": "39.98", "product": {
                    "id": product_id, "name": "Soap", "price": "19.99", "image_urls": []
                }},
                {"quantity": 1, "total": "10.01", "product": null}
            ]),
        );

        let order = Order::try_from(row).unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product.as_ref().unwrap().id, product_id);
        assert!(order.items[1].product.is_none());
        assert_eq!(order.shop.name_ml.unwrap()["ml"], "കോർണർ സ്റ്റോർ");
        assert!(order.bill_id.is_none());
    }

    #[test]
    fn test_order_rejects_malformed_payloads() {
        let bad_items = order_row("accepted", json!({"quantity": "not-a-list"}));
        assert!(matches!(
            Order::try_from(bad_items),
            Err(ShapeError::OrderItems(_))
        ));

        let bad_status = order_row("shipped", json!([]));
        assert!(matches!(
            Order::try_from(bad_status),
            Err(ShapeError::OrderStatus(_))
        ));
    }
}
