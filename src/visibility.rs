//! Storefront visibility rules.
//!
//! A shop is shown to anonymous visitors only when its own flags and its
//! owning business's flag all allow it. The rule exists twice, deliberately:
//! once as a pure predicate for in-memory callers, and once as a SQL fragment
//! that every catalog query embeds so filtering happens in the database and
//! pagination counts only visible rows.

use crate::backend::{BusinessRow, ShopRow};

/// SQL form of [`shop_visible`]. Queries embedding it must alias `shops` as
/// `s` and `businesses` as `b`, joined with an inner join so that a shop
/// whose business row is missing drops out of the result set entirely.
pub const SHOP_VISIBLE_SQL: &str = "s.is_hidden = FALSE AND s.hidden_by_admin = FALSE \
     AND s.is_verified = TRUE AND b.is_hidden = FALSE";

/// SQL filter for product/service rows aliased as `p`.
pub const ITEM_ACTIVE_SQL: &str = "p.is_active = TRUE AND p.hidden_by_admin = FALSE";

/// Shop-type filters for listings: a products listing only draws from shops
/// that sell products, and likewise for services.
pub const SELLS_PRODUCTS_SQL: &str = "s.shop_type IN ('retail', 'both')";
pub const SELLS_SERVICES_SQL: &str = "s.shop_type IN ('service', 'both')";

/// Whether a shop is visible to an anonymous storefront visitor.
///
/// A missing owning business means the shop is an orphan; orphans are never
/// visible (fail closed).
pub fn shop_visible(shop: &ShopRow, business: Option<&BusinessRow>) -> bool {
    let Some(business) = business else {
        return false;
    };
    !shop.is_hidden && !shop.hidden_by_admin && shop.is_verified && !business.is_hidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn business(is_hidden: bool) -> BusinessRow {
        BusinessRow {
            id: Uuid::new_v4(),
            name: "Acme Traders".into(),
            is_hidden,
            created_at: Utc::now(),
        }
    }

    fn shop(is_hidden: bool, hidden_by_admin: bool, is_verified: bool) -> ShopRow {
        ShopRow {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Corner Store".into(),
            name_ml: None,
            shop_type: "retail".into(),
            is_hidden,
            is_verified,
            hidden_by_admin,
            is_temporarily_closed: false,
            hide_shop_during_closure: false,
            closure_reason: None,
            closure_end_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_flags_visible() {
        assert!(shop_visible(&shop(false, false, true), Some(&business(false))));
    }

    #[test]
    fn test_each_flag_hides_independently() {
        assert!(!shop_visible(&shop(true, false, true), Some(&business(false))));
        assert!(!shop_visible(&shop(false, true, true), Some(&business(false))));
        assert!(!shop_visible(&shop(false, false, false), Some(&business(false))));
        assert!(!shop_visible(&shop(false, false, true), Some(&business(true))));
    }

    #[test]
    fn test_orphaned_shop_fails_closed() {
        assert!(!shop_visible(&shop(false, false, true), None));
    }
}
