use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priced snapshot of one cart line at finalize time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(alias = "product_id")]
    pub item_id: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    pub line_total: i64,
    #[serde(default, alias = "attrs")]
    pub attributes: BTreeMap<String, String>,
}

/// A finalized transaction. Immutable once persisted: `total` is the sum of
/// `line_total` at finalize time and is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "id")]
    pub order_id: String,
    #[serde(alias = "items")]
    pub lines: Vec<OrderLine>,
    pub total: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// `order-` followed by the first 8 hex characters of a fresh v4 UUID.
pub fn new_order_id() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(8);
    format!("order-{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_shape() {
        let id = new_order_id();
        assert!(id.starts_with("order-"));
        assert_eq!(id.len(), "order-".len() + 8);
        assert!(id["order-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn legacy_field_names_load() {
        let raw = r#"{
            "id": "order-1a2b3c4d",
            "items": [{"product_id": "mug-001", "name": "Mug", "unit_price": 299,
                       "quantity": 2, "line_total": 598, "attrs": {}}],
            "total": 598,
            "currency": "INR",
            "created_at": "2025-11-20T10:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.order_id, "order-1a2b3c4d");
        assert_eq!(order.lines[0].item_id, "mug-001");
        assert_eq!(order.item_count(), 2);
    }
}
