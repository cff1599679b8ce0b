use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Item, ATTR_SIZE};

/// One cart entry. Name, price and currency are captured from the catalog
/// when the line is first added and are not re-fetched afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: i64,
    pub currency: String,
    /// Always > 0 while the line is stored.
    pub quantity: u32,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl CartLine {
    pub fn from_item(item: &Item, quantity: u32, attributes: BTreeMap<String, String>) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            currency: item.currency.clone(),
            quantity,
            attributes,
        }
    }

    /// `None` when `unit_price × quantity` does not fit in an `i64`.
    pub fn checked_line_total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }

    /// Saturating form of [`CartLine::checked_line_total`], for display.
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }

    pub fn size(&self) -> Option<&str> {
        self.attributes.get(ATTR_SIZE).map(String::as_str)
    }
}

/// Σ line totals, or `None` on overflow anywhere in the sum.
pub fn checked_cart_total(lines: &[CartLine]) -> Option<i64> {
    lines
        .iter()
        .try_fold(0i64, |acc, l| acc.checked_add(l.checked_line_total()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price: i64, quantity: u32) -> CartLine {
        CartLine {
            item_id: "gold-1".into(),
            name: "Gold Bar".into(),
            unit_price,
            currency: "INR".into(),
            quantity,
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn overflowing_line_total_is_detected() {
        let big = line(1 << 62, 2);
        assert_eq!(big.checked_line_total(), None);
        assert_eq!(big.line_total(), i64::MAX);
        assert_eq!(line(299, 3).checked_line_total(), Some(897));
    }

    #[test]
    fn overflowing_sum_is_detected() {
        let half = line(1 << 62, 1);
        assert_eq!(checked_cart_total(&[half.clone()]), Some(1 << 62));
        assert_eq!(checked_cart_total(&[half.clone(), half]), None);
        assert_eq!(checked_cart_total(&[]), Some(0));
    }
}
