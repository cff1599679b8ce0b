use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use vsc_catalog::CatalogIndex;
use vsc_schemas::{new_order_id, CartLine, Order, OrderLine};
use vsc_store::Repository;

use crate::LedgerError;

pub struct OrderLedger {
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn Repository<Order>>,
}

impl OrderLedger {
    pub fn new(catalog: Arc<CatalogIndex>, store: Arc<dyn Repository<Order>>) -> Self {
        Self { catalog, store }
    }

    /// Price `lines` from the catalog, stamp the order now and append it.
    pub fn finalize(&self, lines: &[CartLine]) -> Result<Order, LedgerError> {
        self.finalize_at(lines, Utc::now())
    }

    /// [`OrderLedger::finalize`] with an explicit timestamp.
    ///
    /// Every line is priced before anything is written: an unknown item id,
    /// a currency conflict or an overflowing total fails the whole order and
    /// the store is not touched.
    pub fn finalize_at(
        &self,
        lines: &[CartLine],
        created_at: DateTime<Utc>,
    ) -> Result<Order, LedgerError> {
        let order = self.price(lines, created_at)?;

        let mut pending = Some(order.clone());
        self.store.update(&mut |orders| match pending.take() {
            Some(o) => {
                orders.push(o);
                true
            }
            None => false,
        })?;

        info!(
            order_id = %order.order_id,
            total = order.total,
            currency = %order.currency,
            lines = order.lines.len(),
            store = %self.store.describe(),
            "order persisted"
        );
        Ok(order)
    }

    /// Most recently appended order. An empty or unreadable store gives
    /// `None`.
    pub fn last_order(&self) -> Option<Order> {
        self.store.load_or_empty().pop()
    }

    /// Every persisted order, oldest first.
    pub fn orders(&self) -> Vec<Order> {
        self.store.load_or_empty()
    }

    fn price(&self, lines: &[CartLine], created_at: DateTime<Utc>) -> Result<Order, LedgerError> {
        if lines.is_empty() {
            return Err(LedgerError::EmptyCart);
        }

        let mut currency: Option<String> = None;
        let mut priced = Vec::with_capacity(lines.len());
        let mut total: i64 = 0;
        for line in lines {
            let item = self
                .catalog
                .get(&line.item_id)
                .ok_or_else(|| LedgerError::UnknownItem {
                    item_id: line.item_id.clone(),
                })?;

            match &currency {
                None => currency = Some(item.currency.clone()),
                Some(first) if *first != item.currency => {
                    return Err(LedgerError::MixedCurrency {
                        first: first.clone(),
                        other: item.currency.clone(),
                    })
                }
                Some(_) => {}
            }

            let overflow = || LedgerError::TotalOverflow {
                item_id: item.id.clone(),
            };
            let line_total = item
                .unit_price
                .checked_mul(i64::from(line.quantity))
                .ok_or_else(overflow)?;
            total = total.checked_add(line_total).ok_or_else(overflow)?;

            priced.push(OrderLine {
                item_id: item.id.clone(),
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: line.quantity,
                line_total,
                attributes: line.attributes.clone(),
            });
        }

        Ok(Order {
            order_id: new_order_id(),
            total,
            lines: priced,
            currency: currency.unwrap_or_default(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use vsc_schemas::Item;
    use vsc_store::InMemoryStore;

    use super::*;

    fn ledger() -> (OrderLedger, Arc<InMemoryStore<Order>>) {
        let catalog = Arc::new(CatalogIndex::new(vec![
            Item::new("mug-001", "Chai Mug", 299, "INR", "mug").unwrap(),
            Item::new("mug-usd", "Mug", 5, "USD", "mug").unwrap(),
        ]));
        let store = Arc::new(InMemoryStore::new());
        (OrderLedger::new(catalog, store.clone()), store)
    }

    fn line(id: &str, price: i64, currency: &str, qty: u32) -> CartLine {
        CartLine {
            item_id: id.to_string(),
            name: id.to_string(),
            unit_price: price,
            currency: currency.to_string(),
            quantity: qty,
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_cart_is_rejected_without_write() {
        let (ledger, store) = ledger();
        let err = ledger.finalize(&[]).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyCart));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn reprices_from_catalog() {
        let (ledger, _) = ledger();
        // Captured price 1 is ignored; the catalog says 299.
        let order = ledger.finalize(&[line("mug-001", 1, "INR", 2)]).unwrap();
        assert_eq!(order.lines[0].unit_price, 299);
        assert_eq!(order.total, 598);
        assert_eq!(order.currency, "INR");
    }

    #[test]
    fn overflowing_total_is_refused_without_write() {
        let catalog = Arc::new(CatalogIndex::new(vec![
            Item::new("gold-1", "Gold Bar", 1 << 62, "INR", "bullion").unwrap(),
            Item::new("gold-2", "Gold Coin", 1 << 62, "INR", "bullion").unwrap(),
        ]));
        let store = Arc::new(InMemoryStore::new());
        let ledger = OrderLedger::new(catalog, store.clone());

        // One line whose total overflows.
        let err = ledger.finalize(&[line("gold-1", 1, "INR", 2)]).unwrap_err();
        assert!(matches!(err, LedgerError::TotalOverflow { ref item_id } if item_id == "gold-1"));
        assert_eq!(err.kind(), vsc_schemas::ErrorKind::IntegrityViolation);

        // Two lines that fit alone but not summed.
        let err = ledger
            .finalize(&[line("gold-1", 1, "INR", 1), line("gold-2", 1, "INR", 1)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::TotalOverflow { ref item_id } if item_id == "gold-2"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn mixed_currency_is_an_integrity_violation() {
        let (ledger, store) = ledger();
        let err = ledger
            .finalize(&[line("mug-001", 299, "INR", 1), line("mug-usd", 5, "USD", 1)])
            .unwrap_err();
        assert_eq!(err.kind(), vsc_schemas::ErrorKind::IntegrityViolation);
        assert!(store.load().unwrap().is_empty());
    }
}
