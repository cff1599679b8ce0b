//! Finalized orders are immutable and all-or-nothing.
//!
//! GREEN when:
//! - Mutating or clearing the cart after `finalize` leaves the persisted
//!   order's lines and total unchanged.
//! - A line with an unknown item id fails the whole order: nothing is
//!   appended and the error is an integrity violation.
//! - `last_order` returns the most recent append.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use vsc_cart::CartStore;
use vsc_catalog::CatalogIndex;
use vsc_ledger::{LedgerError, OrderLedger};
use vsc_schemas::{CartLine, ErrorKind, Item, Order};
use vsc_store::{InMemoryStore, Repository};

fn catalog() -> Arc<CatalogIndex> {
    Arc::new(CatalogIndex::new(vec![
        Item::new("hoodie-A", "Cozy Hoodie", 1499, "INR", "hoodie").unwrap(),
        Item::new("hoodie-B", "Zip Hoodie", 1299, "INR", "hoodie").unwrap(),
    ]))
}

#[test]
fn cart_mutation_after_finalize_does_not_touch_order() {
    let catalog = catalog();
    let store: Arc<InMemoryStore<Order>> = Arc::new(InMemoryStore::new());
    let ledger = OrderLedger::new(catalog.clone(), store.clone());
    let mut cart = CartStore::new(catalog);

    cart.add("second hoodie", 2, BTreeMap::new()).unwrap();
    let order = ledger.finalize(cart.lines()).unwrap();
    assert_eq!(order.total, 2598);

    // WHEN: the cart keeps changing after checkout
    cart.add("hoodie-A", 5, BTreeMap::new()).unwrap();
    cart.update("zip", 9).unwrap();
    cart.clear();

    // THEN: the persisted order is exactly what finalize returned
    let persisted = store.load().unwrap();
    assert_eq!(persisted, vec![order.clone()]);
    assert_eq!(ledger.last_order().unwrap().total, 2598);
    assert_eq!(ledger.last_order().unwrap().item_count(), 2);
}

#[test]
fn unknown_item_fails_without_partial_order() {
    let store: Arc<InMemoryStore<Order>> = Arc::new(InMemoryStore::new());
    let ledger = OrderLedger::new(catalog(), store.clone());

    let lines = vec![
        CartLine {
            item_id: "hoodie-A".into(),
            name: "Cozy Hoodie".into(),
            unit_price: 1499,
            currency: "INR".into(),
            quantity: 1,
            attributes: BTreeMap::new(),
        },
        CartLine {
            item_id: "discontinued-9".into(),
            name: "Gone".into(),
            unit_price: 10,
            currency: "INR".into(),
            quantity: 1,
            attributes: BTreeMap::new(),
        },
    ];

    let err = ledger.finalize(&lines).unwrap_err();

    assert!(matches!(err, LedgerError::UnknownItem { ref item_id } if item_id == "discontinued-9"));
    assert_eq!(err.kind(), ErrorKind::IntegrityViolation);
    assert!(store.load().unwrap().is_empty());
    assert!(ledger.last_order().is_none());
}

#[test]
fn last_order_is_latest_append() {
    let catalog = catalog();
    let ledger = OrderLedger::new(catalog.clone(), Arc::new(InMemoryStore::new()));
    let mut cart = CartStore::new(catalog);

    cart.add("hoodie-A", 1, BTreeMap::new()).unwrap();
    let first = ledger
        .finalize_at(cart.lines(), Utc.with_ymd_and_hms(2025, 11, 20, 10, 0, 0).unwrap())
        .unwrap();
    cart.clear();
    cart.add("hoodie-B", 3, BTreeMap::new()).unwrap();
    let second = ledger
        .finalize_at(cart.lines(), Utc.with_ymd_and_hms(2025, 11, 20, 10, 5, 0).unwrap())
        .unwrap();

    assert_ne!(first.order_id, second.order_id);
    assert_eq!(ledger.last_order().unwrap(), second);
    assert_eq!(ledger.orders().len(), 2);
}
