//! Order store failure modes on disk.
//!
//! GREEN when:
//! - A missing or unparsable orders file reads as "no orders yet".
//! - Finalizing over an unparsable file starts a fresh collection and keeps
//!   the unparsable bytes in `<file>.corrupt`.
//! - Orders written to disk load back in append order, attributes included.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use vsc_catalog::CatalogIndex;
use vsc_ledger::OrderLedger;
use vsc_schemas::{CartLine, Item, Order, ATTR_SIZE};
use vsc_store::JsonFileStore;

fn setup(dir: &tempfile::TempDir) -> (OrderLedger, std::path::PathBuf) {
    let path = dir.path().join("orders.json");
    let catalog = Arc::new(CatalogIndex::new(vec![Item::new(
        "tee-001", "Cotton Tee", 799, "INR", "tshirt",
    )
    .unwrap()
    .with_sizes(["S", "M"])]));
    let store: Arc<JsonFileStore<Order>> = Arc::new(JsonFileStore::new(&path));
    (OrderLedger::new(catalog, store), path)
}

fn tee(size: &str, qty: u32) -> CartLine {
    CartLine {
        item_id: "tee-001".into(),
        name: "Cotton Tee".into(),
        unit_price: 799,
        currency: "INR".into(),
        quantity: qty,
        attributes: BTreeMap::from([(ATTR_SIZE.to_string(), size.to_string())]),
    }
}

#[test]
fn missing_file_means_no_orders() {
    let dir = tempfile::tempdir().unwrap();
    let (ledger, _) = setup(&dir);
    assert!(ledger.last_order().is_none());
}

#[test]
fn corrupt_file_reads_empty_and_is_preserved_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let (ledger, path) = setup(&dir);
    fs::write(&path, "{ this is not json").unwrap();

    assert!(ledger.last_order().is_none());

    let order = ledger.finalize(&[tee("M", 1)]).unwrap();

    assert_eq!(ledger.last_order().unwrap(), order);
    let backup = dir.path().join("orders.json.corrupt");
    assert_eq!(fs::read_to_string(backup).unwrap(), "{ this is not json");
}

#[test]
fn orders_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let (ledger, path) = setup(&dir);

    let a = ledger.finalize(&[tee("S", 1)]).unwrap();
    let b = ledger.finalize(&[tee("M", 2)]).unwrap();

    let (reopened, _) = setup(&dir);
    let orders = reopened.orders();
    assert_eq!(orders, vec![a, b.clone()]);
    assert_eq!(orders[1].lines[0].attributes.get(ATTR_SIZE).map(String::as_str), Some("M"));
    assert_eq!(orders[1].total, 1598);
    assert!(fs::read_to_string(path).unwrap().contains(&b.order_id));
}
