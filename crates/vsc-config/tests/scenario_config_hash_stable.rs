//! Layered config hashing and the typed shop view.
//!
//! GREEN when:
//! - The same documents hash identically regardless of key order.
//! - Any value change moves the hash.
//! - Secret-looking literals abort loading without echoing the value.
//! - Missing sections fall back to defaults; a zero search limit is rejected.

use std::path::{Path, PathBuf};

use vsc_config::{load_layered_yaml, load_layered_yaml_from_strings, ShopConfig};

const BASE: &str = r#"
shop:
  name: Dr Abhishek Shop
  currency: INR
data:
  catalog_path: catalog.json
  orders_path: orders.json
"#;

const BASE_REORDERED: &str = r#"
data:
  orders_path: orders.json
  catalog_path: catalog.json
shop:
  currency: INR
  name: Dr Abhishek Shop
"#;

#[test]
fn hash_is_independent_of_key_order() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn hash_changes_when_a_value_changes() {
    let a = load_layered_yaml_from_strings(&[BASE]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE, "shop:\n  search_limit: 3\n"]).unwrap();
    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn secret_literal_is_rejected_and_redacted() {
    let leaked = "speech:\n  api_key: sk-live-0123456789abcdef\n";
    let err = load_layered_yaml_from_strings(&[BASE, leaked]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("CONFIG_SECRET_DETECTED"), "got: {msg}");
    assert!(msg.contains("/speech/api_key"), "got: {msg}");
    assert!(!msg.contains("0123456789abcdef"), "secret leaked: {msg}");
}

#[test]
fn typed_view_applies_defaults() {
    let cfg = load_layered_yaml_from_strings(&["data:\n  orders_path: o.json\n"])
        .unwrap()
        .shop_config()
        .unwrap();
    assert_eq!(cfg.shop.currency, "INR");
    assert_eq!(cfg.shop.search_limit, 6);
    assert_eq!(cfg.data.catalog_path, None);
    assert_eq!(cfg.data.orders_path, PathBuf::from("o.json"));
    assert_eq!(cfg.data.fraud_cases_path, PathBuf::from("fraud_cases.json"));
}

#[test]
fn zero_search_limit_is_rejected() {
    let loaded = load_layered_yaml_from_strings(&["shop:\n  search_limit: 0\n"]).unwrap();
    assert!(loaded.shop_config().is_err());
}

#[test]
fn relative_paths_resolve_against_data_dir() {
    let cfg = load_layered_yaml_from_strings(&[BASE]).unwrap().shop_config().unwrap();
    let resolved = cfg.resolve_data_paths(Some(Path::new("/srv/shop")));
    assert_eq!(
        resolved.catalog_path,
        Some(PathBuf::from("/srv/shop/catalog.json"))
    );
    assert_eq!(resolved.orders_path, PathBuf::from("/srv/shop/orders.json"));

    let untouched = cfg.resolve_data_paths(None);
    assert_eq!(untouched.orders_path, PathBuf::from("orders.json"));
}

#[test]
fn files_load_in_merge_order() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.yaml");
    let local = dir.path().join("local.yaml");
    std::fs::write(&base, BASE).unwrap();
    std::fs::write(&local, "shop:\n  name: Night Market\n").unwrap();

    let loaded = load_layered_yaml(&[
        base.to_str().unwrap(),
        local.to_str().unwrap(),
    ])
    .unwrap();
    let cfg: ShopConfig = loaded.shop_config().unwrap();
    assert_eq!(cfg.shop.name, "Night Market");
    assert_eq!(cfg.shop.currency, "INR");
}
