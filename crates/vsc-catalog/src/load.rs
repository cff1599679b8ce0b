use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};
use vsc_schemas::Item;

use crate::CatalogIndex;

const DEMO_CATALOG: &str = include_str!("../data/demo_catalog.json");

/// Outcome of validating a catalog document record by record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogLoadReport {
    pub loaded: usize,
    /// One human-readable reason per rejected record, in file order.
    pub rejected: Vec<String>,
}

impl CatalogLoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate a JSON array of item records.
///
/// Records missing `currency` take `default_currency`. Invalid records and
/// duplicate ids (first occurrence wins) are skipped and reported. A
/// document that is not a JSON array yields an empty catalog with a single
/// rejection.
pub fn parse_catalog(raw: &str, default_currency: &str) -> (CatalogIndex, CatalogLoadReport) {
    let mut report = CatalogLoadReport::default();

    let records: Vec<Value> = match serde_json::from_str(raw) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            report.rejected.push("catalog document is not a JSON array".to_string());
            return (CatalogIndex::default(), report);
        }
        Err(e) => {
            report.rejected.push(format!("catalog document is not valid JSON: {e}"));
            return (CatalogIndex::default(), report);
        }
    };

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(records.len());
    for (i, mut record) in records.into_iter().enumerate() {
        if let Value::Object(map) = &mut record {
            if !map.contains_key("currency") {
                map.insert("currency".to_string(), Value::String(default_currency.to_string()));
            }
        }
        match serde_json::from_value::<Item>(record) {
            Ok(item) if !seen.insert(item.id.clone()) => {
                report
                    .rejected
                    .push(format!("record {i}: duplicate id `{}`", item.id));
            }
            Ok(item) => items.push(item),
            Err(e) => report.rejected.push(format!("record {i}: {e}")),
        }
    }

    for reason in &report.rejected {
        warn!(reason = %reason, "catalog record rejected");
    }
    report.loaded = items.len();
    (CatalogIndex::new(items), report)
}

/// Load a catalog file. A missing or unreadable file yields an empty
/// catalog with a logged warning; the session keeps running.
pub fn load_catalog(path: &Path, default_currency: &str) -> (CatalogIndex, CatalogLoadReport) {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "catalog unavailable; using empty catalog");
            let report = CatalogLoadReport {
                loaded: 0,
                rejected: vec![format!("cannot read {}: {e}", path.display())],
            };
            return (CatalogIndex::default(), report);
        }
    };
    let (index, report) = parse_catalog(&raw, default_currency);
    info!(
        path = %path.display(),
        loaded = report.loaded,
        rejected = report.rejected.len(),
        "catalog loaded"
    );
    (index, report)
}

/// The built-in demo catalog: mugs, tees, hoodies, raincoats and phones.
pub fn demo_catalog() -> CatalogIndex {
    parse_catalog(DEMO_CATALOG, "INR").0
}
