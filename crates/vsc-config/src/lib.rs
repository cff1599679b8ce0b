//! vsc-config
//!
//! Layered YAML configuration for the voice shop.
//!
//! Documents are merged in order (later documents override earlier ones),
//! converted to JSON and hashed over the canonical compact form so a
//! session's logs can be correlated with the exact configuration it ran
//! under. [`ShopConfig`] is the typed view every other crate consumes.

mod shop;

pub use shop::{DataPaths, ShopConfig, ShopSection, DATA_DIR_ENV};

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Known secret-like prefixes. Config files hold data paths and display
/// settings only; a leaf string starting with one of these aborts loading.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // OpenAI style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "xoxb-",      // Slack bot token
    "dg_",        // Deepgram-style speech keys
];

/// Shorter strings are never treated as secrets.
const MIN_SECRET_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Typed view of the merged document. Missing sections take defaults.
    pub fn shop_config(&self) -> Result<ShopConfig> {
        ShopConfig::from_config_json(&self.config_json)
    }
}

/// Read each file and merge them in order.
pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {}", p.display()))
        })
        .collect::<Result<Vec<String>>>()?;
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (n, raw) in yaml_docs.iter().enumerate() {
        // Blank documents parse as null and would wipe the merge.
        if raw.trim().is_empty() {
            continue;
        }
        let doc: Value = serde_yaml::from_str::<serde_yaml::Value>(raw)
            .with_context(|| format!("invalid yaml in document {n}"))
            .and_then(|y| serde_json::to_value(y).context("yaml->json conversion failed"))?;
        merge_into(&mut merged, doc);
    }

    if let Some(leaf) = find_secret_leaf(&merged, &mut String::new()) {
        bail!("CONFIG_SECRET_DETECTED leaf={leaf} value=REDACTED");
    }

    let canonical_json =
        serde_json::to_string(&sorted(&merged)).context("canonical json serialize failed")?;
    let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Overlay `over` onto `base`: objects merge key by key, anything else
/// replaces.
fn merge_into(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            for (key, value) in over_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Copy of `v` with object keys in sorted order at every depth, so the hash
/// does not depend on how the source documents ordered them.
fn sorted(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Depth-first search for a string leaf that looks like a credential.
/// Returns its `/`-separated path; `path` is scratch space.
fn find_secret_leaf(v: &Value, path: &mut String) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            let secret = s.len() >= MIN_SECRET_LEN && SECRET_PREFIXES.iter().any(|p| s.starts_with(p));
            secret.then(|| path.clone())
        }
        Value::Object(map) => map
            .iter()
            .find_map(|(key, child)| descend(path, key, child)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, child)| descend(path, &i.to_string(), child)),
        _ => None,
    }
}

fn descend(path: &mut String, segment: &str, child: &Value) -> Option<String> {
    let mark = path.len();
    path.push('/');
    path.push_str(segment);
    let hit = find_secret_leaf(child, path);
    path.truncate(mark);
    hit
}
