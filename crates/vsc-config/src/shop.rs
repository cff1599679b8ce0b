use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relative data paths are resolved against this directory when it is set.
pub const DATA_DIR_ENV: &str = "VSC_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSection {
    pub name: String,
    /// Currency of every cart and order produced by this shop.
    pub currency: String,
    /// Maximum number of items read back by a search.
    pub search_limit: usize,
}

impl Default for ShopSection {
    fn default() -> Self {
        Self {
            name: "Voice Shop".to_string(),
            currency: "INR".to_string(),
            search_limit: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// `None` selects the built-in demo catalog.
    pub catalog_path: Option<PathBuf>,
    /// `None` disables recipe expansion.
    pub recipes_path: Option<PathBuf>,
    pub orders_path: PathBuf,
    pub fraud_cases_path: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            catalog_path: None,
            recipes_path: None,
            orders_path: PathBuf::from("orders.json"),
            fraud_cases_path: PathBuf::from("fraud_cases.json"),
        }
    }
}

/// Typed configuration consumed by the catalog, stores and tool layer.
///
/// ```yaml
/// shop:
///   name: Dr Abhishek Shop
///   currency: INR
///   search_limit: 6
/// data:
///   catalog_path: catalog.json
///   recipes_path: recipes.json
///   orders_path: orders.json
///   fraud_cases_path: fraud_cases.json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub shop: ShopSection,
    pub data: DataPaths,
}

impl ShopConfig {
    /// Build from the merged config JSON produced by [`crate::load_layered_yaml`].
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let parsed: ShopConfig = serde_json::from_value(cfg.clone())
            .context("config does not match the shop/data schema")?;

        if parsed.shop.search_limit == 0 {
            bail!("shop.search_limit must be > 0");
        }
        if parsed.shop.currency.trim().is_empty() {
            bail!("shop.currency must not be empty");
        }
        Ok(parsed)
    }

    /// Data paths with relative entries joined onto `data_dir`.
    pub fn resolve_data_paths(&self, data_dir: Option<&Path>) -> DataPaths {
        let join = |p: &Path| -> PathBuf {
            match data_dir {
                Some(dir) if p.is_relative() => dir.join(p),
                _ => p.to_path_buf(),
            }
        };
        DataPaths {
            catalog_path: self.data.catalog_path.as_deref().map(join),
            recipes_path: self.data.recipes_path.as_deref().map(join),
            orders_path: join(&self.data.orders_path),
            fraud_cases_path: join(&self.data.fraud_cases_path),
        }
    }

    /// [`Self::resolve_data_paths`] using the `VSC_DATA_DIR` environment variable.
    pub fn resolve_data_paths_from_env(&self) -> DataPaths {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.resolve_data_paths(dir.as_deref())
    }
}
