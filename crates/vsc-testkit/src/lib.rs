//! Shared fixtures for cross-crate scenario tests.
//!
//! The grocery catalog, recipes and fraud cases are the files shipped under
//! the repository's `data/` directory, so scenarios exercise the same
//! records the binary serves by default.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tempfile::TempDir;
use vsc_catalog::{parse_catalog, CatalogIndex, RecipeBook, RecipeIngredient};
use vsc_schemas::{FraudCase, Order};
use vsc_store::JsonFileStore;
use vsc_tools::{FraudSession, SessionSettings, ShopServices, ShopSession};

pub const GROCERY_CATALOG_JSON: &str = include_str!("../../../data/catalog.json");
pub const GROCERY_RECIPES_JSON: &str = include_str!("../../../data/recipes.json");
pub const FRAUD_CASES_JSON: &str = include_str!("../../../data/fraud_cases.json");

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The shipped grocery catalog. Any rejected record is a fixture bug.
pub fn grocery_catalog() -> Result<CatalogIndex> {
    let (catalog, report) = parse_catalog(GROCERY_CATALOG_JSON, "INR");
    if !report.is_clean() {
        bail!("grocery catalog has rejected records: {:?}", report.rejected);
    }
    Ok(catalog)
}

pub fn grocery_recipes() -> Result<RecipeBook> {
    let dishes: BTreeMap<String, Vec<RecipeIngredient>> =
        serde_json::from_str(GROCERY_RECIPES_JSON).context("parse recipes fixture")?;
    Ok(RecipeBook::new(dishes))
}

pub fn fraud_cases() -> Result<Vec<FraudCase>> {
    serde_json::from_str(FRAUD_CASES_JSON).context("parse fraud cases fixture")
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// Temporary data directory holding JSON stores. Removed on drop.
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create temp workspace")?,
        })
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_raw(&self, name: &str, body: &str) -> Result<PathBuf> {
        let path = self.file(name);
        fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// A fresh handle on `orders.json`. Handles are independent, the way
    /// two processes would be.
    pub fn orders_store(&self) -> Arc<JsonFileStore<Order>> {
        Arc::new(JsonFileStore::new(self.file("orders.json")))
    }

    /// Seeds `fraud_cases.json` from the shipped fixture on first use.
    pub fn fraud_store(&self) -> Result<Arc<JsonFileStore<FraudCase>>> {
        let path = self.file("fraud_cases.json");
        if !path.exists() {
            self.write_raw("fraud_cases.json", FRAUD_CASES_JSON)?;
        }
        Ok(Arc::new(JsonFileStore::new(path)))
    }

    pub fn shop_services(
        &self,
        catalog: Arc<CatalogIndex>,
        recipes: Arc<RecipeBook>,
    ) -> ShopServices {
        ShopServices::new(
            catalog,
            recipes,
            self.orders_store(),
            SessionSettings::default(),
        )
    }

    pub fn grocery_session(&self) -> Result<ShopSession> {
        let services = self.shop_services(
            Arc::new(grocery_catalog()?),
            Arc::new(grocery_recipes()?),
        );
        Ok(ShopSession::new(services))
    }

    pub fn fraud_session(&self) -> Result<FraudSession> {
        Ok(FraudSession::new(self.fraud_store()?))
    }
}
