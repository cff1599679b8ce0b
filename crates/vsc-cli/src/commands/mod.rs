//! Command handlers for the `vsc` binary.
//!
//! [`Runtime`] is built once per process from the layered config: catalog,
//! recipes and the two file-backed stores. Sessions borrow from it.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use vsc_catalog::{demo_catalog, load_catalog, load_recipes, CatalogIndex, RecipeBook, SearchFilter};
use vsc_config::ShopConfig;
use vsc_schemas::{FraudCase, Order};
use vsc_store::JsonFileStore;
use vsc_tools::{FraudSession, SessionSettings, ShopServices, ShopSession, ToolReply};

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

pub struct Runtime {
    pub config: ShopConfig,
    pub catalog: Arc<CatalogIndex>,
    pub recipes: Arc<RecipeBook>,
    pub orders: Arc<JsonFileStore<Order>>,
    pub fraud_cases: Arc<JsonFileStore<FraudCase>>,
}

impl Runtime {
    /// `data_dir` wins over `VSC_DATA_DIR` when both are present.
    pub fn load(config_paths: &[String], data_dir: Option<&Path>) -> Result<Self> {
        let loaded = vsc_config::load_layered_yaml(config_paths)?;
        let config = loaded
            .shop_config()
            .context("invalid shop configuration")?;

        let paths = match data_dir {
            Some(dir) => config.resolve_data_paths(Some(dir)),
            None => config.resolve_data_paths_from_env(),
        };

        let catalog = match &paths.catalog_path {
            Some(p) => load_catalog(p, &config.shop.currency).0,
            None => demo_catalog(),
        };
        let recipes = match &paths.recipes_path {
            Some(p) => load_recipes(p),
            None => RecipeBook::default(),
        };

        info!(
            config_hash = %loaded.config_hash,
            shop = %config.shop.name,
            items = catalog.len(),
            dishes = recipes.len(),
            orders = %paths.orders_path.display(),
            fraud_cases = %paths.fraud_cases_path.display(),
            "runtime ready"
        );

        Ok(Self {
            orders: Arc::new(JsonFileStore::new(&paths.orders_path)),
            fraud_cases: Arc::new(JsonFileStore::new(&paths.fraud_cases_path)),
            catalog: Arc::new(catalog),
            recipes: Arc::new(recipes),
            config,
        })
    }

    pub fn shop_session(&self) -> ShopSession {
        let services = ShopServices::new(
            self.catalog.clone(),
            self.recipes.clone(),
            self.orders.clone(),
            SessionSettings::from(&self.config.shop),
        );
        let session = ShopSession::new(services);
        info!(session = %session.session_id(), "shop session started");
        session
    }

    pub fn fraud_session(&self) -> FraudSession {
        FraudSession::new(self.fraud_cases.clone())
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Feed each non-blank input line to `handle` and write its reply as one
/// JSON line. Returns the number of calls served.
pub fn serve_lines<R, W, F>(input: R, mut output: W, mut handle: F) -> Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> ToolReply,
{
    let mut served = 0;
    for line in input.lines() {
        let line = line.context("read tool call from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle(line.trim());
        let json = serde_json::to_string(&reply).context("serialize tool reply")?;
        writeln!(output, "{json}").context("write tool reply")?;
        output.flush().context("flush tool reply")?;
        served += 1;
    }
    info!(calls = served, "session input closed");
    Ok(served)
}

pub fn search(rt: &Runtime, filter: SearchFilter) -> String {
    rt.shop_session().search(filter).text
}

pub fn last_order(rt: &Runtime) -> String {
    rt.shop_session().last_order().text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_lines_skips_blanks_and_writes_one_reply_per_call() {
        let input = b"{\"tool\":\"a\"}\n\n   \n{\"tool\":\"b\"}\n";
        let mut out = Vec::new();
        let mut seen = Vec::new();

        let n = serve_lines(&input[..], &mut out, |line| {
            seen.push(line.to_string());
            ToolReply::text(format!("echo {line}")).with_total(1)
        })
        .unwrap();

        assert_eq!(n, 2);
        assert_eq!(seen.len(), 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["total"], 1);
        assert!(first.get("error").is_none());
    }
}
