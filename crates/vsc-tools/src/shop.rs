use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;
use vsc_cart::{CartError, CartStore, CartUpdate};
use vsc_catalog::{CatalogIndex, RecipeBook, SearchFilter};
use vsc_config::ShopSection;
use vsc_ledger::{LedgerError, OrderLedger};
use vsc_schemas::{ErrorKind, Order, ATTR_SIZE};
use vsc_store::Repository;

use crate::{render, ToolCall, ToolReply};

// ---------------------------------------------------------------------------
// Shared services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub shop_name: String,
    pub search_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&ShopSection::default())
    }
}

impl From<&ShopSection> for SessionSettings {
    fn from(shop: &ShopSection) -> Self {
        Self {
            shop_name: shop.name.clone(),
            search_limit: shop.search_limit.max(1),
        }
    }
}

/// Process-wide pieces every shop session borrows. Cheap to clone.
#[derive(Clone)]
pub struct ShopServices {
    pub catalog: Arc<CatalogIndex>,
    pub recipes: Arc<RecipeBook>,
    pub ledger: Arc<OrderLedger>,
    pub settings: SessionSettings,
}

impl ShopServices {
    pub fn new(
        catalog: Arc<CatalogIndex>,
        recipes: Arc<RecipeBook>,
        orders: Arc<dyn Repository<Order>>,
        settings: SessionSettings,
    ) -> Self {
        let ledger = Arc::new(OrderLedger::new(catalog.clone(), orders));
        Self {
            catalog,
            recipes,
            ledger,
            settings,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    pub action: String,
    pub detail: String,
}

/// One shopper's conversation: a private cart plus what happened so far.
pub struct ShopSession {
    session_id: String,
    started_at: DateTime<Utc>,
    customer_name: Option<String>,
    services: ShopServices,
    cart: CartStore,
    orders_placed: Vec<String>,
    history: Vec<HistoryEntry>,
}

impl ShopSession {
    pub fn new(services: ShopServices) -> Self {
        let mut session_id = Uuid::new_v4().simple().to_string();
        session_id.truncate(8);
        Self {
            session_id,
            started_at: Utc::now(),
            customer_name: None,
            cart: CartStore::new(services.catalog.clone()),
            services,
            orders_placed: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Ids of orders placed in this session, oldest first.
    pub fn orders_placed(&self) -> &[String] {
        &self.orders_placed
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Parse and run one JSON tool call.
    pub fn handle_line(&mut self, raw: &str) -> ToolReply {
        match ToolCall::parse(raw) {
            Ok(call) => self.dispatch(call),
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "tool call rejected");
                ToolReply::failure(
                    ErrorKind::InvalidInput,
                    format!("I couldn't understand that request ({e})."),
                )
            }
        }
    }

    pub fn dispatch(&mut self, call: ToolCall) -> ToolReply {
        debug!(session = %self.session_id, tool = call.name(), "tool call");
        match call {
            ToolCall::Search {
                query,
                category,
                max_price,
                color,
            } => self.search(SearchFilter {
                query,
                category,
                max_price,
                color,
            }),
            ToolCall::AddToCart {
                reference,
                quantity,
                size,
                attributes,
            } => self.add_to_cart(&reference, quantity, size, attributes),
            ToolCall::RemoveFromCart { reference } => self.remove_from_cart(&reference),
            ToolCall::UpdateCartItem {
                reference,
                quantity,
            } => self.update_cart_item(&reference, quantity),
            ToolCall::ListCart {} => self.list_cart(),
            ToolCall::ClearCart {} => self.clear_cart(),
            ToolCall::AddRecipeToCart {
                dish_name,
                servings,
            } => self.add_recipe_to_cart(&dish_name, servings),
            ToolCall::PlaceOrder { confirm } => self.place_order(confirm),
            ToolCall::LastOrder {} => self.last_order(),
            ToolCall::SetCustomerName { name } => self.set_customer_name(&name),
            ToolCall::SessionHistory {} => self.session_history(),
            other => ToolReply::failure(
                ErrorKind::InvalidInput,
                format!("`{}` is not available while shopping.", other.name()),
            ),
        }
    }

    // -----------------------------------------------------------------------
    // Tools
    // -----------------------------------------------------------------------

    pub fn search(&self, filter: SearchFilter) -> ToolReply {
        let hits = self.services.catalog.filter(&filter);
        ToolReply::text(render::search_results(
            &self.services.settings.shop_name,
            &hits,
            self.services.settings.search_limit,
        ))
    }

    pub fn add_to_cart(
        &mut self,
        reference: &str,
        quantity: i64,
        size: Option<String>,
        mut attributes: BTreeMap<String, String>,
    ) -> ToolReply {
        if let Some(size) = size.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            attributes.insert(ATTR_SIZE.to_string(), size);
        }
        let added = quantity.max(1);
        match self.cart.add(reference, quantity, attributes) {
            Ok(line) => {
                self.record("add_to_cart", format!("{} x {}", line.item_id, added));
                ToolReply::text(format!(
                    "Added {added} x {} to your cart. What would you like to do next?",
                    line.name
                ))
            }
            Err(e @ CartError::UnresolvedReference { .. }) => ToolReply::failure(
                e.kind(),
                "I couldn't figure out which product you meant. Try saying the item id like \
                 'mug-001' or ask me to show the catalog again.",
            ),
            Err(e) => ToolReply::failure(e.kind(), format!("I couldn't add that: {e}.")),
        }
    }

    pub fn remove_from_cart(&mut self, reference: &str) -> ToolReply {
        match self.cart.remove(reference) {
            Ok(line) => {
                self.record("remove_from_cart", line.item_id.clone());
                ToolReply::text(format!("Removed {} from your cart.", line.name))
            }
            Err(e) => cart_line_failure(reference, &e),
        }
    }

    pub fn update_cart_item(&mut self, reference: &str, quantity: i64) -> ToolReply {
        match self.cart.update(reference, quantity) {
            Ok(CartUpdate::Set(line)) => {
                self.record(
                    "update_cart_item",
                    format!("{} -> {}", line.item_id, line.quantity),
                );
                ToolReply::text(format!(
                    "Updated {} to quantity {}.",
                    line.name, line.quantity
                ))
            }
            Ok(CartUpdate::Removed(line)) => {
                self.record("update_cart_item", format!("{} -> 0", line.item_id));
                ToolReply::text(format!("Removed {} from your cart.", line.name))
            }
            Err(e) => cart_line_failure(reference, &e),
        }
    }

    pub fn list_cart(&self) -> ToolReply {
        let (summary, total) = self.cart.list();
        let hint = if self.cart.is_empty() {
            "You can say 'show me hoodies under 1500' or 'show mugs'."
        } else {
            "You can say 'place my order' to checkout or 'clear my cart' if you want to start over."
        };
        ToolReply::text(format!("{summary}\n{hint}")).with_total(total)
    }

    pub fn clear_cart(&mut self) -> ToolReply {
        let dropped = self.cart.clear();
        self.record("clear_cart", format!("{dropped} lines"));
        ToolReply::text("I've cleared your cart. What would you like to browse next?")
    }

    pub fn add_recipe_to_cart(&mut self, dish_name: &str, servings: i64) -> ToolReply {
        match self
            .cart
            .add_recipe(&self.services.recipes, dish_name, servings)
        {
            Ok(added) => {
                let mut text = format!("Added the ingredients for {}:", dish_name.trim());
                for line in &added {
                    let _ = write!(text, "\n- {} x {}", line.name, line.quantity);
                }
                self.record(
                    "add_recipe_to_cart",
                    format!("{} ({} items)", dish_name.trim(), added.len()),
                );
                ToolReply::text(text)
            }
            Err(e @ CartError::UnknownDish { .. }) => {
                let known: Vec<&str> = self.services.recipes.dish_names().collect();
                let mut text = format!("I don't have a recipe for '{}'.", dish_name.trim());
                if !known.is_empty() {
                    let _ = write!(text, " I know: {}.", known.join(", "));
                }
                ToolReply::failure(e.kind(), text)
            }
            Err(e @ CartError::NoIngredientsResolved { .. }) => ToolReply::failure(
                e.kind(),
                format!(
                    "I couldn't find any ingredients for '{}' in the catalog.",
                    dish_name.trim()
                ),
            ),
            Err(e) => ToolReply::failure(e.kind(), format!("I couldn't add that recipe: {e}.")),
        }
    }

    /// The cart is cleared only after the order is persisted.
    pub fn place_order(&mut self, confirm: bool) -> ToolReply {
        if self.cart.is_empty() {
            return ToolReply::failure(
                ErrorKind::InvalidInput,
                "Your cart is empty, so there's nothing to place yet. Would you like to add \
                 something first?",
            );
        }
        if !confirm {
            return ToolReply::text(
                "Okay, I won't place the order yet. You can review your cart or add more items.",
            );
        }

        match self.services.ledger.finalize(self.cart.lines()) {
            Ok(order) => {
                self.cart.clear();
                self.orders_placed.push(order.order_id.clone());
                self.record("place_order", order.order_id.clone());
                ToolReply::text(format!(
                    "Your order is placed. Order ID {} with total {} {}. You can say 'what did I \
                     just buy' to hear the summary again.",
                    order.order_id, order.total, order.currency
                ))
                .with_total(order.total)
            }
            Err(e @ LedgerError::UnknownItem { .. }) => ToolReply::failure(
                e.kind(),
                format!("I couldn't place the order because {e}. Your cart is unchanged."),
            ),
            Err(e) => ToolReply::failure(
                e.kind(),
                format!("I couldn't place the order right now ({e}). Your cart is unchanged."),
            ),
        }
    }

    pub fn last_order(&self) -> ToolReply {
        match self.services.ledger.last_order() {
            Some(order) => ToolReply::text(render::last_order(&order)).with_total(order.total),
            None => ToolReply::failure(
                ErrorKind::NotFound,
                "You don't have any past orders yet.",
            ),
        }
    }

    pub fn set_customer_name(&mut self, name: &str) -> ToolReply {
        let name = name.trim();
        if name.is_empty() {
            return ToolReply::failure(ErrorKind::InvalidInput, "I didn't catch your name.");
        }
        self.customer_name = Some(name.to_string());
        ToolReply::text(format!("Nice to meet you, {name}."))
    }

    pub fn session_history(&self) -> ToolReply {
        if self.history.is_empty() {
            return ToolReply::text("Nothing has happened in this session yet.");
        }
        let mut text = String::from("Here's what we've done so far:");
        for (n, entry) in self.history.iter().enumerate() {
            let _ = write!(
                text,
                "\n{}. {} {}: {}",
                n + 1,
                entry.at.format("%H:%M:%S"),
                entry.action,
                entry.detail
            );
        }
        ToolReply::text(text)
    }

    fn record(&mut self, action: &str, detail: String) {
        self.history.push(HistoryEntry {
            at: Utc::now(),
            action: action.to_string(),
            detail,
        });
    }
}

fn cart_line_failure(reference: &str, e: &CartError) -> ToolReply {
    match e {
        CartError::LineNotFound { .. } => ToolReply::failure(
            e.kind(),
            format!("I couldn't find '{}' in your cart.", reference.trim()),
        ),
        other => ToolReply::failure(other.kind(), format!("I couldn't change that: {other}.")),
    }
}
