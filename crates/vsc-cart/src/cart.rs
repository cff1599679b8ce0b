use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;
use vsc_catalog::{best_ingredient_match, CatalogIndex, RecipeBook};
use vsc_schemas::{checked_cart_total, CartLine, Item};

use crate::CartError;

/// Result of [`CartStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    /// Quantity replaced; carries the line as stored now.
    Set(CartLine),
    /// Quantity was <= 0; carries the deleted line.
    Removed(CartLine),
}

#[derive(Debug, Clone)]
pub struct CartStore {
    catalog: Arc<CatalogIndex>,
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self {
            catalog,
            lines: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Currency fixed by the first line; `None` while the cart is empty.
    pub fn currency(&self) -> Option<&str> {
        self.lines.first().map(|l| l.currency.as_str())
    }

    /// Σ(unit_price × quantity) over the captured line prices. Every
    /// mutation is refused if this would overflow, so it is always exact.
    pub fn total(&self) -> i64 {
        checked_cart_total(&self.lines).unwrap_or(i64::MAX)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Resolve `item_ref` against the full catalog and add it.
    ///
    /// `quantity` below 1 is clamped to 1. Returns the line as stored after
    /// the merge.
    pub fn add(
        &mut self,
        item_ref: &str,
        quantity: i64,
        attributes: BTreeMap<String, String>,
    ) -> Result<CartLine, CartError> {
        let item = self
            .catalog
            .resolve(item_ref)
            .cloned()
            .ok_or_else(|| CartError::UnresolvedReference {
                reference: item_ref.trim().to_string(),
            })?;
        self.check_currency(&item)?;

        let mut next = self.lines.clone();
        let line = merge_into(&mut next, &item, clamp_quantity(quantity), attributes);
        self.commit(next, &item.id)?;
        debug!(item_id = %line.item_id, quantity = line.quantity, "cart line added");
        Ok(line)
    }

    /// Remove the first line whose name contains `item_ref`
    /// (case-insensitive) or whose id equals it.
    pub fn remove(&mut self, item_ref: &str) -> Result<CartLine, CartError> {
        let idx = self.find_line(item_ref)?;
        let line = self.lines.remove(idx);
        debug!(item_id = %line.item_id, "cart line removed");
        Ok(line)
    }

    /// Same matching as [`CartStore::remove`]. `quantity <= 0` deletes the
    /// line, anything else replaces its quantity.
    pub fn update(&mut self, item_ref: &str, quantity: i64) -> Result<CartUpdate, CartError> {
        let idx = self.find_line(item_ref)?;
        if quantity <= 0 {
            let line = self.lines.remove(idx);
            debug!(item_id = %line.item_id, "cart line removed by zero quantity");
            return Ok(CartUpdate::Removed(line));
        }
        let mut next = self.lines.clone();
        next[idx].quantity = clamp_quantity(quantity);
        let line = next[idx].clone();
        self.commit(next, &line.item_id)?;
        debug!(item_id = %line.item_id, quantity = line.quantity, "cart line quantity set");
        Ok(CartUpdate::Set(line))
    }

    /// Empties the cart and returns how many lines were dropped. Persisted
    /// orders are not affected.
    pub fn clear(&mut self) -> usize {
        let n = self.lines.len();
        self.lines.clear();
        debug!(lines = n, "cart cleared");
        n
    }

    /// Expand a dish into its ingredients and add each one.
    ///
    /// Ingredients are scored against the catalog with
    /// [`best_ingredient_match`]; unmatched ones are skipped. Each match is
    /// added with quantity `max(1, base × servings)`. Returns the added
    /// quantities (not the merged line totals) in recipe order.
    ///
    /// Unknown dish, zero matches, a currency conflict or an overflowing
    /// total leave the cart unchanged.
    pub fn add_recipe(
        &mut self,
        recipes: &RecipeBook,
        dish_name: &str,
        servings: i64,
    ) -> Result<Vec<CartLine>, CartError> {
        let dish = dish_name.trim().to_string();
        let ingredients = recipes
            .get(&dish)
            .ok_or_else(|| CartError::UnknownDish { dish: dish.clone() })?;

        let mut planned: Vec<(Item, u32)> = Vec::new();
        for ingredient in ingredients {
            let Some(item) = best_ingredient_match(&ingredient.item_name, self.catalog.items())
            else {
                debug!(dish = %dish, ingredient = %ingredient.item_name, "ingredient skipped");
                continue;
            };
            let qty = i64::from(ingredient.quantity).saturating_mul(servings);
            planned.push((item.clone(), clamp_quantity(qty)));
        }
        if planned.is_empty() {
            return Err(CartError::NoIngredientsResolved { dish });
        }

        // All-or-nothing: every planned item must share the cart currency.
        let currency = self
            .currency()
            .map(str::to_string)
            .unwrap_or_else(|| planned[0].0.currency.clone());
        if let Some((item, _)) = planned.iter().find(|(it, _)| it.currency != currency) {
            return Err(CartError::CurrencyMismatch {
                item_id: item.id.clone(),
                item_currency: item.currency.clone(),
                cart_currency: currency,
            });
        }

        let mut next = self.lines.clone();
        let added = planned
            .iter()
            .map(|(item, qty)| {
                merge_into(&mut next, item, *qty, BTreeMap::new());
                CartLine::from_item(item, *qty, BTreeMap::new())
            })
            .collect::<Vec<_>>();
        self.commit(next, &dish)?;
        debug!(dish = %dish, items = added.len(), "recipe added to cart");
        Ok(added)
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    /// Spoken summary and total.
    pub fn list(&self) -> (String, i64) {
        if self.lines.is_empty() {
            return ("Your cart is currently empty.".to_string(), 0);
        }

        let mut text = String::from("Here's what's in your cart:");
        for line in &self.lines {
            let size = line
                .size()
                .map(|s| format!(", size {s}"))
                .unwrap_or_default();
            let _ = write!(
                text,
                "\n- {} x {}{}: {} {}",
                line.name,
                line.quantity,
                size,
                line.line_total(),
                line.currency
            );
        }
        let total = self.total();
        let _ = write!(
            text,
            "\nCart total: {} {}.",
            total,
            self.currency().unwrap_or_default()
        );
        (text, total)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn check_currency(&self, item: &Item) -> Result<(), CartError> {
        match self.currency() {
            Some(cart) if cart != item.currency => Err(CartError::CurrencyMismatch {
                item_id: item.id.clone(),
                item_currency: item.currency.clone(),
                cart_currency: cart.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Install `next` only if every line total and the cart total still
    /// fit in an `i64`.
    fn commit(&mut self, next: Vec<CartLine>, reference: &str) -> Result<(), CartError> {
        if checked_cart_total(&next).is_none() {
            return Err(CartError::TotalOverflow {
                reference: reference.to_string(),
            });
        }
        self.lines = next;
        Ok(())
    }

    fn find_line(&self, item_ref: &str) -> Result<usize, CartError> {
        let r = item_ref.trim();
        let needle = r.to_lowercase();
        let hit = if r.is_empty() {
            None
        } else {
            self.lines
                .iter()
                .position(|l| l.item_id == r || l.name.to_lowercase().contains(&needle))
        };
        hit.ok_or_else(|| CartError::LineNotFound {
            reference: r.to_string(),
        })
    }
}

/// Quantities add; the captured price stays; supplied attributes
/// overwrite same-named ones.
fn merge_into(
    lines: &mut Vec<CartLine>,
    item: &Item,
    quantity: u32,
    attributes: BTreeMap<String, String>,
) -> CartLine {
    match lines.iter_mut().find(|l| l.item_id == item.id) {
        Some(line) => {
            line.quantity = line.quantity.saturating_add(quantity);
            line.attributes.extend(attributes);
            line.clone()
        }
        None => {
            let line = CartLine::from_item(item, quantity, attributes);
            lines.push(line.clone());
            line
        }
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}
