use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vsc_schemas::Item;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    #[serde(alias = "name", alias = "item")]
    pub item_name: String,
    /// Quantity for one serving.
    #[serde(default = "one", alias = "qty")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Dish name -> ordered ingredient list. Dish lookup is exact after
/// trimming and lowercasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeBook {
    dishes: BTreeMap<String, Vec<RecipeIngredient>>,
}

impl RecipeBook {
    pub fn new<I, S>(dishes: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<RecipeIngredient>)>,
        S: AsRef<str>,
    {
        let dishes = dishes
            .into_iter()
            .map(|(name, ingredients)| (dish_key(name.as_ref()), ingredients))
            .collect();
        Self { dishes }
    }

    pub fn get(&self, dish_name: &str) -> Option<&[RecipeIngredient]> {
        self.dishes.get(&dish_key(dish_name)).map(Vec::as_slice)
    }

    pub fn dish_names(&self) -> impl Iterator<Item = &str> {
        self.dishes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

fn dish_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Load a `{ "dish": [{"item_name": .., "quantity": ..}] }` document.
/// Missing or unparsable files give an empty book with a warning.
pub fn load_recipes(path: &Path) -> RecipeBook {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "recipes unavailable; recipe expansion disabled");
            return RecipeBook::default();
        }
    };
    match serde_json::from_str::<BTreeMap<String, Vec<RecipeIngredient>>>(&raw) {
        Ok(dishes) => {
            let book = RecipeBook::new(dishes);
            info!(path = %path.display(), dishes = book.len(), "recipes loaded");
            book
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "recipes unparsable; recipe expansion disabled");
            RecipeBook::default()
        }
    }
}

/// Best catalog item for an ingredient name.
///
/// Score = number of ingredient tokens found in the item's name, id or any
/// tag (case-insensitive substring). Highest score wins, ties keep the
/// earlier item, and a zero score is no match.
pub fn best_ingredient_match<'c>(ingredient: &str, items: &'c [Item]) -> Option<&'c Item> {
    let tokens: Vec<String> = ingredient
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let mut best: Option<(&Item, usize)> = None;
    for item in items {
        let name = item.name.to_lowercase();
        let id = item.id.to_lowercase();
        let tags: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();

        let score = tokens
            .iter()
            .filter(|t| {
                let t = t.as_str();
                name.contains(t) || id.contains(t) || tags.iter().any(|tag| tag.contains(t))
            })
            .count();

        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((item, score));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grocery(id: &str, name: &str, tags: &[&str]) -> Item {
        Item::new(id, name, 50, "INR", "grocery")
            .unwrap()
            .with_tags(tags.iter().copied())
    }

    #[test]
    fn highest_score_wins() {
        let items = vec![
            grocery("bread-white", "White Bread", &["bread"]),
            grocery("bread-wheat", "Whole Wheat Bread", &["bread", "wheat"]),
        ];
        let hit = best_ingredient_match("wheat bread", &items).unwrap();
        assert_eq!(hit.id, "bread-wheat");
    }

    #[test]
    fn ties_keep_first() {
        let items = vec![
            grocery("milk-full", "Full Cream Milk", &["dairy"]),
            grocery("milk-toned", "Toned Milk", &["dairy"]),
        ];
        assert_eq!(best_ingredient_match("milk", &items).unwrap().id, "milk-full");
    }

    #[test]
    fn zero_score_is_no_match() {
        let items = vec![grocery("rice", "Basmati Rice", &[])];
        assert!(best_ingredient_match("saffron", &items).is_none());
        assert!(best_ingredient_match("   ", &items).is_none());
    }

    #[test]
    fn tags_count() {
        let items = vec![grocery("atta-5kg", "Aashirvaad Atta", &["flour", "wheat"])];
        assert_eq!(best_ingredient_match("flour", &items).unwrap().id, "atta-5kg");
    }

    #[test]
    fn dish_lookup_is_case_insensitive_and_exact() {
        let book = RecipeBook::new([(
            "Pasta for Two",
            vec![RecipeIngredient {
                item_name: "pasta".into(),
                quantity: 1,
            }],
        )]);
        assert!(book.get("  pasta FOR two ").is_some());
        assert!(book.get("pasta").is_none());
    }

    #[test]
    fn quantity_defaults_to_one() {
        let ing: RecipeIngredient = serde_json::from_str(r#"{"name": "eggs"}"#).unwrap();
        assert_eq!(ing.quantity, 1);
        assert_eq!(ing.item_name, "eggs");
    }
}
