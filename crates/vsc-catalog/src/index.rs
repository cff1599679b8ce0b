use std::collections::HashSet;

use vsc_schemas::Item;

use crate::{resolve_in, synonyms::normalize_category};

/// Search predicates. Every present predicate must hold; blank strings
/// count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive substring of the name or description.
    pub query: Option<String>,
    /// Spoken category, normalized through [`normalize_category`].
    pub category: Option<String>,
    /// Items priced strictly above this are excluded.
    pub max_price: Option<i64>,
    /// Exact case-insensitive color.
    pub color: Option<String>,
}

impl SearchFilter {
    pub fn query(mut self, q: impl Into<String>) -> Self {
        self.query = Some(q.into());
        self
    }

    pub fn category(mut self, c: impl Into<String>) -> Self {
        self.category = Some(c.into());
        self
    }

    pub fn max_price(mut self, p: i64) -> Self {
        self.max_price = Some(p);
        self
    }

    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }
}

/// Immutable, ordered item collection. Order is significant: ordinal and
/// positional references index into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    items: Vec<Item>,
}

impl CatalogIndex {
    /// Keeps the first item for each id; later duplicates are dropped.
    /// Use [`crate::parse_catalog`] to get them reported.
    pub fn new(items: Vec<Item>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|it| seen.insert(it.id.clone()))
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact id lookup (case-sensitive, as stored).
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|it| it.id == id)
    }

    pub fn filter(&self, f: &SearchFilter) -> Vec<&Item> {
        let query = non_blank(&f.query).map(str::to_lowercase);
        let category = non_blank(&f.category).map(normalize_category);
        let color = non_blank(&f.color).map(str::to_lowercase);

        self.items
            .iter()
            .filter(|it| {
                if let Some(cat) = &category {
                    let item_cat = it.category.to_lowercase();
                    if !item_cat.contains(cat.as_str()) && !cat.contains(item_cat.as_str()) {
                        return false;
                    }
                }
                if let Some(max) = f.max_price {
                    if it.unit_price > max {
                        return false;
                    }
                }
                if let Some(c) = &color {
                    if it.color_lower() != *c {
                        return false;
                    }
                }
                if let Some(q) = &query {
                    if !it.name.to_lowercase().contains(q.as_str())
                        && !it.description.to_lowercase().contains(q.as_str())
                    {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Resolve a spoken reference against the whole catalog.
    pub fn resolve(&self, reference: &str) -> Option<&Item> {
        resolve_in(reference, &self.items)
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
