use serde::{Deserialize, Serialize};

use crate::error::{required, RecordError};

const RECORD: &str = "item";

/// One catalog entry. Immutable once loaded.
///
/// Prices are whole units of `currency` (e.g. rupees), never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unit_price: i64,
    pub currency: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Size options in display order; empty when the item is unsized.
    pub sizes: Vec<String>,
    pub tags: Vec<String>,
}

impl Item {
    /// Validated constructor. Blank `id`, `name`, `currency` or `category`
    /// and negative prices are rejected.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: i64,
        currency: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, RecordError> {
        Item::try_from(RawItem {
            id: Some(id.into()),
            name: Some(name.into()),
            unit_price: Some(unit_price),
            currency: Some(currency.into()),
            category: Some(category.into()),
            ..RawItem::default()
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let c = color.into();
        self.color = if c.trim().is_empty() { None } else { Some(c) };
        self
    }

    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Lowercased color, or `""` when the item has none.
    pub fn color_lower(&self) -> String {
        self.color
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// Permissive wire shape. Accepts `price` as an alias of `unit_price` so
/// catalogs written by older tooling still load.
#[derive(Debug, Default, Deserialize)]
struct RawItem {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(alias = "price")]
    unit_price: Option<i64>,
    currency: Option<String>,
    category: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl TryFrom<RawItem> for Item {
    type Error = RecordError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let id = required(raw.id, RECORD, "id")?;
        let name = required(raw.name, RECORD, "name")?;
        let unit_price = raw.unit_price.ok_or(RecordError::MissingField {
            record: RECORD,
            field: "unit_price",
        })?;
        if unit_price < 0 {
            return Err(RecordError::InvalidField {
                record: RECORD,
                field: "unit_price",
                reason: format!("must be >= 0, got {unit_price}"),
            });
        }
        let currency = required(raw.currency, RECORD, "currency")?;
        let category = required(raw.category, RECORD, "category")?;

        Ok(Item {
            id,
            name,
            description: raw.description.unwrap_or_default(),
            unit_price,
            currency,
            category,
            color: raw.color.filter(|c| !c.trim().is_empty()),
            sizes: raw.sizes,
            tags: raw.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_alias_is_accepted() {
        let item: Item = serde_json::from_str(
            r#"{"id":"mug-001","name":"Chai Mug","price":299,"currency":"INR","category":"mug"}"#,
        )
        .unwrap();
        assert_eq!(item.unit_price, 299);
        assert!(item.sizes.is_empty());
        assert_eq!(item.color, None);
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = serde_json::from_str::<Item>(
            r#"{"id":"mug-001","price":299,"currency":"INR","category":"mug"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`name`"), "got: {err}");
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Item::new("x", "X", -1, "INR", "misc").unwrap_err();
        assert!(matches!(err, RecordError::InvalidField { field: "unit_price", .. }));
    }

    #[test]
    fn blank_color_becomes_none() {
        let item = Item::new("x", "X", 1, "INR", "misc").unwrap().with_color("  ");
        assert_eq!(item.color, None);
        assert_eq!(item.color_lower(), "");
    }
}
