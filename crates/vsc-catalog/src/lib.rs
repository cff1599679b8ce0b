//! vsc-catalog
//!
//! Read-only item catalog and the spoken-reference resolver.
//!
//! A [`CatalogIndex`] is built once per process and shared by every session.
//! All lookups are pure and deterministic: the same catalog, candidate
//! order and input always produce the same item or the same miss.
//!
//! - [`CatalogIndex::filter`] implements search.
//! - [`resolve_in`] turns "second hoodie", "mug-001" or "black hoodie" into
//!   one item, or `None` for the caller to turn into a clarification.
//! - [`RecipeBook`] maps dish names to ingredient lists for recipe
//!   expansion; [`best_ingredient_match`] scores ingredients against items.

mod index;
mod load;
mod recipe;
mod resolve;
mod synonyms;

pub use index::{CatalogIndex, SearchFilter};
pub use load::{demo_catalog, load_catalog, parse_catalog, CatalogLoadReport};
pub use recipe::{best_ingredient_match, load_recipes, RecipeBook, RecipeIngredient};
pub use resolve::{resolve_in, ORDINALS};
pub use synonyms::normalize_category;
