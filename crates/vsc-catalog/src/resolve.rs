//! Reference resolution.
//!
//! Strategies run in strict priority order; the first hit wins and there is
//! no "closest match" fallback:
//!
//! | # | strategy         | example            | hit when                                      |
//! |---|------------------|--------------------|-----------------------------------------------|
//! | 1 | ordinal word     | "second hoodie"    | word present and position < candidate count   |
//! | 2 | exact id         | "MUG-001"          | case-insensitive id equality                  |
//! | 3 | color + category | "black hoodie"     | both appear as substrings of the reference    |
//! | 4 | name tokens      | "travel mug"       | every token longer than 2 chars is in the name|
//! | 5 | trailing number  | "number 2"         | last token is digits, 1-based position        |
//!
//! Ordinals index the candidate list as given, so callers resolving "the
//! second one" after a search pass the search results as candidates.

use vsc_schemas::Item;

/// Ordinal words and the zero-based position they select.
pub const ORDINALS: &[(&str, usize)] = &[("first", 0), ("second", 1), ("third", 2), ("fourth", 3)];

pub fn resolve_in<'c>(reference: &str, candidates: &'c [Item]) -> Option<&'c Item> {
    let r = reference.trim().to_lowercase();
    if r.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = r.split_whitespace().collect();

    by_ordinal(&tokens, candidates)
        .or_else(|| by_id(&r, candidates))
        .or_else(|| by_color_and_category(&r, candidates))
        .or_else(|| by_name_tokens(&tokens, candidates))
        .or_else(|| by_trailing_number(&tokens, candidates))
}

fn by_ordinal<'c>(tokens: &[&str], candidates: &'c [Item]) -> Option<&'c Item> {
    ORDINALS.iter().find_map(|(word, idx)| {
        let spoken = tokens.iter().any(|t| strip_punct(t) == *word);
        if spoken {
            candidates.get(*idx)
        } else {
            None
        }
    })
}

fn by_id<'c>(r: &str, candidates: &'c [Item]) -> Option<&'c Item> {
    candidates.iter().find(|it| it.id.to_lowercase() == r)
}

fn by_color_and_category<'c>(r: &str, candidates: &'c [Item]) -> Option<&'c Item> {
    candidates.iter().find(|it| {
        let color = it.color_lower();
        let category = it.category.to_lowercase();
        !color.is_empty() && !category.is_empty() && r.contains(&color) && r.contains(&category)
    })
}

/// Requires at least one qualifying token: a reference made only of short
/// tokens ("a 2") must fall through to the positional strategy instead of
/// matching every name vacuously.
fn by_name_tokens<'c>(tokens: &[&str], candidates: &'c [Item]) -> Option<&'c Item> {
    let significant: Vec<&str> = tokens
        .iter()
        .map(|t| strip_punct(t))
        .filter(|t| t.chars().count() > 2)
        .collect();
    if significant.is_empty() {
        return None;
    }
    candidates.iter().find(|it| {
        let name = it.name.to_lowercase();
        significant.iter().all(|t| name.contains(t))
    })
}

fn by_trailing_number<'c>(tokens: &[&str], candidates: &'c [Item]) -> Option<&'c Item> {
    let last = strip_punct(tokens.last()?);
    if last.is_empty() || !last.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let position: usize = last.parse().ok()?;
    candidates.get(position.checked_sub(1)?)
}

fn strip_punct(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}
