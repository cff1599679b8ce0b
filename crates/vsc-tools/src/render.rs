//! Speakable text for tool replies.

use std::fmt::Write as _;

use vsc_schemas::{Item, Order};
use vsc_verify::CaseSummary;

pub(crate) const NO_SEARCH_RESULTS: &str =
    "I couldn't find anything matching that. You can try another category, price range, or color.";

/// `"{n}. {name} - {price} {currency} (id: {id})"` per item, at most
/// `limit` items, headed with the shop name.
pub(crate) fn search_results(shop_name: &str, items: &[&Item], limit: usize) -> String {
    if items.is_empty() {
        return NO_SEARCH_RESULTS.to_string();
    }
    let shown = &items[..items.len().min(limit)];

    let mut text = format!(
        "Here are the top {} items I found at {}:",
        shown.len(),
        shop_name
    );
    for (n, item) in shown.iter().enumerate() {
        let _ = write!(
            text,
            "\n{}. {} - {} {} (id: {})",
            n + 1,
            item.name,
            item.unit_price,
            item.currency,
            item.id
        );
        if !item.sizes.is_empty() {
            let _ = write!(text, " available sizes: {}", item.sizes.join(", "));
        }
    }
    text.push_str(
        "\nYou can say things like: 'I want the second hoodie in size M' or \
         'add mug-001 to my cart, quantity two'.",
    );
    text
}

pub(crate) fn last_order(order: &Order) -> String {
    let mut text = format!(
        "Your most recent order is {} created at {}.",
        order.order_id,
        order.created_at.to_rfc3339()
    );
    for line in &order.lines {
        let _ = write!(
            text,
            "\n- {} x {}: {} {}",
            line.name, line.quantity, line.line_total, order.currency
        );
    }
    let _ = write!(text, "\nTotal: {} {}.", order.total, order.currency);
    text
}

pub(crate) fn case_summary(case: &CaseSummary) -> String {
    format!(
        "I'm calling about a suspicious transaction on your card {}: {:.2} at {}, {}, in {} ({}). \
         Before we go on, I need to verify it's you. {}",
        case.masked_card,
        case.amount,
        case.merchant,
        case.time,
        case.location,
        case.category,
        case.security_question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_lists_sizes_and_respects_limit() {
        let tee = Item::new("tee-001", "Cotton Tee", 799, "INR", "tshirt")
            .unwrap()
            .with_sizes(["S", "M"]);
        let mug = Item::new("mug-001", "Chai Mug", 299, "INR", "mug").unwrap();

        let text = search_results("Test Shop", &[&tee, &mug], 1);

        assert!(text.starts_with("Here are the top 1 items I found at Test Shop:"));
        assert!(text.contains("1. Cotton Tee - 799 INR (id: tee-001) available sizes: S, M"));
        assert!(!text.contains("mug-001"));
    }

    #[test]
    fn empty_search_suggests_alternatives() {
        assert_eq!(search_results("X", &[], 6), NO_SEARCH_RESULTS);
    }
}
