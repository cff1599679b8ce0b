use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Every operation reachable from the conversational front end.
///
/// Wire form is `{"tool": "<snake_case name>", "args": {...}}`; `args` may
/// be omitted for tools without required arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum ToolCall {
    // -- shop --------------------------------------------------------------
    Search {
        #[serde(default, alias = "q")]
        query: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        max_price: Option<i64>,
        #[serde(default)]
        color: Option<String>,
    },
    AddToCart {
        #[serde(alias = "product_ref", alias = "item_ref")]
        reference: String,
        #[serde(default = "one")]
        quantity: i64,
        #[serde(default)]
        size: Option<String>,
        #[serde(default, alias = "attrs")]
        attributes: BTreeMap<String, String>,
    },
    RemoveFromCart {
        #[serde(alias = "product_ref", alias = "item_ref")]
        reference: String,
    },
    UpdateCartItem {
        #[serde(alias = "product_ref", alias = "item_ref")]
        reference: String,
        quantity: i64,
    },
    ListCart {},
    ClearCart {},
    AddRecipeToCart {
        #[serde(alias = "dish")]
        dish_name: String,
        #[serde(default = "one")]
        servings: i64,
    },
    PlaceOrder {
        #[serde(default = "yes")]
        confirm: bool,
    },
    LastOrder {},
    SetCustomerName {
        name: String,
    },
    SessionHistory {},

    // -- fraud -------------------------------------------------------------
    LoadFraudCase {
        user_name: String,
    },
    VerifySecurityAnswer {
        user_name: String,
        answer: String,
    },
    UpdateFraudStatus {
        user_name: String,
        status: String,
        #[serde(default, alias = "outcome_note")]
        note: String,
    },
    ResolveTransaction {
        user_name: String,
        legitimate: bool,
    },
    FailVerification {
        user_name: String,
    },
}

fn one() -> i64 {
    1
}

fn yes() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("tool call is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("tool call has no `tool` name")]
    MissingTool,
    #[error("bad arguments for `{tool}`: {source}")]
    Arguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolCall {
    /// Parse one JSON tool call. A missing or `null` `args` counts as `{}`.
    pub fn parse(raw: &str) -> Result<Self, ToolCallError> {
        let value: Value = serde_json::from_str(raw).map_err(ToolCallError::Json)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self, ToolCallError> {
        let tool = value
            .get("tool")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ToolCallError::MissingTool)?;
        let args = match value.get_mut("args").map(Value::take) {
            None | Some(Value::Null) => json!({}),
            Some(args) => args,
        };
        serde_json::from_value(json!({ "tool": tool, "args": args }))
            .map_err(|source| ToolCallError::Arguments { tool, source })
    }

    /// The wire name, e.g. `add_to_cart`.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::Search { .. } => "search",
            ToolCall::AddToCart { .. } => "add_to_cart",
            ToolCall::RemoveFromCart { .. } => "remove_from_cart",
            ToolCall::UpdateCartItem { .. } => "update_cart_item",
            ToolCall::ListCart {} => "list_cart",
            ToolCall::ClearCart {} => "clear_cart",
            ToolCall::AddRecipeToCart { .. } => "add_recipe_to_cart",
            ToolCall::PlaceOrder { .. } => "place_order",
            ToolCall::LastOrder {} => "last_order",
            ToolCall::SetCustomerName { .. } => "set_customer_name",
            ToolCall::SessionHistory {} => "session_history",
            ToolCall::LoadFraudCase { .. } => "load_fraud_case",
            ToolCall::VerifySecurityAnswer { .. } => "verify_security_answer",
            ToolCall::UpdateFraudStatus { .. } => "update_fraud_status",
            ToolCall::ResolveTransaction { .. } => "resolve_transaction",
            ToolCall::FailVerification { .. } => "fail_verification",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_when_missing() {
        assert_eq!(
            ToolCall::parse(r#"{"tool": "list_cart"}"#).unwrap(),
            ToolCall::ListCart {}
        );
        assert_eq!(
            ToolCall::parse(r#"{"tool": "place_order", "args": null}"#).unwrap(),
            ToolCall::PlaceOrder { confirm: true }
        );
    }

    #[test]
    fn add_to_cart_defaults_and_aliases() {
        let call =
            ToolCall::parse(r#"{"tool": "add_to_cart", "args": {"product_ref": "mug-001"}}"#)
                .unwrap();
        assert_eq!(
            call,
            ToolCall::AddToCart {
                reference: "mug-001".into(),
                quantity: 1,
                size: None,
                attributes: BTreeMap::new(),
            }
        );
        assert_eq!(call.name(), "add_to_cart");
    }

    #[test]
    fn search_accepts_q() {
        let call = ToolCall::parse(r#"{"tool": "search", "args": {"q": "mug", "max_price": 500}}"#)
            .unwrap();
        assert_eq!(
            call,
            ToolCall::Search {
                query: Some("mug".into()),
                category: None,
                max_price: Some(500),
                color: None,
            }
        );
    }

    #[test]
    fn errors_are_classified() {
        assert!(matches!(ToolCall::parse("not json"), Err(ToolCallError::Json(_))));
        assert!(matches!(
            ToolCall::parse(r#"{"args": {}}"#),
            Err(ToolCallError::MissingTool)
        ));
        assert!(matches!(
            ToolCall::parse(r#"{"tool": "teleport"}"#),
            Err(ToolCallError::Arguments { .. })
        ));
        assert!(matches!(
            ToolCall::parse(r#"{"tool": "remove_from_cart"}"#),
            Err(ToolCallError::Arguments { .. })
        ));
    }
}
