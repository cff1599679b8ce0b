//! vsc-tools
//!
//! The tool-call boundary between a conversational front end and the core.
//!
//! A caller sends one [`ToolCall`] at a time, as JSON:
//!
//! ```json
//! {"tool": "add_to_cart", "args": {"reference": "second hoodie", "quantity": 2}}
//! ```
//!
//! and gets back a [`ToolReply`]: speakable text plus, for cart reads, the
//! numeric total. Every failure is rendered as text; nothing here panics or
//! propagates an error to the host.
//!
//! - [`ShopSession`] owns one cart and serves the commerce tools.
//! - [`FraudSession`] owns one [`VerificationWorkflow`](vsc_verify::VerificationWorkflow)
//!   and serves the fraud-alert tools.

mod call;
mod fraud;
mod render;
mod reply;
mod shop;

pub use call::{ToolCall, ToolCallError};
pub use fraud::FraudSession;
pub use reply::ToolReply;
pub use shop::{HistoryEntry, SessionSettings, ShopServices, ShopSession};
