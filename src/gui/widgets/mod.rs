//! Widget components for the GUI
//!
//! This module contains reusable UI widgets that can be embedded in views.
//!
//! ## Available Widgets
//!
//! - `transaction_card` - One transaction with its optional Refund action
//! - `PullToRefresh` - Pull-down gesture tracking for the transaction list

mod pull_to_refresh;
mod transaction_card;

pub use pull_to_refresh::{PullToRefresh, DEFAULT_PULL_THRESHOLD};
pub use transaction_card::{transaction_card, CardAction};
