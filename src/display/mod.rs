//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display:
//! tables, client cards, and outcome notifications.

pub mod category;
pub mod client;
pub mod notification;
pub mod transaction;

pub use category::{format_category_details, format_category_list, format_totals};
pub use client::{format_client_details, format_client_table, ClientCard};
pub use notification::{Notification, NotificationKind};
pub use transaction::{format_transaction_details, format_transaction_register};
