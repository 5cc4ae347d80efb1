//! Display formatting for terminal output

pub mod category;
pub mod wallet;

pub use category::format_category_tree;
pub use wallet::{format_wallet_details, format_wallet_history, format_wallet_list};
