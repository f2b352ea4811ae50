//! Output formatting for terminal and file targets.

pub mod json;
pub mod table;

pub use json::format_neighbors_json;
pub use table::{format_neighbors, format_summary};
