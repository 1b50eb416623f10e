//! Request input adapters: JSON request documents and CSV address lists.

pub mod file;
pub mod recipients_csv;

pub use file::{load_request, parse_request};
pub use recipients_csv::{load_addresses, read_addresses};
