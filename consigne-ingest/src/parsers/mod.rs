pub mod store_csv;
pub mod store_json;

pub use store_csv::{append_store_csv, parse_store_csv, parse_store_csv_reader};
pub use store_json::parse_store_json;
