//! consigne-ingest: loading store ledger exports (CSV/JSON) into per-client transactions.

pub mod parsers;
pub mod types;

pub use parsers::{append_store_csv, parse_store_csv, parse_store_csv_reader, parse_store_json};
pub use types::{IngestError, Result, StoreRecord, group_by_client};

use std::path::Path;

/// Load an export by extension: `.json` as JSON, anything else as CSV.
pub fn load_store_export(path: impl AsRef<Path>, tz: &str) -> Result<Vec<StoreRecord>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let file = std::fs::File::open(path)?;
        parse_store_json(std::io::BufReader::new(file), tz)
    } else {
        parse_store_csv(path, tz)
    }
}
