use std::collections::BTreeMap;

use consigne_core::Transaction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One ledger row of a store export, tagged with the client it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub client_id: String,
    pub transaction: Transaction,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing column '{0}' in store export header")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Core(#[from] consigne_core::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// Client id -> that client's transactions ordered by date. Rows sharing a
/// timestamp keep their export order.
pub fn group_by_client(records: Vec<StoreRecord>) -> BTreeMap<String, Vec<Transaction>> {
    let mut out: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for record in records {
        out.entry(record.client_id).or_default().push(record.transaction);
    }
    for txns in out.values_mut() {
        txns.sort_by_key(|t| t.date);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(client: &str, id: &str, day: u32) -> StoreRecord {
        let date = Utc.with_ymd_and_hms(2026, 4, day, 8, 0, 0).unwrap();
        StoreRecord {
            client_id: client.to_string(),
            transaction: Transaction::new(id, date, "1 Chopine"),
        }
    }

    #[test]
    fn test_group_by_client_sorts_by_date() {
        let grouped = group_by_client(vec![
            record("b", "b-2", 9),
            record("a", "a-1", 3),
            record("b", "b-1", 2),
            record("b", "b-3", 9),
        ]);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        let ids: Vec<&str> = grouped["b"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b-1", "b-2", "b-3"]);
    }
}
