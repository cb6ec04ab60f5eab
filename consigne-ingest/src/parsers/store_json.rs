//! Store ledger JSON export: an array of row objects as the backend's REST
//! endpoint returns them. Ids may be strings or numbers.

use std::io::Read;

use consigne_core::time::parse_timestamp;
use consigne_core::{Transaction, TransactionKind};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::types::{Result, StoreRecord};

#[derive(Debug, Deserialize)]
struct JsonRow {
    id: Value,
    client_id: Value,
    date: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(rename = "type")]
    kind: String,
}

fn id_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a JSON store export. Rows with an unreadable date or type are skipped.
pub fn parse_store_json<R: Read>(reader: R, tz: &str) -> Result<Vec<StoreRecord>> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)?;
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let id = id_string(&row.id);
        let date = match parse_timestamp(&row.date, tz) {
            Ok(d) => d,
            Err(e) => {
                warn!(id = %id, "skipping row: {}", e);
                continue;
            }
        };
        let Some(kind) = TransactionKind::parse(&row.kind) else {
            warn!(id = %id, "skipping row: unknown type '{}'", row.kind);
            continue;
        };

        out.push(StoreRecord {
            client_id: id_string(&row.client_id),
            transaction: Transaction::new(id, date, row.description.unwrap_or_default())
                .with_amount(row.amount.unwrap_or(0.0))
                .with_kind(kind),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_numeric_ids_and_nulls() {
        let json = r#"[
            {"id": 41, "client_id": 7, "date": "2026-03-01T09:00:00+04:00",
             "description": "2 Bouteilles Vin", "amount": 300, "type": "debt"},
            {"id": "p-1", "client_id": "7", "date": "2026-03-02 10:00",
             "description": null, "amount": null, "type": "payment"},
            {"id": 43, "client_id": 7, "date": "soon", "type": "debt"}
        ]"#;

        let records = parse_store_json(json.as_bytes(), "UTC").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].transaction.id, "41");
        assert_eq!(records[0].client_id, "7");
        assert_eq!(records[0].transaction.amount, 300.0);
        assert_eq!(records[1].client_id, "7");
        assert_eq!(records[1].transaction.description, "");
        assert!(records[1].transaction.is_payment());
    }

    #[test]
    fn test_not_an_array_is_an_error() {
        assert!(parse_store_json(r#"{"id": 1}"#.as_bytes(), "UTC").is_err());
    }
}
