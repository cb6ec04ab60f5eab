//! Store ledger CSV export.
//!
//! Expected header (any column order, extra columns ignored):
//!   id,client_id,date,description,amount,type
//!
//! `date` is RFC 3339 or a naive "YYYY-MM-DD HH:MM[:SS]" in the store timezone.

use std::fs::OpenOptions;
use std::path::Path;

use consigne_core::time::parse_timestamp;
use consigne_core::{Transaction, TransactionKind};
use csv::StringRecord;
use tracing::warn;

use crate::types::{IngestError, Result, StoreRecord};

pub const HEADER: [&str; 6] = ["id", "client_id", "date", "description", "amount", "type"];

struct Columns {
    id: usize,
    client_id: usize,
    date: usize,
    description: usize,
    amount: Option<usize>,
    kind: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let need = |name: &'static str| find(name).ok_or(IngestError::MissingColumn(name));
        Ok(Self {
            id: need("id")?,
            client_id: need("client_id")?,
            date: need("date")?,
            description: need("description")?,
            amount: find("amount"),
            kind: need("type")?,
        })
    }
}

/// Parse a store CSV export. Rows with an unreadable date or type are skipped.
pub fn parse_store_csv(path: impl AsRef<Path>, tz: &str) -> Result<Vec<StoreRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    read_records(rdr, tz)
}

/// Same as [`parse_store_csv`] over any reader.
pub fn parse_store_csv_reader<R: std::io::Read>(reader: R, tz: &str) -> Result<Vec<StoreRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_records(rdr, tz)
}

fn read_records<R: std::io::Read>(mut rdr: csv::Reader<R>, tz: &str) -> Result<Vec<StoreRecord>> {
    let cols = Columns::from_header(rdr.headers()?)?;
    let mut out = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let id = field(cols.id);
        let date = match parse_timestamp(field(cols.date), tz) {
            Ok(d) => d,
            Err(e) => {
                warn!(row = line + 2, id, "skipping row: {}", e);
                continue;
            }
        };
        let Some(kind) = TransactionKind::parse(field(cols.kind)) else {
            warn!(row = line + 2, id, "skipping row: unknown type '{}'", field(cols.kind));
            continue;
        };
        let amount: f64 = cols
            .amount
            .map(|i| field(i).parse().unwrap_or(0.0))
            .unwrap_or(0.0);

        out.push(StoreRecord {
            client_id: field(cols.client_id).to_string(),
            transaction: Transaction::new(id, date, field(cols.description))
                .with_amount(amount)
                .with_kind(kind),
        });
    }

    Ok(out)
}

/// Append one record to a store CSV, writing the header first if the file is
/// new or empty.
pub fn append_store_csv(path: impl AsRef<Path>, record: &StoreRecord) -> Result<()> {
    let path = path.as_ref();
    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        wtr.write_record(HEADER)?;
    }

    let txn = &record.transaction;
    let date = txn.date.to_rfc3339();
    let amount = txn.amount.to_string();
    wtr.write_record([
        txn.id.as_str(),
        record.client_id.as_str(),
        date.as_str(),
        txn.description.as_str(),
        amount.as_str(),
        txn.kind.as_str(),
    ])?;
    wtr.flush()?;
    Ok(())
}
