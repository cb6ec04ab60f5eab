//! consigne-returns: returnable-container extraction, return matching and netting
//!
//! Pipeline per client ledger:
//! transactions -> extractor (taken) -> matcher (returned) -> netting (remaining).
//! Every call recomputes from the full ledger; nothing is cached.

pub mod extractor;
pub mod matcher;
pub mod mention;
pub mod netting;
pub mod options;

pub use extractor::{Extraction, ExtractedItem, TransactionRef, extract};
pub use matcher::{Returns, match_returns};
pub use mention::{Mention, MentionParser};
pub use netting::{DatedItem, RemainingItem, format_item, return_description};
pub use options::{DisplayOptions, ParseOptions};

use chrono_tz::Tz;
use consigne_core::time::parse_tz;
use consigne_core::{ItemKey, Result, Transaction};

/// Configured reconciliation pipeline. Stateless between calls.
#[derive(Debug, Clone)]
pub struct Reconciler {
    parser: MentionParser,
    display: DisplayOptions,
    tz: Tz,
}

impl Reconciler {
    pub fn new(options: &ParseOptions) -> Result<Self> {
        let display = DisplayOptions::default();
        Ok(Self {
            parser: MentionParser::new(options)?,
            tz: parse_tz(&display.timezone)?,
            display,
        })
    }

    pub fn with_display(mut self, display: DisplayOptions) -> Result<Self> {
        self.tz = parse_tz(&display.timezone)?;
        self.display = display;
        Ok(self)
    }

    /// Taken quantities per key.
    pub fn extract(&self, txns: &[Transaction]) -> Extraction {
        extract(&self.parser, txns)
    }

    /// Returned quantities for the keys found in `extraction`.
    pub fn returned(&self, txns: &[Transaction], extraction: &Extraction) -> Returns {
        let known: Vec<ItemKey> = extraction.keys().cloned().collect();
        match_returns(&self.parser, txns, &known)
    }

    /// Units of `key` already returned. Generic return rows never count
    /// toward a branded key and vice versa.
    pub fn returned_quantity(&self, key: &ItemKey, txns: &[Transaction]) -> u64 {
        let extraction = self.extract(txns);
        self.returned(txns, &extraction).quantity(key)
    }

    pub fn remaining(&self, txns: &[Transaction]) -> Vec<RemainingItem> {
        let extraction = self.extract(txns);
        let returns = self.returned(txns, &extraction);
        netting::net(&extraction, &returns)
    }

    pub fn remaining_strings(&self, txns: &[Transaction]) -> Vec<String> {
        self.remaining(txns).into_iter().map(|r| r.text).collect()
    }

    pub fn remaining_with_dates(&self, txns: &[Transaction]) -> Vec<DatedItem> {
        netting::with_dates(
            &self.remaining(txns),
            self.tz,
            &self.display.date_format,
            &self.display.time_format,
        )
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&ParseOptions::default()).expect("default parse options are valid")
    }
}

/// Remaining items with default options.
pub fn remaining_items(txns: &[Transaction]) -> Vec<String> {
    Reconciler::default().remaining_strings(txns)
}
