//! Item extraction: how many of each returnable item a client has taken.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use consigne_core::{ItemKey, Transaction};
use serde::Serialize;
use tracing::debug;

use crate::mention::MentionParser;

/// Pointer back to a transaction that contributed to a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRef {
    pub id: String,
    pub date: DateTime<Utc>,
}

impl TransactionRef {
    fn of(txn: &Transaction) -> Self {
        Self {
            id: txn.id.clone(),
            date: txn.date,
        }
    }
}

/// Accumulated quantity for one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedItem {
    pub key: ItemKey,
    pub quantity: u64,
    /// In ledger order, one entry per contributing transaction
    pub transactions: Vec<TransactionRef>,
}

impl ExtractedItem {
    /// Most recently dated contributing transaction.
    pub fn latest(&self) -> Option<&TransactionRef> {
        self.transactions.iter().max_by_key(|t| t.date)
    }
}

/// Keys in first-seen order with their totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    items: Vec<ExtractedItem>,
    #[serde(skip)]
    index: HashMap<ItemKey, usize>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ExtractedItem] {
        &self.items
    }

    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.items.iter().map(|i| &i.key)
    }

    pub fn get(&self, key: &ItemKey) -> Option<&ExtractedItem> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    pub fn quantity(&self, key: &ItemKey) -> u64 {
        self.get(key).map_or(0, |i| i.quantity)
    }

    /// Label/quantity pairs, first-seen order.
    pub fn quantities(&self) -> Vec<(String, u64)> {
        self.items
            .iter()
            .map(|i| (i.key.label(), i.quantity))
            .collect()
    }

    fn add(&mut self, key: ItemKey, quantity: u64, txn: &Transaction) {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.items.push(ExtractedItem {
                    key: key.clone(),
                    quantity: 0,
                    transactions: Vec::new(),
                });
                self.index.insert(key, self.items.len() - 1);
                self.items.len() - 1
            }
        };

        let item = &mut self.items[idx];
        item.quantity = item.quantity.saturating_add(quantity);
        item.transactions.push(TransactionRef::of(txn));
    }
}

/// True when a row takes part in extraction at all.
pub fn is_extractable(parser: &MentionParser, txn: &Transaction) -> bool {
    !txn.is_payment() && !parser.is_return(&txn.description)
}

/// Scan every eligible transaction and total container mentions per key.
pub fn extract(parser: &MentionParser, txns: &[Transaction]) -> Extraction {
    let mut extraction = Extraction::default();

    for txn in txns {
        if !is_extractable(parser, txn) || !parser.mentions_container(&txn.description) {
            continue;
        }

        // Sum per key within the transaction first, keeping mention order.
        let mut per_txn: Vec<(ItemKey, u64)> = Vec::new();
        for mention in parser.parse(&txn.description) {
            match per_txn.iter_mut().find(|(k, _)| *k == mention.key) {
                Some((_, q)) => *q = q.saturating_add(u64::from(mention.quantity)),
                None => per_txn.push((mention.key, u64::from(mention.quantity))),
            }
        }

        if per_txn.is_empty() {
            debug!(txn = %txn.id, "container word without a parseable mention");
            continue;
        }

        for (key, quantity) in per_txn {
            extraction.add(key, quantity, txn);
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use chrono::TimeZone;
    use consigne_core::{Container, TransactionKind};

    fn parser() -> MentionParser {
        MentionParser::new(&ParseOptions::default()).unwrap()
    }

    fn txn(id: &str, day: u32, description: &str) -> Transaction {
        let date = Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap();
        Transaction::new(id, date, description)
    }

    #[test]
    fn test_no_container_words_gives_nothing() {
        let txns = vec![
            txn("1", 1, "Pain et beurre"),
            txn("2", 2, "Riz 5kg"),
            txn("3", 3, "Cash").with_kind(TransactionKind::Payment),
        ];
        assert!(extract(&parser(), &txns).is_empty());
    }

    #[test]
    fn test_single_chopine_beer() {
        let txns = vec![txn("1", 1, "3 Chopines Beer")];
        let ex = extract(&parser(), &txns);
        assert_eq!(ex.quantities(), vec![("Chopine Beer".to_string(), 3)]);
    }

    #[test]
    fn test_totals_accumulate_across_transactions() {
        let txns = vec![
            txn("1", 1, "2 Chopines Beer"),
            txn("2", 2, "1 chopine beer, 1 Bouteille"),
            txn("3", 3, "4 Chopines Beer"),
        ];
        let ex = extract(&parser(), &txns);
        assert_eq!(
            ex.quantities(),
            vec![
                ("Chopine Beer".to_string(), 7),
                ("Bouteille".to_string(), 1),
            ]
        );

        let beer = ex
            .get(&ItemKey::new(Container::Chopine, None, Some("BEER")))
            .unwrap();
        assert_eq!(beer.transactions.len(), 3);
        assert_eq!(beer.latest().unwrap().id, "3");
    }

    #[test]
    fn test_same_key_twice_in_one_transaction() {
        let txns = vec![txn("1", 1, "2 Bouteilles Vin, 1 Bouteille vins")];
        let ex = extract(&parser(), &txns);
        assert_eq!(ex.quantities(), vec![("Bouteille Vin".to_string(), 3)]);
        assert_eq!(ex.items()[0].transactions.len(), 1);
    }

    #[test]
    fn test_payments_and_returns_are_skipped() {
        let txns = vec![
            txn("1", 1, "2 Chopines Beer").with_kind(TransactionKind::Payment),
            txn("2", 2, "Returned: 2 Chopines Beer"),
        ];
        assert!(extract(&parser(), &txns).is_empty());
    }

    #[test]
    fn test_only_marked_rows_are_skipped() {
        let p = parser();
        assert!(is_extractable(&p, &txn("1", 1, "2 Chopines Beer (return lundi)")));
        assert!(is_extractable(&p, &txn("2", 1, "1 Chopine, caisse vide")));
        assert!(!is_extractable(&p, &txn("3", 1, "Returned3 Chopines Beer")));
        assert!(!is_extractable(&p, &txn("4", 1, "Caisse: 3 Chopines Beer")));

        let txns = vec![txn("5", 1, "2 Chopines Beer (return lundi)")];
        assert_eq!(
            extract(&p, &txns).quantities(),
            vec![("Chopine Beer".to_string(), 2)]
        );
    }

    #[test]
    fn test_latest_uses_date_not_position() {
        let txns = vec![
            txn("late", 20, "1 Bouteille"),
            txn("early", 5, "1 Bouteille"),
        ];
        let ex = extract(&parser(), &txns);
        assert_eq!(ex.items()[0].latest().unwrap().id, "late");
    }
}
