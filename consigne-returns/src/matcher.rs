//! Return matching: how many units of each known key came back.
//!
//! Return rows are parsed with the same mention parser as purchases, so a
//! mention resolves to exactly one key. "Returned: 2 Bouteilles" is the
//! generic key and never counts toward "Bouteille Vin", while
//! "Returned: 1 Bouteille Vin" never counts toward the generic key.

use std::collections::HashMap;

use consigne_core::{ItemKey, Transaction};
use tracing::debug;

use crate::mention::{Mention, MentionParser};

/// Returned quantities per known key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Returns {
    by_key: HashMap<ItemKey, u64>,
}

impl Returns {
    pub fn quantity(&self, key: &ItemKey) -> u64 {
        self.by_key.get(key).copied().unwrap_or(0)
    }
}

/// True when a row is a return row.
pub fn is_return_row(parser: &MentionParser, txn: &Transaction) -> bool {
    txn.is_debt() && parser.is_return(&txn.description)
}

/// Attribute every mention on return rows to one of `known` keys.
pub fn match_returns(parser: &MentionParser, txns: &[Transaction], known: &[ItemKey]) -> Returns {
    let mut returns = Returns::default();

    for txn in txns.iter().filter(|t| is_return_row(parser, t)) {
        for mention in parser.parse(&txn.description) {
            match attribute(&mention, known) {
                Some(key) => {
                    let q = returns.by_key.entry(key.clone()).or_insert(0);
                    *q = q.saturating_add(u64::from(mention.quantity));
                }
                None => debug!(
                    txn = %txn.id,
                    item = %mention.key,
                    "return mention matches no outstanding item"
                ),
            }
        }
    }

    returns
}

/// Strict key equality first, then a known branded key whose brand words
/// sit inside the mention's brand ("de Vin rouge" -> "Vin").
fn attribute<'a>(mention: &Mention, known: &'a [ItemKey]) -> Option<&'a ItemKey> {
    if let Some(exact) = known.iter().find(|k| **k == mention.key) {
        return Some(exact);
    }

    let mention_brand = mention.key.normalized_brand()?;
    let mention_words: Vec<&str> = mention_brand.split_whitespace().collect();

    let mut best: Option<(&ItemKey, usize)> = None;
    for key in known {
        if key.container != mention.key.container || key.is_generic() {
            continue;
        }
        if mention.key.size.is_some() && key.size != mention.key.size {
            continue;
        }
        let Some(brand) = key.normalized_brand() else {
            continue;
        };
        let words: Vec<&str> = brand.split_whitespace().collect();
        if !contains_run(&mention_words, &words) {
            continue;
        }
        if best.is_none_or(|(_, len)| words.len() > len) {
            best = Some((key, words.len()));
        }
    }

    best.map(|(key, _)| key)
}

fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
