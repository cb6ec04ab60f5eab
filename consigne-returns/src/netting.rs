//! Netting taken against returned, and the display strings for what is left.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use consigne_core::item::singularize_brand;
use consigne_core::time::format_local;
use consigne_core::{Container, ItemKey};
use serde::Serialize;

use crate::extractor::Extraction;
use crate::matcher::Returns;

/// An item the client still holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemainingItem {
    pub key: ItemKey,
    pub quantity: u64,
    pub text: String,
    /// Date of the most recent transaction that took this item
    pub last_taken: Option<DateTime<Utc>>,
}

/// Display triple with the last activity split into date and time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedItem {
    pub text: String,
    pub date: String,
    pub time: String,
}

/// `max(0, taken - returned)` per key, zero remainders dropped, first-seen order.
pub fn net(extraction: &Extraction, returns: &Returns) -> Vec<RemainingItem> {
    extraction
        .items()
        .iter()
        .filter_map(|item| {
            let quantity = item.quantity.saturating_sub(returns.quantity(&item.key));
            (quantity > 0).then(|| RemainingItem {
                key: item.key.clone(),
                quantity,
                text: format_item(&item.key, quantity),
                last_taken: item.latest().map(|t| t.date),
            })
        })
        .collect()
}

/// Human-readable quantity + item, e.g. "3 Chopines Beer", "1 Bouteille Vin",
/// "2 Bouteille 1.5L Sprite".
pub fn format_item(key: &ItemKey, quantity: u64) -> String {
    let plural = if quantity > 1 { "s" } else { "" };
    let brand = key.brand_display();

    match (&key.container, key.size.as_deref()) {
        (Container::Chopine, _) => with_brand(format!("{quantity} Chopine{plural}"), brand),
        (Container::Bouteille, Some(size)) => {
            with_brand(format!("{quantity} Bouteille {size}"), brand)
        }
        (Container::Bouteille, None) => {
            let brand = if quantity == 1 {
                brand.map(|b| singularize_brand(&b))
            } else {
                brand
            };
            with_brand(format!("{quantity} Bouteille{plural}"), brand)
        }
        (Container::Other(_), _) => format!("{quantity} ({})", key.label()),
    }
}

fn with_brand(head: String, brand: Option<String>) -> String {
    match brand {
        Some(brand) => format!("{head} {brand}"),
        None => head,
    }
}

/// Split each item's last activity into store-local date and time strings.
pub fn with_dates(
    items: &[RemainingItem],
    tz: Tz,
    date_format: &str,
    time_format: &str,
) -> Vec<DatedItem> {
    items
        .iter()
        .map(|item| match item.last_taken {
            Some(dt) => DatedItem {
                text: item.text.clone(),
                date: format_local(dt, tz, date_format),
                time: format_local(dt, tz, time_format),
            },
            None => DatedItem {
                text: item.text.clone(),
                date: String::new(),
                time: String::new(),
            },
        })
        .collect()
}

/// Description for a return row that the matcher attributes to `key` strictly.
pub fn return_description(key: &ItemKey, quantity: u64) -> String {
    let mention = match &key.container {
        Container::Other(word) => {
            let plural = if quantity > 1 { "s" } else { "" };
            with_brand(
                format!("{quantity} {}{plural}", consigne_core::item::capitalize(word)),
                key.brand_display(),
            )
        }
        _ => format_item(key, quantity),
    };
    format!("Returned: {mention}")
}
