//! Returnable container types and the keys items are grouped under.
//!
//! A key is derived from description text every time reconciliation runs.
//! Equality is decided on a normalized identity (lowercased brand, French
//! plurals singularized, canonical size), so "2 Bouteilles Vins" and
//! "1 bouteille vin" land on the same key. The display label keeps the
//! phrasing the key was first built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Deposit-bearing container kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Container {
    #[serde(rename = "chopine")]
    Chopine,
    #[serde(rename = "bouteille")]
    Bouteille,
    /// Extra keyword configured by the store, stored lowercased
    #[serde(rename = "other")]
    Other(String),
}

impl Container {
    /// Built-in containers, in scan order.
    pub const BUILTIN: [Container; 2] = [Container::Chopine, Container::Bouteille];

    /// Map a (possibly plural, any case) container word to its kind.
    pub fn from_word(word: &str) -> Container {
        let lower = word.trim().to_lowercase();
        let stem = lower.strip_suffix('s').unwrap_or(&lower);
        match stem {
            "chopine" => Container::Chopine,
            "bouteille" => Container::Bouteille,
            _ => Container::Other(stem.to_string()),
        }
    }

    /// Lowercase keyword searched for in descriptions.
    pub fn keyword(&self) -> &str {
        match self {
            Container::Chopine => "chopine",
            Container::Bouteille => "bouteille",
            Container::Other(word) => word,
        }
    }

    pub fn label(&self) -> String {
        capitalize(self.keyword())
    }

    /// Only bottles carry a size token in their key.
    pub fn is_sized(&self) -> bool {
        matches!(self, Container::Bouteille)
    }
}

/// French plural brand words and their singular, used both for key identity
/// and for singular display.
const FRENCH_PLURALS: &[(&str, &str)] = &[
    ("vins", "vin"),
    ("bières", "bière"),
    ("bieres", "biere"),
    ("sodas", "soda"),
    ("jus", "jus"),
];

/// Singular of a recognised French plural brand word. Words starting with a
/// digit ("7seas") are never touched.
pub fn singular_of(word: &str) -> Option<&'static str> {
    if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let lower = word.to_lowercase();
    FRENCH_PLURALS
        .iter()
        .find(|(plural, _)| *plural == lower)
        .map(|(_, singular)| *singular)
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize the first letter of every whitespace-separated word.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Singularize plural-table words in a display brand, keeping the case of
/// each word's first letter.
pub fn singularize_brand(brand: &str) -> String {
    brand
        .split_whitespace()
        .map(|word| match singular_of(word) {
            Some(singular) if word.chars().next().is_some_and(char::is_uppercase) => {
                capitalize(singular)
            }
            Some(singular) => singular.to_string(),
            None => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identity form of a brand: lowercase, single spaces, plurals singularized.
pub fn normalize_brand(brand: &str) -> String {
    brand
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            singular_of(&lower).map(str::to_string).unwrap_or(lower)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical size token: "1,5 l" -> "1.5L", "75CL" -> "75cl".
pub fn canonical_size(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .replace(',', ".");
    let split = compact.find(|c: char| c.is_ascii_alphabetic())?;
    let (num, unit) = compact.split_at(split);
    if num.is_empty() || num.parse::<f64>().is_err() {
        return None;
    }
    let unit = match unit {
        "l" => "L",
        "cl" => "cl",
        "ml" => "ml",
        _ => return None,
    };
    Some(format!("{num}{unit}"))
}

/// Grouping key for a returnable item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemKey {
    pub container: Container,
    /// Canonical size, bottles only
    pub size: Option<String>,
    /// Brand as first written (whitespace collapsed)
    pub brand: Option<String>,
}

impl ItemKey {
    pub fn new(container: Container, size: Option<&str>, brand: Option<&str>) -> Self {
        let size = if container.is_sized() {
            size.and_then(canonical_size)
        } else {
            None
        };
        let brand = brand
            .map(|b| b.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|b| !b.is_empty());
        Self {
            container,
            size,
            brand,
        }
    }

    pub fn generic(container: Container) -> Self {
        Self {
            container,
            size: None,
            brand: None,
        }
    }

    /// No brand: "Chopine", "Bouteille", "1.5L Bouteille".
    pub fn is_generic(&self) -> bool {
        self.brand.is_none()
    }

    pub fn normalized_brand(&self) -> Option<String> {
        self.brand.as_deref().map(normalize_brand)
    }

    fn identity(&self) -> (&Container, Option<&str>, Option<String>) {
        (&self.container, self.size.as_deref(), self.normalized_brand())
    }

    /// Brand with every word capitalized.
    pub fn brand_display(&self) -> Option<String> {
        self.brand.as_deref().map(capitalize_words)
    }

    /// Display label, e.g. "Chopine Beer", "1.5L Sprite", "1.5L Bouteille".
    pub fn label(&self) -> String {
        let brand = self.brand_display();
        match (&self.container, self.size.as_deref(), brand) {
            (Container::Bouteille, Some(size), Some(brand)) => format!("{size} {brand}"),
            (Container::Bouteille, Some(size), None) => format!("{size} Bouteille"),
            (container, _, Some(brand)) => format!("{} {brand}", container.label()),
            (container, _, None) => container.label(),
        }
    }

    /// Loose comparison against a user-typed label ("chopines beer").
    pub fn matches_label(&self, label: &str) -> bool {
        let wanted = normalize_brand(&singular_container_words(label));
        let ours = normalize_brand(&self.label());
        wanted == ours
    }
}

fn singular_container_words(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| match Container::from_word(word) {
            Container::Other(_) => word.to_string(),
            container => container.keyword().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl PartialEq for ItemKey {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ItemKey {}

impl Hash for ItemKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_precedence() {
        let both = ItemKey::new(Container::Bouteille, Some("1.5l"), Some("sprite"));
        assert_eq!(both.label(), "1.5L Sprite");

        let brand_only = ItemKey::new(Container::Bouteille, None, Some("vin"));
        assert_eq!(brand_only.label(), "Bouteille Vin");

        let size_only = ItemKey::new(Container::Bouteille, Some("1.5L"), None);
        assert_eq!(size_only.label(), "1.5L Bouteille");

        assert_eq!(ItemKey::generic(Container::Bouteille).label(), "Bouteille");
        assert_eq!(ItemKey::generic(Container::Chopine).label(), "Chopine");
    }

    #[test]
    fn test_chopine_ignores_size() {
        let key = ItemKey::new(Container::Chopine, Some("33cl"), Some("beer"));
        assert_eq!(key.size, None);
        assert_eq!(key.label(), "Chopine Beer");
    }

    #[test]
    fn test_identity_ignores_case_and_plural() {
        let a = ItemKey::new(Container::Bouteille, None, Some("Vins"));
        let b = ItemKey::new(Container::Bouteille, None, Some("vin"));
        assert_eq!(a, b);

        let c = ItemKey::new(Container::Bouteille, Some("1,5 L"), None);
        let d = ItemKey::new(Container::Bouteille, Some("1.5L"), None);
        assert_eq!(c, d);

        let generic = ItemKey::generic(Container::Bouteille);
        assert_ne!(a, generic);
    }

    #[test]
    fn test_singularize_brand() {
        assert_eq!(singularize_brand("Vins"), "Vin");
        assert_eq!(singularize_brand("bières rouges"), "bière rouges");
        assert_eq!(singularize_brand("Jus"), "Jus");
        assert_eq!(singularize_brand("7seas"), "7seas");
        assert_eq!(singularize_brand("Sprite"), "Sprite");
    }

    #[test]
    fn test_canonical_size() {
        assert_eq!(canonical_size("1.5L").as_deref(), Some("1.5L"));
        assert_eq!(canonical_size("1,5 l").as_deref(), Some("1.5L"));
        assert_eq!(canonical_size("75CL").as_deref(), Some("75cl"));
        assert_eq!(canonical_size("big"), None);
        assert_eq!(canonical_size("2kg"), None);
    }

    #[test]
    fn test_container_from_word() {
        assert_eq!(Container::from_word("Chopines"), Container::Chopine);
        assert_eq!(Container::from_word("BOUTEILLE"), Container::Bouteille);
        assert_eq!(
            Container::from_word("Gallons"),
            Container::Other("gallon".to_string())
        );
    }

    #[test]
    fn test_matches_label() {
        let key = ItemKey::new(Container::Chopine, None, Some("Beer"));
        assert!(key.matches_label("chopine beer"));
        assert!(key.matches_label("Chopines Beer"));
        assert!(!key.matches_label("Chopine"));

        let vin = ItemKey::new(Container::Bouteille, None, Some("Vins"));
        assert!(vin.matches_label("bouteille vin"));
    }
}
