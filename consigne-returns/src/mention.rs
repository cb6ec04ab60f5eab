//! The one parser for returnable-container mentions in free text.
//!
//! Recognised shapes (case-insensitive, plural `s` optional):
//!   3 Chopines Beer
//!   2 Bouteilles Vin, 1 Chopine
//!   2 x 1.5L Bouteilles Sprite
//!   2 Bouteilles 1.5L Sprite      (size after the container is lifted)
//!   Bouteille Vin                  (no number: implicit quantity 1)
//!
//! Brand text runs up to the next comma, `;`, ` - `, `(`, line break,
//! return marker, or the next numbered mention.
//!
//! A description is a return when its lowercased text contains a return
//! marker anywhere ("Returned3 Chopines" included), or when it opens with a
//! return prefix word ("Caisse: 3 Chopines Beer").

use std::sync::OnceLock;

use consigne_core::{Container, ItemKey, Result};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::options::ParseOptions;

const SIZE_PATTERN: &str = r"\d+(?:[.,]\d+)?\s*(?:cl|ml|l)";

fn leading_size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)^(?P<size>{SIZE_PATTERN})\b\s*"))
            .expect("invalid leading size regex")
    })
}

/// One container mention found in a description.
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub key: ItemKey,
    pub quantity: u32,
}

/// Compiled mention patterns for a set of container words and return markers.
#[derive(Debug, Clone)]
pub struct MentionParser {
    containers: Vec<Container>,
    numbered: Regex,
    bare: Regex,
    markers: Vec<String>,
    marker: Regex,
    lead_in: Regex,
}

/// Case-insensitive alternation of `words`; never matches when empty.
fn alternation(words: &[String], wrap: impl Fn(&str) -> String) -> Result<Regex> {
    let escaped = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>();
    // An empty alternation would match everywhere.
    let pattern = if escaped.is_empty() {
        r"\x00never\x00".to_string()
    } else {
        wrap(&escaped.join("|"))
    };
    Ok(RegexBuilder::new(&pattern).case_insensitive(true).build()?)
}

impl MentionParser {
    pub fn new(options: &ParseOptions) -> Result<Self> {
        let mut containers: Vec<Container> = Container::BUILTIN.to_vec();
        for word in &options.extra_containers {
            let container = Container::from_word(word);
            if !container.keyword().is_empty() && !containers.contains(&container) {
                containers.push(container);
            }
        }

        let words = containers
            .iter()
            .map(|c| regex::escape(c.keyword()))
            .collect::<Vec<_>>()
            .join("|");

        let numbered = RegexBuilder::new(&format!(
            r"(?P<qty>\d+)(?P<sep>\s*x\s*|\s*)(?:(?P<size>{SIZE_PATTERN})\s*)?\b(?P<container>{words})s?\b"
        ))
        .case_insensitive(true)
        .build()?;

        let bare = RegexBuilder::new(&format!(
            r"(?:(?P<size>{SIZE_PATTERN})\s*)?\b(?P<container>{words})s?\b"
        ))
        .case_insensitive(true)
        .build()?;

        let markers = options
            .return_markers
            .iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>();
        let marker = alternation(&markers, |alt| format!("(?:{alt})"))?;
        let lead_in = alternation(&options.return_prefixes, |alt| {
            format!(r"^\W*(?:{alt})s?\b")
        })?;

        Ok(Self {
            containers,
            numbered,
            bare,
            markers,
            marker,
            lead_in,
        })
    }

    /// True when the description carries a return marker or opens with a
    /// return prefix.
    pub fn is_return(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.markers.iter().any(|m| lower.contains(m.as_str()))
            || self.lead_in.is_match(description)
    }

    /// True when any tracked container word appears at all.
    pub fn mentions_container(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.containers.iter().any(|c| lower.contains(c.keyword()))
    }

    /// All mentions in `description`, in text order, numbered ones first
    /// followed by implicit ones for containers that had no numbered match.
    pub fn parse(&self, description: &str) -> Vec<Mention> {
        let mut out = Vec::new();
        let mut numbered_containers: Vec<Container> = Vec::new();

        for caps in self.numbered.captures_iter(description) {
            let Some(whole) = caps.get(0) else { continue };
            // "15L Bouteille" backtracks into qty 1 + size 5L; that is a size, not a count
            if caps.name("size").is_some() && caps["sep"].is_empty() {
                continue;
            }
            let container = self.container_for(&caps["container"]);
            if !numbered_containers.contains(&container) {
                numbered_containers.push(container.clone());
            }

            let quantity = match caps["qty"].parse::<u32>() {
                Ok(q) => q,
                Err(e) => {
                    debug!("skipping mention '{}': {}", whole.as_str(), e);
                    continue;
                }
            };

            let size = caps.name("size").map(|m| m.as_str().to_string());
            let key = self.build_key(container, size, &description[whole.end()..]);
            out.push(Mention { key, quantity });
        }

        for caps in self.bare.captures_iter(description) {
            let Some(whole) = caps.get(0) else { continue };
            let container = self.container_for(&caps["container"]);
            if numbered_containers.contains(&container) {
                continue;
            }
            numbered_containers.push(container.clone());

            let size = caps.name("size").map(|m| m.as_str().to_string());
            let key = self.build_key(container, size, &description[whole.end()..]);
            out.push(Mention { key, quantity: 1 });
        }

        out
    }

    fn container_for(&self, word: &str) -> Container {
        let lower = word.to_lowercase();
        self.containers
            .iter()
            .find(|c| {
                lower == c.keyword()
                    || lower.strip_suffix('s').is_some_and(|stem| stem == c.keyword())
            })
            .cloned()
            .unwrap_or_else(|| Container::from_word(word))
    }

    fn build_key(&self, container: Container, size: Option<String>, tail: &str) -> ItemKey {
        let mut brand = self.cut_brand(tail);
        let mut size = size;

        if container.is_sized() && size.is_none() {
            if let Some(caps) = leading_size_re().captures(&brand) {
                let end = caps.get(0).map_or(0, |m| m.end());
                size = Some(caps["size"].to_string());
                brand = brand[end..].trim().to_string();
            }
        }

        let brand = (!brand.is_empty()).then_some(brand);
        ItemKey::new(container, size.as_deref(), brand.as_deref())
    }

    fn cut_brand(&self, tail: &str) -> String {
        let mut end = brand_stop(tail).unwrap_or(tail.len());
        if let Some(m) = self.numbered.find(tail) {
            end = end.min(m.start());
        }
        if let Some(m) = self.marker.find(tail) {
            end = end.min(m.start());
        }

        tail[..end]
            .trim()
            .trim_end_matches(['.', ',', '-', ':', '/'])
            .trim()
            .to_string()
    }
}

/// First brand terminator: `,` (but not a decimal comma), `;`, `(`, a line
/// break or a spaced dash.
fn brand_stop(tail: &str) -> Option<usize> {
    let bytes = tail.as_bytes();
    for (i, c) in tail.char_indices() {
        match c {
            ';' | '(' | '\n' => return Some(i),
            ',' => {
                let prev_digit = i > 0 && bytes[i - 1].is_ascii_digit();
                let next_digit = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
                if !(prev_digit && next_digit) {
                    return Some(i);
                }
            }
            '-' if i > 0 && bytes[i - 1] == b' ' && bytes.get(i + 1) == Some(&b' ') => {
                return Some(i - 1);
            }
            _ => {}
        }
    }
    None
}
