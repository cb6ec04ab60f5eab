//! Tunables for parsing and display. Both sections deserialize straight out
//! of the CLI config file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParseOptions {
    /// Substrings marking a description as a return wherever they appear,
    /// matched against the lowercased description
    pub return_markers: Vec<String>,
    /// Words marking a description as a return only when they open it
    /// ("Caisse: 3 Chopines Beer", "Return 2 Bouteilles")
    pub return_prefixes: Vec<String>,
    /// Container words tracked on top of chopine/bouteille (singular form)
    pub extra_containers: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            return_markers: vec!["returned".to_string()],
            return_prefixes: vec!["return".to_string(), "caisse".to_string()],
            extra_containers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// IANA timezone the store operates in
    pub timezone: String,
    pub date_format: String,
    pub time_format: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            timezone: "Indian/Mauritius".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }
}
