//! Loader Configuration
//!
//! Options passed from the hosting page as a plain JS object. Every field
//! has a default, so `{}` (or nothing at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Placeholder texts rendered as the first, unselected option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderLabels {
    /// Generic "Select"
    pub select: String,
    /// Shown when the main company is not yet chosen
    pub select_main_company: String,
    /// Shown when the company is not yet chosen
    pub select_company: String,
    /// Synthetic "no provider" entry of the provider list
    pub empty: String,
}

impl Default for PlaceholderLabels {
    fn default() -> Self {
        Self {
            select: "Select".to_string(),
            select_main_company: "Select a Main Company".to_string(),
            select_company: "Select a Company".to_string(),
            empty: "Empty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Prefix for every endpoint route; empty means same origin.
    pub base_url: String,
    pub labels: PlaceholderLabels,
    /// Drop responses that arrive after a newer request for the same target.
    pub drop_stale_responses: bool,
}

impl LoaderConfig {
    /// Decode from a JS object; `undefined`/`null` yield the defaults.
    pub fn from_js(value: JsValue) -> Result<Self, String> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
    }
}
