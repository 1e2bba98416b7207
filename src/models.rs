//! Option Models
//!
//! Option entries as served by the backend, and the rendered option lists
//! written into target fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an option entry. The backend sends integers for most
/// entities, but string ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionId::Number(n) => write!(f, "{}", n),
            OptionId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of a server response (matches backend `{id, nome}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub id: OptionId,
    #[serde(alias = "label")]
    pub nome: String,
}

/// A single `<option>` as rendered into a target field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOption {
    pub value: String,
    pub label: String,
}

impl RenderedOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Ordered option list; always starts with the unselected placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    options: Vec<RenderedOption>,
}

impl OptionList {
    /// A list holding only the unselected placeholder.
    pub fn placeholder(label: &str) -> Self {
        Self {
            options: vec![RenderedOption::new("", label)],
        }
    }

    /// Placeholder, then `extras` in order, then one option per entry in
    /// response order.
    pub fn from_entries(
        placeholder: &str,
        extras: &[RenderedOption],
        entries: &[OptionEntry],
    ) -> Self {
        let mut list = Self::placeholder(placeholder);
        list.options.extend(extras.iter().cloned());
        list.options.extend(
            entries
                .iter()
                .map(|entry| RenderedOption::new(entry.id.to_string(), entry.nome.clone())),
        );
        list
    }

    pub fn options(&self) -> &[RenderedOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    /// Render as `<option>` markup suitable for `innerHTML`.
    pub fn to_markup(&self) -> String {
        self.options
            .iter()
            .map(|o| format!(r#"<option value="{}">{}</option>"#, escape_html(&o.value), escape_html(&o.label)))
            .collect()
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
