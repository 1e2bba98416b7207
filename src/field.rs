//! Field Handles
//!
//! Loaders never look fields up by id themselves; they receive handles.
//! Page-facing bindings resolve ids into [`DomField`]s once, and the Leptos
//! components hand in signal-backed fields.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};

use crate::models::OptionList;

/// A UI control holding a string value or a checked state
pub trait Field {
    /// Stable identifier, used to track the latest request per target.
    fn key(&self) -> &str;

    /// Current value; empty when nothing is selected.
    fn value(&self) -> String;

    fn is_checked(&self) -> bool;

    fn set_checked(&self, checked: bool);

    /// Replace the whole option list.
    fn replace_options(&self, options: &OptionList);
}

/// A live DOM element
#[derive(Clone, Debug)]
pub struct DomField {
    key: String,
    element: Element,
}

impl DomField {
    pub fn new(key: impl Into<String>, element: Element) -> Self {
        Self {
            key: key.into(),
            element,
        }
    }

    /// Resolve an element by id.
    pub fn by_id(id: &str) -> Result<Self, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document available")?;
        document
            .get_element_by_id(id)
            .map(|element| Self::new(id, element))
            .ok_or_else(|| format!("Element #{} not found", id))
    }

    /// Resolve an optional id; `None` stays `None`.
    pub fn by_optional_id(id: Option<String>) -> Result<Option<Self>, String> {
        id.filter(|id| !id.is_empty()).map(|id| Self::by_id(&id)).transpose()
    }

    /// All elements sharing a `name` attribute (checkbox groups).
    pub fn by_name(name: &str) -> Result<Vec<Self>, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document available")?;
        let nodes = document.get_elements_by_name(name);
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| Self::new(name, element))
            .collect())
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Field for DomField {
    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> String {
        if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else {
            self.element.get_attribute("value").unwrap_or_default()
        }
    }

    fn is_checked(&self) -> bool {
        self.element
            .dyn_ref::<HtmlInputElement>()
            .map(|input| input.checked())
            .unwrap_or(false)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn replace_options(&self, options: &OptionList) {
        self.element.set_inner_html(&options.to_markup());
    }
}
