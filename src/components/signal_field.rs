//! Signal Field
//!
//! `Field` backed by Leptos signals, so the loaders can drive components
//! exactly as they drive plain DOM elements.

use leptos::prelude::*;

use crate::field::Field;
use crate::models::OptionList;

#[derive(Clone, Copy, Debug)]
pub struct SignalField {
    id: &'static str,
    pub value: RwSignal<String>,
    pub checked: RwSignal<bool>,
    pub options: RwSignal<OptionList>,
}

impl SignalField {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            value: RwSignal::new(String::new()),
            checked: RwSignal::new(false),
            options: RwSignal::new(OptionList::default()),
        }
    }

    /// Element id used when rendering
    pub fn id(&self) -> &'static str {
        self.id
    }
}

impl Field for SignalField {
    fn key(&self) -> &str {
        self.id
    }

    fn value(&self) -> String {
        self.value.get_untracked()
    }

    fn is_checked(&self) -> bool {
        self.checked.get_untracked()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    // A replaced <select> falls back to its first (placeholder) option.
    fn replace_options(&self, options: &OptionList) {
        self.options.set(options.clone());
        self.value.set(String::new());
    }
}
