//! UI Components
//!
//! Leptos components driven by the option loaders.

mod dependent_select;
mod signal_field;

pub use dependent_select::{DependentSelect, IncludeAllToggle};
pub use signal_field::SignalField;
