//! Cascading dependent `<select>` loaders.
//!
//! A parent field (main company, company) gates which options a dependent
//! field may hold. Loaders read the parent, query the backend and replace the
//! dependent field's options; orchestrators refresh several dependents at
//! once. Templates call the [`bindings`]; Leptos front ends use [`app`] and
//! [`components`].

pub mod app;
pub mod bindings;
pub mod components;
pub mod config;
pub mod diagnostics;
pub mod endpoint;
pub mod error;
pub mod field;
pub mod generation;
pub mod http;
pub mod loader;
pub mod models;
pub mod orchestrator;
pub mod ui;

#[cfg(test)]
mod testing;

pub use config::{LoaderConfig, PlaceholderLabels};
pub use error::LoadError;
pub use field::{DomField, Field};
pub use loader::{LoadOutcome, OptionLoader};
pub use orchestrator::{Orchestrator, Refresh};
