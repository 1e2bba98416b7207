//! Cascade Select Demo Entry Point

use cascade_select::app::{main_companies_from_page, App};
use cascade_select::diagnostics::{ConsoleDiagnostics, Diagnostics};
use cascade_select::ui;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let main_companies = main_companies_from_page();
    mount_to_body(move || view! { <App main_companies=main_companies /> });

    if let Err(e) = ui::activate_tooltips() {
        ConsoleDiagnostics.error(&format!("[Init] {}", e));
    }
}
