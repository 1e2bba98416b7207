//! Order Search App
//!
//! Main company → company / provider → unit, wired through the
//! orchestrators.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{DependentSelect, IncludeAllToggle, SignalField};
use crate::config::LoaderConfig;
use crate::diagnostics::{ConsoleDiagnostics, Diagnostics};
use crate::http::FetchClient;
use crate::loader::OptionLoader;
use crate::models::{OptionEntry, OptionList};
use crate::orchestrator::{FieldRef, Orchestrator};

/// Id of the `<script type="application/json">` holding the main companies
pub const MAIN_COMPANIES_ELEMENT: &str = "main-companies";

/// Main companies embedded in the page by the server. Missing or malformed
/// data yields an empty list.
pub fn main_companies_from_page() -> Vec<OptionEntry> {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MAIN_COMPANIES_ELEMENT))
        .and_then(|el| el.text_content());
    let Some(text) = text else {
        return Vec::new();
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        ConsoleDiagnostics.error(&format!("[APP] Invalid main company list: {}", e));
        Vec::new()
    })
}

#[component]
pub fn App(
    main_companies: Vec<OptionEntry>,
    #[prop(optional)] config: LoaderConfig,
) -> impl IntoView {
    let labels = config.labels.clone();
    let orchestrator = Orchestrator::new(OptionLoader::new(FetchClient, ConsoleDiagnostics, config));

    let main = SignalField::new("cod_empresa_principal");
    let company = SignalField::new("id_empresa");
    let provider = SignalField::new("id_prestador");
    let unit = SignalField::new("id_unidade");
    let include_all = SignalField::new("pesquisa_geral");

    main.options
        .set(OptionList::from_entries(&labels.select, &[], &main_companies));
    for field in [company, provider, unit] {
        field.options.set(OptionList::placeholder(&labels.select));
    }
    include_all.checked.set(true);

    let refs: [FieldRef; 5] = [
        Rc::new(main),
        Rc::new(company),
        Rc::new(provider),
        Rc::new(unit),
        Rc::new(include_all),
    ];

    let refresh_order_search = {
        let orchestrator = orchestrator.clone();
        move || {
            let [main, company, provider, unit, include_all] = &refs;
            web_sys::console::log_1(&format!("[APP] Main company -> {:?}", main.value()).into());
            orchestrator
                .refresh_order_search(main, company, provider, unit, include_all)
                .spawn();
        }
    };
    let refresh_on_toggle = refresh_order_search.clone();

    let load_units = {
        let loader = orchestrator.loader().clone();
        move || {
            let loader = loader.clone();
            spawn_local(async move {
                if let Err(e) = loader.load_units(&main, &company, &unit).await {
                    loader.diagnostics().error(&format!("[APP] Unit load failed: {}", e));
                }
            });
        }
    };

    view! {
        <form class="order-search">
            <DependentSelect field=main label="Main company" on_change=refresh_order_search />
            <DependentSelect field=company label="Company" on_change=load_units />
            <DependentSelect field=unit label="Unit" on_change=|| {} />
            <DependentSelect field=provider label="Provider" on_change=|| {} />
            <IncludeAllToggle field=include_all label="Include inactive" on_change=refresh_on_toggle />
        </form>
    }
}
