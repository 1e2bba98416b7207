//! Page Bindings
//!
//! Functions callable from server-rendered templates. Element ids are
//! resolved into field handles here and nowhere else.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::LoaderConfig;
use crate::diagnostics::{ConsoleDiagnostics, Diagnostics};
use crate::error::LoadError;
use crate::field::{DomField, Field};
use crate::http::FetchClient;
use crate::loader::OptionLoader;
use crate::orchestrator::{FieldRef, Orchestrator};
use crate::ui;

type PageOrchestrator = Orchestrator<FetchClient, ConsoleDiagnostics>;

thread_local! {
    static PAGE: RefCell<Option<PageOrchestrator>> = const { RefCell::new(None) };
}

fn build(config: LoaderConfig) -> PageOrchestrator {
    Orchestrator::new(OptionLoader::new(FetchClient, ConsoleDiagnostics, config))
}

/// Orchestrator configured by [`setup_loaders`], or a default one.
fn page() -> PageOrchestrator {
    PAGE.with(|page| {
        page.borrow_mut()
            .get_or_insert_with(|| build(LoaderConfig::default()))
            .clone()
    })
}

fn field(id: &str) -> Result<FieldRef, JsValue> {
    Ok(Rc::new(DomField::by_id(id)?))
}

fn optional(field: &Option<DomField>) -> Option<&dyn Field> {
    field.as_ref().map(|f| f as &dyn Field)
}

fn js_error(e: LoadError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Configure the loaders and activate tooltips. Safe to skip; every
/// function falls back to the default configuration.
#[wasm_bindgen(js_name = setupLoaders)]
pub fn setup_loaders(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let config = LoaderConfig::from_js(config)?;
    PAGE.with(|page| *page.borrow_mut() = Some(build(config)));

    if let Err(e) = ui::activate_tooltips() {
        ConsoleDiagnostics.error(&format!("[Init] {}", e));
    }
    Ok(())
}

// ========================
// Loaders
// ========================

#[wasm_bindgen(js_name = loadCompaniesSocnet)]
pub async fn load_companies_socnet(
    main_id: String,
    target_id: String,
    include_all_id: Option<String>,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, target) = (DomField::by_id(&main_id)?, DomField::by_id(&target_id)?);
    let include_all = DomField::by_optional_id(include_all_id)?;
    loader
        .load_companies_socnet(&main, &target, optional(&include_all))
        .await
        .map_err(js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = loadCompanies)]
pub async fn load_companies(
    main_id: String,
    target_id: String,
    include_all_id: Option<String>,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, target) = (DomField::by_id(&main_id)?, DomField::by_id(&target_id)?);
    let include_all = DomField::by_optional_id(include_all_id)?;
    loader
        .load_companies(&main, &target, optional(&include_all))
        .await
        .map_err(js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = loadCompaniesV2)]
pub async fn load_companies_v2(
    main_id: String,
    target_id: String,
    status_id: Option<String>,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, target) = (DomField::by_id(&main_id)?, DomField::by_id(&target_id)?);
    let status = DomField::by_optional_id(status_id)?;
    loader
        .load_companies_v2(&main, &target, optional(&status))
        .await
        .map_err(js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = loadUnits)]
pub async fn load_units(
    main_id: String,
    company_id: String,
    unit_id: String,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, company, unit) = (
        DomField::by_id(&main_id)?,
        DomField::by_id(&company_id)?,
        DomField::by_id(&unit_id)?,
    );
    loader.load_units(&main, &company, &unit).await.map_err(js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = loadUnitsPublic)]
pub async fn load_units_public(
    main_id: String,
    company_id: String,
    unit_id: String,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, company, unit) = (
        DomField::by_id(&main_id)?,
        DomField::by_id(&company_id)?,
        DomField::by_id(&unit_id)?,
    );
    loader.load_units_public(&main, &company, &unit).await.map_err(js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = loadExams)]
pub async fn load_exams(main_id: String, exam_id: String) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, exam) = (DomField::by_id(&main_id)?, DomField::by_id(&exam_id)?);
    loader.load_exams(&main, &exam).await.map_err(js_error)?;
    Ok(())
}

#[wasm_bindgen(js_name = loadProviders)]
pub async fn load_providers(
    main_id: String,
    provider_id: String,
    include_all_id: String,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, provider, include_all) = (
        DomField::by_id(&main_id)?,
        DomField::by_id(&provider_id)?,
        DomField::by_id(&include_all_id)?,
    );
    loader
        .load_providers(&main, &provider, &include_all)
        .await
        .map_err(js_error)?;
    Ok(())
}

/// Bare-array route keyed by main company, e.g. `/api/internal/empresa`.
#[wasm_bindgen(js_name = loadForMainCompany)]
pub async fn load_for_main_company(
    endpoint: String,
    main_id: String,
    target_id: String,
    active_id: Option<String>,
    groups_id: Option<String>,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (main, target) = (DomField::by_id(&main_id)?, DomField::by_id(&target_id)?);
    let active = DomField::by_optional_id(active_id)?;
    let groups = DomField::by_optional_id(groups_id)?;
    loader
        .load_for_main_company(&endpoint, &main, &target, optional(&active), optional(&groups))
        .await
        .map_err(js_error)?;
    Ok(())
}

/// Bare-array route keyed by company.
#[wasm_bindgen(js_name = loadForCompany)]
pub async fn load_for_company(
    endpoint: String,
    company_id: String,
    target_id: String,
    active_id: Option<String>,
    groups_id: Option<String>,
) -> Result<(), JsValue> {
    let loader = page().loader().clone();
    let (company, target) = (DomField::by_id(&company_id)?, DomField::by_id(&target_id)?);
    let active = DomField::by_optional_id(active_id)?;
    let groups = DomField::by_optional_id(groups_id)?;
    loader
        .load_for_company(&endpoint, &company, &target, optional(&active), optional(&groups))
        .await
        .map_err(js_error)?;
    Ok(())
}

// ========================
// Orchestrators
// ========================

#[wasm_bindgen(js_name = refreshSocnetSearch)]
pub fn refresh_socnet_search(
    main_id: &str,
    company_id: &str,
    provider_id: &str,
    include_all_id: &str,
) -> Result<(), JsValue> {
    page()
        .refresh_socnet_search(
            &field(main_id)?,
            &field(company_id)?,
            &field(provider_id)?,
            &field(include_all_id)?,
        )
        .spawn();
    Ok(())
}

#[wasm_bindgen(js_name = refreshOrderSearch)]
pub fn refresh_order_search(
    main_id: &str,
    company_id: &str,
    provider_id: &str,
    unit_id: &str,
    include_all_id: &str,
) -> Result<(), JsValue> {
    page()
        .refresh_order_search(
            &field(main_id)?,
            &field(company_id)?,
            &field(provider_id)?,
            &field(unit_id)?,
            &field(include_all_id)?,
        )
        .spawn();
    Ok(())
}

#[wasm_bindgen(js_name = refreshExamsDone)]
pub fn refresh_exams_done(
    main_id: &str,
    company_id: &str,
    unit_id: &str,
    exam_id: &str,
) -> Result<(), JsValue> {
    page()
        .refresh_exams_done(
            &field(main_id)?,
            &field(company_id)?,
            &field(unit_id)?,
            &field(exam_id)?,
        )
        .spawn();
    Ok(())
}

#[wasm_bindgen(js_name = refreshAbsenteeism)]
pub fn refresh_absenteeism(
    main_id: &str,
    company_id: &str,
    unit_id: &str,
) -> Result<(), JsValue> {
    page()
        .refresh_absenteeism(&field(main_id)?, &field(company_id)?, &field(unit_id)?)
        .spawn();
    Ok(())
}

// ========================
// Misc
// ========================

/// `onclick="toggleCheckboxes(this, 'rows')"`
#[wasm_bindgen(js_name = toggleCheckboxes)]
pub fn toggle_checkboxes(source: Element, group_name: &str) -> Result<(), JsValue> {
    let source = DomField::new(group_name, source);
    let group = DomField::by_name(group_name)?;
    ui::toggle_group(&source, &group);
    Ok(())
}

#[wasm_bindgen(js_name = scrollToTop)]
pub fn scroll_to_top() {
    ui::scroll_to_top();
}
