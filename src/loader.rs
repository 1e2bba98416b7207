//! Dependent Option Loader
//!
//! Reads a source field, queries an endpoint and rewrites the target field's
//! options. A blank source renders a placeholder without touching the
//! network.

use crate::config::LoaderConfig;
use crate::diagnostics::Diagnostics;
use crate::endpoint::{Endpoint, ErrorPolicy, Query, ResponseShape};
use crate::error::LoadError;
use crate::field::Field;
use crate::generation::Generations;
use crate::http::HttpClient;
use crate::models::{OptionEntry, OptionList, RenderedOption};

/// What a load did to its target field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Source was blank; target now holds only the placeholder.
    Placeholder,
    /// Target now holds this many options, placeholder included.
    Rendered(usize),
    /// The request failed and was logged; target left as it was.
    Failed,
    /// A newer request for the same target was issued; response dropped.
    Stale,
    /// The task was aborted before completing.
    Aborted,
}

pub struct OptionLoader<C, D> {
    client: C,
    diagnostics: D,
    config: LoaderConfig,
    generations: Generations,
}

impl<C: HttpClient, D: Diagnostics> OptionLoader<C, D> {
    pub fn new(client: C, diagnostics: D, config: LoaderConfig) -> Self {
        Self {
            client,
            diagnostics,
            config,
            generations: Generations::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Force `target` back to a lone placeholder. Supersedes any in-flight
    /// load for that target when stale responses are dropped.
    pub fn reset(&self, target: &dyn Field, label: &str) {
        self.generations.issue(target.key());
        target.replace_options(&OptionList::placeholder(label));
    }

    /// Core load: gate on `source`, build the query from its value, fetch,
    /// render into `target`.
    pub async fn load(
        &self,
        endpoint: &Endpoint,
        source: &dyn Field,
        target: &dyn Field,
        blank_label: &str,
        build_query: impl FnOnce(String) -> Query,
    ) -> Result<LoadOutcome, LoadError> {
        let ticket = self.generations.issue(target.key());
        let value = source.value();
        if value.is_empty() {
            target.replace_options(&OptionList::placeholder(blank_label));
            return Ok(LoadOutcome::Placeholder);
        }

        let spec = endpoint.spec();
        let url = spec.url(&self.config.base_url, &build_query(value));

        let entries = match self.fetch_entries(&url, &spec.shape).await {
            Ok(entries) => entries,
            // Transport failures are always swallowed; only bad payloads
            // propagate, and only on routes that propagate.
            Err(e) if e.is_transport() || spec.policy == ErrorPolicy::LogAndKeep => {
                self.diagnostics.error(&format!("[Loader] {} failed: {}", url, e));
                return Ok(LoadOutcome::Failed);
            }
            Err(e) => return Err(e),
        };

        if self.config.drop_stale_responses && !self.generations.is_current(&ticket) {
            self.diagnostics
                .info(&format!("[Loader] Dropped stale response from {} for #{}", url, target.key()));
            return Ok(LoadOutcome::Stale);
        }

        let labels = &self.config.labels;
        let extras = if spec.empty_option {
            vec![RenderedOption::new("0", labels.empty.as_str())]
        } else {
            Vec::new()
        };
        let options = OptionList::from_entries(&labels.select, &extras, &entries);
        target.replace_options(&options);
        Ok(LoadOutcome::Rendered(options.len()))
    }

    async fn fetch_entries(&self, url: &str, shape: &ResponseShape) -> Result<Vec<OptionEntry>, LoadError> {
        let body = self.client.get_json(url).await?;
        shape.extract(body)
    }

    // ========================
    // Main-company scoped lists
    // ========================

    pub async fn load_companies_socnet(
        &self,
        main_company: &dyn Field,
        target: &dyn Field,
        include_all: Option<&dyn Field>,
    ) -> Result<LoadOutcome, LoadError> {
        let all = include_all_flag(include_all);
        self.load(&Endpoint::EmpresasSocnet, main_company, target, &self.config.labels.select, |main| {
            Query::new().with("cod_empresa_principal", main).with("todos", all)
        })
        .await
    }

    pub async fn load_companies(
        &self,
        main_company: &dyn Field,
        target: &dyn Field,
        include_all: Option<&dyn Field>,
    ) -> Result<LoadOutcome, LoadError> {
        let all = include_all_flag(include_all);
        self.load(&Endpoint::Empresas, main_company, target, &self.config.labels.select, |main| {
            Query::new().with("cod_empresa_principal", main).with("todos", all)
        })
        .await
    }

    /// Query-string variant with an optional active/inactive status filter.
    pub async fn load_companies_v2(
        &self,
        main_company: &dyn Field,
        target: &dyn Field,
        status: Option<&dyn Field>,
    ) -> Result<LoadOutcome, LoadError> {
        let status = status.map(|f| f.value());
        self.load(
            &Endpoint::EmpresasV2,
            main_company,
            target,
            &self.config.labels.select_main_company,
            |main| {
                Query::new()
                    .with("cod_empresa_principal", main)
                    .with_optional("status_empresas", status)
            },
        )
        .await
    }

    pub async fn load_exams(
        &self,
        main_company: &dyn Field,
        target: &dyn Field,
    ) -> Result<LoadOutcome, LoadError> {
        self.load(&Endpoint::Exames, main_company, target, &self.config.labels.select, |main| {
            Query::new().with("cod_empresa_principal", main)
        })
        .await
    }

    /// Provider list; always carries the synthetic "Empty" option.
    pub async fn load_providers(
        &self,
        main_company: &dyn Field,
        target: &dyn Field,
        include_all: &dyn Field,
    ) -> Result<LoadOutcome, LoadError> {
        let all = include_all_flag(Some(include_all));
        self.load(&Endpoint::Prestadores, main_company, target, &self.config.labels.select, |main| {
            Query::new().with("cod_empresa_principal", main).with("todos", all)
        })
        .await
    }

    // ========================
    // Company scoped lists
    // ========================

    /// Units of a company. Gated on the company; the main company is read
    /// at request time.
    pub async fn load_units(
        &self,
        main_company: &dyn Field,
        company: &dyn Field,
        target: &dyn Field,
    ) -> Result<LoadOutcome, LoadError> {
        self.load_units_from(Endpoint::Unidades, main_company, company, target).await
    }

    /// Same as [`Self::load_units`], against the unauthenticated route.
    pub async fn load_units_public(
        &self,
        main_company: &dyn Field,
        company: &dyn Field,
        target: &dyn Field,
    ) -> Result<LoadOutcome, LoadError> {
        self.load_units_from(Endpoint::UnidadesPublic, main_company, company, target).await
    }

    async fn load_units_from(
        &self,
        endpoint: Endpoint,
        main_company: &dyn Field,
        company: &dyn Field,
        target: &dyn Field,
    ) -> Result<LoadOutcome, LoadError> {
        let main = main_company.value();
        self.load(&endpoint, company, target, &self.config.labels.select, |company| {
            Query::new().with("cod_empresa_principal", main).with("id_empresa", company)
        })
        .await
    }

    // ========================
    // Configurable endpoints
    // ========================

    /// Any bare-array route keyed by main company (`cod_emp_princ`).
    pub async fn load_for_main_company(
        &self,
        route: &str,
        main_company: &dyn Field,
        target: &dyn Field,
        active: Option<&dyn Field>,
        groups: Option<&dyn Field>,
    ) -> Result<LoadOutcome, LoadError> {
        self.load_filtered(
            route,
            "cod_emp_princ",
            &self.config.labels.select_main_company,
            main_company,
            target,
            active,
            groups,
        )
        .await
    }

    /// Any bare-array route keyed by company (`id_empresa`).
    pub async fn load_for_company(
        &self,
        route: &str,
        company: &dyn Field,
        target: &dyn Field,
        active: Option<&dyn Field>,
        groups: Option<&dyn Field>,
    ) -> Result<LoadOutcome, LoadError> {
        self.load_filtered(
            route,
            "id_empresa",
            &self.config.labels.select_company,
            company,
            target,
            active,
            groups,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn load_filtered(
        &self,
        route: &str,
        parent_key: &str,
        blank_label: &str,
        source: &dyn Field,
        target: &dyn Field,
        active: Option<&dyn Field>,
        groups: Option<&dyn Field>,
    ) -> Result<LoadOutcome, LoadError> {
        let active = active.map(|f| f.value());
        let groups = groups.map(|f| f.value()).filter(|g| !g.is_empty());
        self.load(&Endpoint::Custom(route.to_string()), source, target, blank_label, |parent| {
            let query = Query::new().with(parent_key, parent).with_optional("ativo", active);
            match groups {
                Some(groups) => query.with("filtro_grupos", groups),
                None => query,
            }
        })
        .await
    }
}

/// `1` unless an "include all" checkbox exists and is unchecked.
fn include_all_flag(checkbox: Option<&dyn Field>) -> &'static str {
    match checkbox {
        Some(checkbox) if !checkbox.is_checked() => "0",
        _ => "1",
    }
}
