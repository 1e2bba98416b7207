//! Orchestrators
//!
//! Refresh several dependent fields off one parent. Sibling loads run
//! independently and may finish in any order; the grandchild field is reset
//! synchronously, before any load starts, whatever the loads end up doing.

use std::future::Future;
use std::rc::Rc;

use futures::future::{join_all, AbortHandle, Abortable, LocalBoxFuture};
use futures::FutureExt;

use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::field::Field;
use crate::http::HttpClient;
use crate::loader::{LoadOutcome, OptionLoader};

/// Shared handle to a field, as held by spawned tasks
pub type FieldRef = Rc<dyn Field>;

type Report = Rc<dyn Fn(&str)>;

/// One abortable loader invocation
pub struct LoadTask {
    name: &'static str,
    future: Abortable<LocalBoxFuture<'static, Result<LoadOutcome, LoadError>>>,
    handle: AbortHandle,
}

impl LoadTask {
    pub fn new(
        name: &'static str,
        future: impl Future<Output = Result<LoadOutcome, LoadError>> + 'static,
    ) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        Self {
            name,
            future: Abortable::new(future.boxed_local(), registration),
            handle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.clone()
    }

    pub async fn run(self) -> Result<LoadOutcome, LoadError> {
        self.future.await.unwrap_or(Ok(LoadOutcome::Aborted))
    }

    /// Run, reporting an error nobody is waiting for.
    async fn run_reported(self, report: Report) {
        let name = self.name;
        if let Err(e) = self.run().await {
            report(&format!("[Refresh] Unhandled failure in {} load: {}", name, e));
        }
    }
}

/// Loads issued by one orchestrator call
pub struct Refresh {
    tasks: Vec<LoadTask>,
    report: Report,
}

impl Refresh {
    pub fn tasks(&self) -> &[LoadTask] {
        &self.tasks
    }

    /// Fire every load on the event loop; returns handles to cancel them.
    pub fn spawn(self) -> Vec<AbortHandle> {
        let Refresh { tasks, report } = self;
        tasks
            .into_iter()
            .map(|task| {
                let handle = task.abort_handle();
                wasm_bindgen_futures::spawn_local(task.run_reported(report.clone()));
                handle
            })
            .collect()
    }

    /// Await every load and collect the results.
    pub async fn join(self) -> Vec<Result<LoadOutcome, LoadError>> {
        join_all(self.tasks.into_iter().map(LoadTask::run)).await
    }

    /// Await every load, reporting failures the way [`Self::spawn`] does.
    pub async fn settle(self) {
        let Refresh { tasks, report } = self;
        join_all(tasks.into_iter().map(|task| task.run_reported(report.clone()))).await;
    }
}

pub struct Orchestrator<C, D> {
    loader: Rc<OptionLoader<C, D>>,
}

impl<C, D> Clone for Orchestrator<C, D> {
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
        }
    }
}

impl<C: HttpClient + 'static, D: Diagnostics + 'static> Orchestrator<C, D> {
    pub fn new(loader: OptionLoader<C, D>) -> Self {
        Self {
            loader: Rc::new(loader),
        }
    }

    pub fn loader(&self) -> &Rc<OptionLoader<C, D>> {
        &self.loader
    }

    fn refresh(&self, tasks: Vec<LoadTask>) -> Refresh {
        let loader = self.loader.clone();
        Refresh {
            tasks,
            report: Rc::new(move |message: &str| loader.diagnostics().error(message)),
        }
    }

    /// Main company changed on the SOCNET search: companies + providers.
    pub fn refresh_socnet_search(
        &self,
        main_company: &FieldRef,
        company: &FieldRef,
        provider: &FieldRef,
        include_all: &FieldRef,
    ) -> Refresh {
        let loader = self.loader.clone();
        let (main, target, all) = (main_company.clone(), company.clone(), include_all.clone());
        let companies = LoadTask::new("companies_socnet", async move {
            loader.load_companies_socnet(&*main, &*target, Some(&*all)).await
        });
        self.refresh(vec![companies, self.providers_task(main_company, provider, include_all)])
    }

    /// Main company changed on the order search: companies + providers,
    /// unit reset.
    pub fn refresh_order_search(
        &self,
        main_company: &FieldRef,
        company: &FieldRef,
        provider: &FieldRef,
        unit: &FieldRef,
        include_all: &FieldRef,
    ) -> Refresh {
        self.loader.reset(&**unit, &self.loader.config().labels.select);
        self.refresh(vec![
            self.companies_task(main_company, company, Some(include_all)),
            self.providers_task(main_company, provider, include_all),
        ])
    }

    /// Main company changed on the performed-exams search: companies +
    /// exams, unit reset.
    pub fn refresh_exams_done(
        &self,
        main_company: &FieldRef,
        company: &FieldRef,
        unit: &FieldRef,
        exam: &FieldRef,
    ) -> Refresh {
        self.loader.reset(&**unit, &self.loader.config().labels.select);

        let loader = self.loader.clone();
        let (main, target) = (main_company.clone(), exam.clone());
        let exams = LoadTask::new("exams", async move {
            loader.load_exams(&*main, &*target).await
        });

        self.refresh(vec![self.companies_task(main_company, company, None), exams])
    }

    /// Main company changed on the absenteeism search: companies, unit reset.
    pub fn refresh_absenteeism(
        &self,
        main_company: &FieldRef,
        company: &FieldRef,
        unit: &FieldRef,
    ) -> Refresh {
        self.loader.reset(&**unit, &self.loader.config().labels.select_company);
        self.refresh(vec![self.companies_task(main_company, company, None)])
    }

    fn companies_task(
        &self,
        main_company: &FieldRef,
        company: &FieldRef,
        include_all: Option<&FieldRef>,
    ) -> LoadTask {
        let loader = self.loader.clone();
        let (main, target, all) = (main_company.clone(), company.clone(), include_all.cloned());
        LoadTask::new("companies", async move {
            loader.load_companies(&*main, &*target, all.as_deref()).await
        })
    }

    fn providers_task(
        &self,
        main_company: &FieldRef,
        provider: &FieldRef,
        include_all: &FieldRef,
    ) -> LoadTask {
        let loader = self.loader.clone();
        let (main, target, all) = (main_company.clone(), provider.clone(), include_all.clone());
        LoadTask::new("providers", async move {
            loader.load_providers(&*main, &*target, &*all).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::models::{OptionEntry, OptionList};
    use crate::testing::{MemoryField, RecordingDiagnostics, StubClient};
    use serde_json::json;

    struct Form {
        main: MemoryField,
        company: MemoryField,
        provider: MemoryField,
        unit: MemoryField,
        exam: MemoryField,
        all: MemoryField,
    }

    impl Form {
        fn new(main: &str) -> Self {
            let unit = MemoryField::new("unit");
            unit.replace_options(&OptionList::from_entries(
                "Select",
                &[],
                &serde_json::from_value::<Vec<OptionEntry>>(json!([{"id": 1, "nome": "Old unit"}])).unwrap(),
            ));
            Self {
                main: MemoryField::new("main").with_value(main),
                company: MemoryField::new("company"),
                provider: MemoryField::new("provider"),
                unit,
                exam: MemoryField::new("exam"),
                all: MemoryField::new("all").checked(),
            }
        }

        fn refs(&self) -> [FieldRef; 6] {
            [
                Rc::new(self.main.clone()),
                Rc::new(self.company.clone()),
                Rc::new(self.provider.clone()),
                Rc::new(self.unit.clone()),
                Rc::new(self.exam.clone()),
                Rc::new(self.all.clone()),
            ]
        }
    }

    fn orchestrator(
        client: &StubClient,
        diagnostics: &RecordingDiagnostics,
    ) -> Orchestrator<StubClient, RecordingDiagnostics> {
        Orchestrator::new(OptionLoader::new(client.clone(), diagnostics.clone(), LoaderConfig::default()))
    }

    #[tokio::test]
    async fn test_order_search_refreshes_siblings_and_resets_unit() {
        let client = StubClient::new();
        client.respond("/fetch_empresas/5/1", json!({"dados": [{"id": 10, "nome": "Acme"}]}));
        client.respond("/fetch_prestadores/5/1", json!({"dados": [{"id": 20, "nome": "Clinic"}]}));
        let diagnostics = RecordingDiagnostics::new();
        let form = Form::new("5");
        let [main, company, provider, unit, _, all] = form.refs();

        let refresh = orchestrator(&client, &diagnostics).refresh_order_search(&main, &company, &provider, &unit, &all);

        assert_eq!(form.unit.markup(), r#"<option value="">Select</option>"#);
        assert!(client.calls().is_empty());

        let results = refresh.join().await;
        assert!(results.iter().all(|r| matches!(r, Ok(LoadOutcome::Rendered(_)))));
        assert_eq!(form.company.options().unwrap().values(), vec!["", "10"]);
        assert_eq!(form.provider.options().unwrap().values(), vec!["", "0", "20"]);
    }

    #[tokio::test]
    async fn test_unit_reset_survives_failed_loads() {
        let client = StubClient::new();
        client.fail("/fetch_empresas/5/1", "offline");
        client.fail("/fetch_exames/5", "offline");
        let diagnostics = RecordingDiagnostics::new();
        let form = Form::new("5");
        let [main, company, _, unit, exam, _] = form.refs();

        let refresh = orchestrator(&client, &diagnostics).refresh_exams_done(&main, &company, &unit, &exam);
        refresh.settle().await;

        assert_eq!(form.unit.options().unwrap().labels(), vec!["Select"]);
        assert!(form.company.options().is_none());
        assert!(form.exam.options().is_none());
        assert_eq!(diagnostics.errors().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_reported_once_as_unhandled() {
        let client = StubClient::new();
        client.respond("/fetch_empresas/5/1", json!([{"id": 10, "nome": "Acme"}]));
        let diagnostics = RecordingDiagnostics::new();
        let form = Form::new("5");
        let [main, company, _, unit, _, _] = form.refs();

        orchestrator(&client, &diagnostics)
            .refresh_absenteeism(&main, &company, &unit)
            .settle()
            .await;

        let errors = diagnostics.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Unhandled failure in companies load"));
        assert!(form.company.options().is_none());
    }

    #[tokio::test]
    async fn test_absenteeism_resets_unit_with_company_label() {
        let client = StubClient::new();
        let diagnostics = RecordingDiagnostics::new();
        let form = Form::new("");
        let [main, company, _, unit, _, _] = form.refs();

        let results = orchestrator(&client, &diagnostics)
            .refresh_absenteeism(&main, &company, &unit)
            .join()
            .await;

        assert_eq!(form.unit.markup(), r#"<option value="">Select a Company</option>"#);
        assert!(matches!(results[..], [Ok(LoadOutcome::Placeholder)]));
        assert_eq!(form.company.markup(), r#"<option value="">Select</option>"#);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_socnet_search_loads_both_lists() {
        let client = StubClient::new();
        client.respond("/fetch_empresas_socnet/7/0", json!({"dados": [{"id": 1, "nome": "A"}, {"id": 2, "nome": "B"}]}));
        client.respond("/fetch_prestadores/7/0", json!({"dados": []}));
        let diagnostics = RecordingDiagnostics::new();
        let form = Form::new("7");
        form.all.set_checked(false);
        let [main, company, provider, _, _, all] = form.refs();

        let refresh = orchestrator(&client, &diagnostics).refresh_socnet_search(&main, &company, &provider, &all);
        assert_eq!(refresh.tasks().len(), 2);
        let results = refresh.join().await;

        assert!(matches!(results[0], Ok(LoadOutcome::Rendered(3))));
        assert!(matches!(results[1], Ok(LoadOutcome::Rendered(2))));
        assert_eq!(form.provider.options().unwrap().labels(), vec!["Select", "Empty"]);
    }

    #[tokio::test]
    async fn test_aborted_task_leaves_target_untouched() {
        let client = StubClient::new();
        client.respond("/fetch_empresas/5/1", json!({"dados": [{"id": 10, "nome": "Acme"}]}));
        let diagnostics = RecordingDiagnostics::new();
        let form = Form::new("5");
        let [main, company, _, unit, _, _] = form.refs();

        let refresh = orchestrator(&client, &diagnostics).refresh_absenteeism(&main, &company, &unit);
        for task in refresh.tasks() {
            task.abort_handle().abort();
        }
        let results = refresh.join().await;

        assert!(matches!(results[..], [Ok(LoadOutcome::Aborted)]));
        assert!(form.company.options().is_none());
        assert!(client.calls().is_empty());
    }
}
