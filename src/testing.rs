//! Test doubles: in-memory fields, a scripted HTTP client and a recording
//! diagnostics sink.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use futures::channel::oneshot;

use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::field::Field;
use crate::http::HttpClient;
use crate::models::OptionList;

#[derive(Default)]
struct FieldState {
    value: String,
    checked: bool,
    options: Option<OptionList>,
    markup: String,
}

#[derive(Clone)]
pub struct MemoryField {
    key: String,
    state: Rc<RefCell<FieldState>>,
}

impl MemoryField {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            state: Rc::default(),
        }
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn checked(self) -> Self {
        self.set_checked(true);
        self
    }

    pub fn set_value(&self, value: &str) {
        self.state.borrow_mut().value = value.to_string();
    }

    /// Last list written, `None` if never written.
    pub fn options(&self) -> Option<OptionList> {
        self.state.borrow().options.clone()
    }

    pub fn markup(&self) -> String {
        self.state.borrow().markup.clone()
    }
}

impl Field for MemoryField {
    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    fn is_checked(&self) -> bool {
        self.state.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        self.state.borrow_mut().checked = checked;
    }

    fn replace_options(&self, options: &OptionList) {
        let mut state = self.state.borrow_mut();
        state.markup = options.to_markup();
        state.options = Some(options.clone());
    }
}

type Reply = Result<serde_json::Value, String>;

#[derive(Default)]
struct StubState {
    replies: HashMap<String, Reply>,
    deferred: HashMap<String, VecDeque<oneshot::Receiver<Reply>>>,
    calls: Vec<String>,
}

/// Answers GETs from a table of canned replies keyed by URL
#[derive(Clone, Default)]
pub struct StubClient {
    state: Rc<RefCell<StubState>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: serde_json::Value) {
        self.state.borrow_mut().replies.insert(url.to_string(), Ok(body));
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.state
            .borrow_mut()
            .replies
            .insert(url.to_string(), Err(message.to_string()));
    }

    /// The next GET of `url` waits until the returned sender fires.
    pub fn defer(&self, url: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.state
            .borrow_mut()
            .deferred
            .entry(url.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }
}

impl HttpClient for StubClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, LoadError> {
        let deferred = {
            let mut state = self.state.borrow_mut();
            state.calls.push(url.to_string());
            state.deferred.get_mut(url).and_then(|queue| queue.pop_front())
        };

        let reply = match deferred {
            Some(rx) => rx.await.unwrap_or_else(|_| Err("request dropped".to_string())),
            None => self
                .state
                .borrow()
                .replies
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(format!("no reply for {}", url))),
        };
        reply.map_err(LoadError::Transport)
    }
}

#[derive(Clone, Default)]
pub struct RecordingDiagnostics {
    infos: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}
