//! HTTP Helper
//!
//! GET + JSON decode, behind a trait so loaders can run against a stub.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::LoadError;

/// Issues GET requests and decodes the JSON body
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, LoadError>;
}

/// `window.fetch` client
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchClient;

impl HttpClient for FetchClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, LoadError> {
        let window = web_sys::window()
            .ok_or_else(|| LoadError::Transport("No window available".to_string()))?;

        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| LoadError::Transport(js_error(&e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| LoadError::Transport("fetch did not resolve to a Response".to_string()))?;

        if !response.ok() {
            return Err(LoadError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let body = response.json().map_err(|e| LoadError::Json(js_error(&e)))?;
        let body = JsFuture::from(body).await.map_err(|e| LoadError::Json(js_error(&e)))?;
        let text: String = js_sys::JSON::stringify(&body)
            .map_err(|e| LoadError::Json(js_error(&e)))?
            .into();

        serde_json::from_str(&text).map_err(|e| LoadError::Json(e.to_string()))
    }
}

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
