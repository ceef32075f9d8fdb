//! JavaScript interface of the module
//!
//! Pages import these instead of reading globals off `window`:
//!
//! ```js
//! import init, { copyPrompt, likePrompt, showToast } from "/static/pkg/promptshare_web.js";
//! await init();
//! button.onclick = () => likePrompt(button.dataset.promptId);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::actions::{self, DomLikeControls};
use crate::components::toast::{ToastKind, Toaster};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::page;
use crate::services::api::{ApiClient, ApiError};
use crate::utils::{clipboard, template as templating, time, Debounced, Throttled};

/// Shown by `formatDate` for input it cannot read, matching `Date`
const INVALID_DATE: &str = "Invalid Date";

#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(message: &str, kind: Option<String>) {
    let kind = ToastKind::from_str(kind.as_deref().unwrap_or_default());
    AppContext::current().toaster().show(message, kind);
}

#[wasm_bindgen(js_name = copyToClipboard)]
pub async fn copy_to_clipboard(text: String) -> bool {
    clipboard::copy_to_clipboard(&text).await
}

#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(date: &str) -> String {
    let ctx = AppContext::current();
    time::format_date(date, &ctx.config().locale).unwrap_or_else(|e| {
        log::debug!("formatDate: {}", e);
        INVALID_DATE.to_string()
    })
}

#[wasm_bindgen]
pub fn template(template: &str, data: JsValue) -> Result<String, JsValue> {
    let data: Map<String, Value> = if data.is_undefined() || data.is_null() {
        Map::new()
    } else {
        serde_wasm_bindgen::from_value(data)?
    };
    Ok(templating::render(template, &data))
}

fn call_js(callback: &js_sys::Function, arg: &JsValue) {
    if let Err(e) = callback.call1(&JsValue::NULL, arg) {
        log::error!("Callback threw: {:?}", e);
    }
}

#[wasm_bindgen(js_name = Debounced)]
pub struct JsDebounced {
    inner: Debounced<JsValue>,
}

#[wasm_bindgen(js_class = Debounced)]
impl JsDebounced {
    #[wasm_bindgen(constructor)]
    pub fn new(callback: js_sys::Function, wait_ms: u32) -> JsDebounced {
        JsDebounced {
            inner: Debounced::new(wait_ms, move |arg: JsValue| call_js(&callback, &arg)),
        }
    }

    pub fn call(&self, arg: JsValue) {
        self.inner.call(arg);
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[wasm_bindgen(getter, js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }

    #[wasm_bindgen(getter, js_name = waitMs)]
    pub fn wait_ms(&self) -> u32 {
        self.inner.wait_ms()
    }
}

#[wasm_bindgen(js_name = Throttled)]
pub struct JsThrottled {
    inner: Throttled<JsValue>,
}

#[wasm_bindgen(js_class = Throttled)]
impl JsThrottled {
    #[wasm_bindgen(constructor)]
    pub fn new(callback: js_sys::Function, limit_ms: u32) -> JsThrottled {
        JsThrottled {
            inner: Throttled::new(limit_ms, move |arg: JsValue| call_js(&callback, &arg)),
        }
    }

    /// Returns whether the callback ran
    pub fn call(&self, arg: JsValue) -> bool {
        self.inner.call(arg)
    }

    pub fn reset(&self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter, js_name = limitMs)]
    pub fn limit_ms(&self) -> u32 {
        self.inner.limit_ms()
    }
}

/// Reject value for a failed request: an `Error` carrying `status` and `kind`
fn api_error_to_js(err: &ApiError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    let status = err
        .status()
        .map(|s| JsValue::from_f64(s as f64))
        .unwrap_or(JsValue::NULL);
    js_sys::Reflect::set(&js_err, &JsValue::from_str("status"), &status).ok();
    js_sys::Reflect::set(
        &js_err,
        &JsValue::from_str("kind"),
        &JsValue::from_str(&format!("{:?}", err.kind())),
    )
    .ok();
    js_err.into()
}

fn to_js(result: Result<Value, ApiError>) -> Result<JsValue, JsValue> {
    let value = result.map_err(|e| api_error_to_js(&e))?;
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn js_payload(data: JsValue) -> Result<Option<Value>, JsValue> {
    if data.is_undefined() {
        return Ok(None);
    }
    Ok(Some(serde_wasm_bindgen::from_value(data)?))
}

/// Promise-returning wrapper around [`ApiClient`]
#[wasm_bindgen(js_name = Api)]
pub struct JsApi {
    client: ApiClient,
}

#[wasm_bindgen(js_class = Api)]
impl JsApi {
    /// Uses the page's configured base URL unless one is given
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> JsApi {
        let base_url = base_url.unwrap_or_else(|| AppContext::current().config().base_url.clone());
        JsApi {
            client: ApiClient::new(base_url),
        }
    }

    #[wasm_bindgen(getter, js_name = baseURL)]
    pub fn base_url(&self) -> String {
        self.client.base_url().to_string()
    }

    pub fn get(&self, path: String) -> js_sys::Promise {
        let client = self.client.clone();
        future_to_promise(async move { to_js(client.get::<Value>(&path).await) })
    }

    pub fn post(&self, path: String, data: JsValue) -> js_sys::Promise {
        let client = self.client.clone();
        future_to_promise(async move {
            let result = match js_payload(data)? {
                Some(payload) => client.post::<Value, _>(&path, &payload).await,
                None => client.post_empty::<Value>(&path).await,
            };
            to_js(result)
        })
    }

    pub fn put(&self, path: String, data: JsValue) -> js_sys::Promise {
        let client = self.client.clone();
        future_to_promise(async move {
            let payload = js_payload(data)?.unwrap_or(Value::Null);
            to_js(client.put::<Value, _>(&path, &payload).await)
        })
    }

    pub fn delete(&self, path: String) -> js_sys::Promise {
        let client = self.client.clone();
        future_to_promise(async move { to_js(client.delete::<Value>(&path).await) })
    }
}

/// Copy a prompt and record the copy. Never rejects.
#[wasm_bindgen(js_name = copyPrompt)]
pub async fn copy_prompt(prompt_id: String, content: String) {
    let ctx = AppContext::current();
    let outcome =
        actions::copy_prompt(ctx.clipboard(), ctx.api(), ctx.toaster(), &prompt_id, &content).await;
    log::debug!("copyPrompt {}: {:?}", prompt_id, outcome);
}

/// Like a prompt and update its counter. Never rejects.
#[wasm_bindgen(js_name = likePrompt)]
pub async fn like_prompt(prompt_id: String) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("likePrompt called without a document");
        return;
    };

    let ctx = AppContext::current();
    let controls = DomLikeControls::for_prompt(&document, ctx.config(), &prompt_id);
    let outcome = actions::like_prompt(ctx.api(), ctx.toaster(), &controls, &prompt_id).await;
    log::debug!("likePrompt {}: {:?}", prompt_id, outcome);
}

/// Install the page handlers, optionally with a config object that
/// replaces the one embedded in the page. Handlers already installed pick up
/// the new config on their next event.
#[wasm_bindgen(js_name = initPage)]
pub fn init_page(config: JsValue) -> Result<(), JsValue> {
    if !config.is_undefined() && !config.is_null() {
        AppContext::install(serde_wasm_bindgen::from_value::<AppConfig>(config)?);
    }
    page::init_page()
}
