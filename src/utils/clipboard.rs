//! Clipboard utilities for copying text
//!
//! Uses the async Clipboard API in secure contexts and falls back to a
//! hidden textarea plus `document.execCommand("copy")` elsewhere (plain
//! HTTP pages, older browsers).

use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlDocument, HtmlTextAreaElement, Window};

/// Anything that can put text on the clipboard
#[async_trait(?Send)]
pub trait Clipboard {
    /// Returns true when the text reached the clipboard
    async fn copy(&self, text: &str) -> bool;
}

/// The browser clipboard of the current window
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClipboard;

#[async_trait(?Send)]
impl Clipboard for BrowserClipboard {
    async fn copy(&self, text: &str) -> bool {
        copy_to_clipboard(text).await
    }
}

/// Copy text to the system clipboard
///
/// Never fails: errors are logged and reported as `false`.
pub async fn copy_to_clipboard(text: &str) -> bool {
    match try_copy(text).await {
        Ok(copied) => copied,
        Err(e) => {
            log::error!("Copy to clipboard failed: {:?}", e);
            false
        }
    }
}

async fn try_copy(text: &str) -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;

    if has_async_clipboard(&window) {
        let clipboard = window.navigator().clipboard();
        wasm_bindgen_futures::JsFuture::from(clipboard.write_text(text)).await?;
        return Ok(true);
    }

    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    copy_with_exec_command(&document, text)
}

fn has_async_clipboard(window: &Window) -> bool {
    let navigator = window.navigator();
    let has_clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false);
    has_clipboard && window.is_secure_context()
}

/// Legacy path: select an off-screen textarea and run the copy command
fn copy_with_exec_command(document: &Document, text: &str) -> Result<bool, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("No body"))?;

    let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    textarea.set_value(text);
    let style = textarea.style();
    style.set_property("position", "fixed")?;
    style.set_property("left", "-999999px")?;
    style.set_property("top", "-999999px")?;

    body.append_child(&textarea)?;
    // Focus can fail on detached or hidden documents; selection still works
    textarea.focus().ok();
    textarea.select();

    let result = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| JsValue::from_str("Document does not support execCommand"))
        .and_then(|doc| doc.exec_command("copy"));

    // Always remove the textarea, even when the command threw
    textarea.remove();

    result
}
