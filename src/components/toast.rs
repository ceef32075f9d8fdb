//! Toast notifications
//!
//! A toast is a plain `div` pinned to the top right of the viewport. It
//! removes itself after the configured duration unless something else took
//! it out of the document first.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;
use web_sys::{Document, Node};

use crate::config::DEFAULT_TOAST_DURATION_MS;

const BASE_CLASSES: &str = "toast fixed top-4 right-4 z-50 px-4 py-2 rounded-md shadow-lg text-white";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        }
    }

    /// Unknown names fall back to `Info`
    pub fn from_str(s: &str) -> Self {
        match s {
            "success" => ToastKind::Success,
            "error" => ToastKind::Error,
            "warning" => ToastKind::Warning,
            _ => ToastKind::Info,
        }
    }

    /// Background utility class
    pub fn background_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "bg-green-500",
            ToastKind::Error => "bg-red-500",
            ToastKind::Warning => "bg-yellow-500",
            ToastKind::Info => "bg-blue-500",
        }
    }

    /// Full class list for the toast element
    pub fn class_name(&self) -> String {
        format!("{} {}", BASE_CLASSES, self.background_class())
    }
}

/// Shows a message to the user
pub trait Toaster {
    fn show(&self, message: &str, kind: ToastKind);

    fn success(&self, message: &str) {
        self.show(message, ToastKind::Success);
    }

    fn error(&self, message: &str) {
        self.show(message, ToastKind::Error);
    }

    fn warning(&self, message: &str) {
        self.show(message, ToastKind::Warning);
    }
}

/// Toasts rendered into the current document
#[derive(Clone, Debug)]
pub struct DomToaster {
    duration_ms: u32,
}

impl Default for DomToaster {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION_MS)
    }
}

impl DomToaster {
    pub fn new(duration_ms: u32) -> Self {
        Self { duration_ms }
    }

    fn try_show(&self, message: &str, kind: ToastKind) -> Result<(), JsValue> {
        let document: Document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("No body"))?;

        let toast = document.create_element("div")?;
        toast.set_class_name(&kind.class_name());
        toast.set_text_content(Some(message));
        body.append_child(&toast)?;

        Timeout::new(self.duration_ms, move || {
            // Something else may have removed it already
            let node: &Node = &toast;
            if body.contains(Some(node)) {
                if let Err(e) = body.remove_child(&toast) {
                    log::warn!("Failed to remove toast: {:?}", e);
                }
            }
        })
        .forget();

        Ok(())
    }
}

impl Toaster for DomToaster {
    fn show(&self, message: &str, kind: ToastKind) {
        if let Err(e) = self.try_show(message, kind) {
            log::error!("Failed to show {} toast: {:?}", kind.as_str(), e);
        }
    }
}
