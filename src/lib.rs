//! Browser-side glue for the prompt sharing platform
//!
//! Toasts, clipboard copy, debounce/throttle, relative dates, templating, a
//! JSON API client and the copy/like page actions, exported to the page as
//! an ES module through `wasm-bindgen`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Modules
pub mod actions;
pub mod bindings;
pub mod components;
pub mod config;
pub mod context;
pub mod page;
pub mod services;
pub mod utils;

fn init_page() {
    if let Err(e) = page::init_page() {
        log::error!("Failed to initialize page: {:?}", e);
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        // Must not build the shared context before the config block is parsed
        let level = config::AppConfig::from_page().log_level();
        wasm_logger::init(wasm_logger::Config::new(level));
    }

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document, skipping page setup");
        return;
    };

    // Module scripts usually run after parsing, but a classic script tag can
    // still load us while the document is being parsed
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(init_page);
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        {
            log::error!("Failed to wait for DOMContentLoaded: {:?}", e);
        }
    } else {
        init_page();
    }
}
