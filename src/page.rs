//! One-time page setup
//!
//! - Ctrl/Cmd+K focuses the search input
//! - `#fragment` links scroll smoothly instead of jumping
//! - links to other hosts open in a new tab with `noopener noreferrer`

use std::cell::{Cell, RefCell};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlAnchorElement, HtmlElement, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions,
};

use crate::context::AppContext;

thread_local! {
    static INSTALLED: Cell<bool> = Cell::new(false);
    // Listeners stay registered for the lifetime of the page
    static PAGE_LISTENERS: RefCell<Vec<Closure<dyn FnMut(Event)>>> = RefCell::new(Vec::new());
}

const SHORTCUT_KEY: &str = "k";

/// Ctrl+K or Cmd+K
pub fn is_search_shortcut(key: &str, ctrl: bool, meta: bool) -> bool {
    (ctrl || meta) && key == SHORTCUT_KEY
}

/// Element id a `#fragment` href points at
pub fn anchor_fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Whether an absolute href leaves the current host
pub fn is_external_link(href: &str, page_host: &str) -> bool {
    match url::Url::parse(href) {
        Ok(url) => url
            .host_str()
            .map(|host| !host.eq_ignore_ascii_case(page_host))
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Id of the search input under the current config
fn search_input_id() -> String {
    AppContext::current().config().search_input_id.clone()
}

/// Install the page handlers. Later calls are no-ops; the handlers read the
/// shared config when they fire.
pub fn init_page() -> Result<(), JsValue> {
    if INSTALLED.with(|installed| installed.replace(true)) {
        log::debug!("Page handlers already installed");
        return Ok(());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;

    install_search_shortcut(&document)?;
    let anchors = install_smooth_scroll(&document)?;
    let page_host = window.location().hostname()?;
    let external = mark_external_links(&document, &page_host)?;

    log::debug!(
        "Page handlers installed: {} anchors, {} external links",
        anchors,
        external
    );
    log::info!("Prompt share platform v{} loaded", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn keep_listener(listener: Closure<dyn FnMut(Event)>) {
    PAGE_LISTENERS.with(|listeners| listeners.borrow_mut().push(listener));
}

fn elements(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn install_search_shortcut(document: &Document) -> Result<(), JsValue> {
    let doc = document.clone();

    let listener = Closure::wrap(Box::new(move |event: Event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if !is_search_shortcut(&key_event.key(), key_event.ctrl_key(), key_event.meta_key()) {
            return;
        }

        event.prevent_default();
        if let Some(input) = doc
            .get_element_by_id(&search_input_id())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            if let Err(e) = input.focus() {
                log::warn!("Failed to focus search input: {:?}", e);
            }
        }
    }) as Box<dyn FnMut(Event)>);

    document.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())?;
    keep_listener(listener);
    Ok(())
}

fn install_smooth_scroll(document: &Document) -> Result<usize, JsValue> {
    let anchors = elements(document, "a[href^=\"#\"]")?;
    if anchors.is_empty() {
        return Ok(0);
    }

    let doc = document.clone();
    let listener = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();

        let href = event
            .current_target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|anchor| anchor.get_attribute("href"));
        let Some(target) = href
            .as_deref()
            .and_then(anchor_fragment)
            .and_then(|id| doc.get_element_by_id(id))
        else {
            return;
        };

        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }) as Box<dyn FnMut(Event)>);

    // One listener is shared by every anchor
    for anchor in &anchors {
        anchor.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
    }
    keep_listener(listener);
    Ok(anchors.len())
}

fn mark_external_links(document: &Document, page_host: &str) -> Result<usize, JsValue> {
    let mut marked = 0;
    for link in elements(document, "a[href^=\"http\"]")? {
        let Some(href) = link.get_attribute("href") else {
            continue;
        };
        if !is_external_link(&href, page_host) {
            continue;
        }
        if let Some(anchor) = link.dyn_ref::<HtmlAnchorElement>() {
            anchor.set_target("_blank");
            anchor.set_rel("noopener noreferrer");
            marked += 1;
        }
    }
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_search_shortcut() {
        assert!(is_search_shortcut("k", true, false));
        assert!(is_search_shortcut("k", false, true));
        assert!(!is_search_shortcut("k", false, false));
        assert!(!is_search_shortcut("j", true, false));
    }

    #[test]
    fn test_search_input_follows_installed_config() {
        AppContext::install(AppConfig {
            search_input_id: "q".to_string(),
            ..Default::default()
        });
        assert_eq!(search_input_id(), "q");

        AppContext::install(AppConfig::default());
        assert_eq!(search_input_id(), "search-input");
    }

    #[test]
    fn test_anchor_fragment() {
        assert_eq!(anchor_fragment("#usage"), Some("usage"));
        assert_eq!(anchor_fragment("#"), None);
        assert_eq!(anchor_fragment("/page#x"), None);
    }

    #[test]
    fn test_external_links() {
        assert!(is_external_link("https://other.com/x", "prompts.test"));
        assert!(is_external_link("http://sub.prompts.test/", "prompts.test"));
        assert!(!is_external_link("https://prompts.test/about", "prompts.test"));
        assert!(!is_external_link("https://PROMPTS.test/about", "prompts.test"));
        assert!(!is_external_link("http//broken", "prompts.test"));
    }
}
