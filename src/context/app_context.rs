/// Application Context
///
/// Owns the services the page actions need: configuration, the API client,
/// the toaster and the clipboard. One instance is built per page from the
/// page config and shared through a thread-local, so every export sees the
/// same `base_url` and toast duration.
///
/// # Example
/// ```ignore
/// let ctx = AppContext::current();
/// copy_prompt(ctx.clipboard(), ctx.api(), ctx.toaster(), "42", "text").await;
/// ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::components::toast::DomToaster;
use crate::config::AppConfig;
use crate::services::api::ApiClient;
use crate::utils::clipboard::BrowserClipboard;

thread_local! {
    static APP_CONTEXT: RefCell<Option<Rc<AppContext>>> = RefCell::new(None);
}

pub struct AppContext {
    config: AppConfig,
    api: ApiClient,
    toaster: DomToaster,
    clipboard: BrowserClipboard,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            api: ApiClient::new(config.base_url.clone()),
            toaster: DomToaster::new(config.toast_duration_ms),
            clipboard: BrowserClipboard,
            config,
        }
    }

    /// The shared context, built from the page config on first use.
    ///
    /// Nothing should call this before the config block is parsed, or the
    /// defaults stick for the rest of the page.
    pub fn current() -> Rc<AppContext> {
        Self::current_or_else(AppConfig::from_page)
    }

    fn current_or_else(load: impl FnOnce() -> AppConfig) -> Rc<AppContext> {
        APP_CONTEXT.with(|slot| {
            slot.borrow_mut()
                .get_or_insert_with(|| Rc::new(AppContext::new(load())))
                .clone()
        })
    }

    /// Replace the shared context, e.g. with a config passed in from JS
    pub fn install(config: AppConfig) -> Rc<AppContext> {
        let ctx = Rc::new(AppContext::new(config));
        APP_CONTEXT.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&ctx)));
        ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn toaster(&self) -> &DomToaster {
        &self.toaster
    }

    pub fn clipboard(&self) -> &BrowserClipboard {
        &self.clipboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_uses_config() {
        let config = AppConfig {
            base_url: "https://prompts.test".to_string(),
            ..Default::default()
        };
        let ctx = AppContext::new(config);
        assert_eq!(ctx.api().base_url(), "https://prompts.test");
        assert_eq!(ctx.config().toast_duration_ms, 3000);
    }

    #[test]
    fn test_context_is_built_on_first_use() {
        let ctx = AppContext::current_or_else(|| AppConfig {
            base_url: "/late".to_string(),
            ..Default::default()
        });
        assert_eq!(ctx.api().base_url(), "/late");

        let ctx = AppContext::current_or_else(AppConfig::default);
        assert_eq!(ctx.api().base_url(), "/late");
    }

    #[test]
    fn test_install_replaces_current() {
        let config = AppConfig {
            base_url: "/v2".to_string(),
            ..Default::default()
        };
        AppContext::install(config);
        assert_eq!(AppContext::current().api().base_url(), "/v2");
    }
}
