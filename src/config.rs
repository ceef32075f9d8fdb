//! Page configuration
//!
//! Pages can override the defaults by embedding a JSON block:
//!
//! ```html
//! <script id="app-config" type="application/json">{"base_url": "/v1"}</script>
//! ```

use serde::{Deserialize, Serialize};

/// Id of the `<script>` element holding the JSON configuration
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Default toast lifetime in milliseconds
pub const DEFAULT_TOAST_DURATION_MS: u32 = 3000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix prepended to every API path
    pub base_url: String,
    pub toast_duration_ms: u32,
    /// Element focused by Ctrl/Cmd+K
    pub search_input_id: String,
    pub like_count_prefix: String,
    pub like_button_prefix: String,
    /// Class added to a like control once the like went through
    pub liked_class: String,
    /// Locale used for absolute dates
    pub locale: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            search_input_id: "search-input".to_string(),
            like_count_prefix: "like-count-".to_string(),
            like_button_prefix: "like-button-".to_string(),
            liked_class: "liked".to_string(),
            locale: "zh-CN".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config block, falling back to defaults when it is malformed
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<AppConfig>(raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed page config: {}", e);
                Self::default()
            }
        }
    }

    /// Read the config block from the current document, if there is one
    pub fn from_page() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Self::default(),
        }
    }

    /// Id of the like counter for a prompt
    pub fn like_count_id(&self, prompt_id: &str) -> String {
        format!("{}{}", self.like_count_prefix, prompt_id)
    }

    /// Id of the like control for a prompt
    pub fn like_button_id(&self, prompt_id: &str) -> String {
        format!("{}{}", self.like_button_prefix, prompt_id)
    }

    pub fn log_level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" | "warning" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}
