use web_sys::{Document, Element};

use crate::components::toast::Toaster;
use crate::config::AppConfig;
use crate::services::api::{ApiErrorKind, PromptApi};

pub const LIKED_MESSAGE: &str = "Liked!";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later";
pub const ALREADY_LIKED_MESSAGE: &str = "You have already liked this prompt";
pub const LIKE_FAILED_MESSAGE: &str = "Like failed";

/// The on-page like counter and like control of one prompt
pub trait LikeControls {
    /// Current counter text, `None` when there is no counter
    fn count_text(&self) -> Option<String>;
    fn set_count(&self, count: i64);
    /// Mark the control as liked and stop further submissions
    fn mark_liked(&self);
}

/// Like controls looked up by the `like-count-{id}` / `like-button-{id}` ids
pub struct DomLikeControls {
    count: Option<Element>,
    button: Option<Element>,
    liked_class: String,
}

impl DomLikeControls {
    pub fn for_prompt(document: &Document, config: &AppConfig, prompt_id: &str) -> Self {
        Self {
            count: document.get_element_by_id(&config.like_count_id(prompt_id)),
            button: document.get_element_by_id(&config.like_button_id(prompt_id)),
            liked_class: config.liked_class.clone(),
        }
    }
}

impl LikeControls for DomLikeControls {
    fn count_text(&self) -> Option<String> {
        self.count.as_ref().and_then(|el| el.text_content())
    }

    fn set_count(&self, count: i64) {
        if let Some(el) = &self.count {
            el.set_text_content(Some(&count.to_string()));
        }
    }

    fn mark_liked(&self) {
        if let Some(button) = &self.button {
            if let Err(e) = button.class_list().add_1(&self.liked_class) {
                log::warn!("Failed to mark like button: {:?}", e);
            }
            if let Err(e) = button.set_attribute("disabled", "") {
                log::warn!("Failed to disable like button: {:?}", e);
            }
        }
    }
}

/// Lenient integer read of a counter: leading sign and digits, else 0
pub fn parse_count(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LikeOutcome {
    /// Like accepted; `count` is the value written to the page
    Liked { count: i64 },
    RateLimited,
    AlreadyLiked,
    Failed,
}

/// Like a prompt and update its counter in place.
///
/// The new count is the page's current value plus one; the server's count
/// is not read back.
pub async fn like_prompt<A, T, V>(api: &A, toaster: &T, controls: &V, prompt_id: &str) -> LikeOutcome
where
    A: PromptApi + ?Sized,
    T: Toaster + ?Sized,
    V: LikeControls + ?Sized,
{
    match api.like(prompt_id).await {
        Ok(()) => {
            toaster.success(LIKED_MESSAGE);

            let count = parse_count(controls.count_text().as_deref().unwrap_or("")).saturating_add(1);
            controls.set_count(count);
            controls.mark_liked();

            log::info!("Liked prompt {}", prompt_id);
            LikeOutcome::Liked { count }
        }
        Err(e) => match e.kind() {
            ApiErrorKind::RateLimited => {
                toaster.warning(RATE_LIMITED_MESSAGE);
                LikeOutcome::RateLimited
            }
            ApiErrorKind::AlreadyLiked => {
                toaster.warning(ALREADY_LIKED_MESSAGE);
                LikeOutcome::AlreadyLiked
            }
            _ => {
                toaster.error(LIKE_FAILED_MESSAGE);
                LikeOutcome::Failed
            }
        },
    }
}
