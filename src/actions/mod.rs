//! Page actions bound to the prompt cards

pub mod copy_prompt;
pub mod like_prompt;

pub use copy_prompt::{copy_prompt, CopyOutcome};
pub use like_prompt::{like_prompt, parse_count, DomLikeControls, LikeControls, LikeOutcome};

/// In-memory fakes shared by the action tests
#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::cell::RefCell;

    use crate::components::toast::{ToastKind, Toaster};
    use crate::services::api::{ApiError, PromptApi};
    use crate::utils::clipboard::Clipboard;

    #[derive(Default)]
    pub struct RecordingToaster {
        pub shown: RefCell<Vec<(String, ToastKind)>>,
    }

    impl Toaster for RecordingToaster {
        fn show(&self, message: &str, kind: ToastKind) {
            self.shown.borrow_mut().push((message.to_string(), kind));
        }
    }

    impl RecordingToaster {
        pub fn only(&self) -> (String, ToastKind) {
            let shown = self.shown.borrow();
            assert_eq!(shown.len(), 1, "expected exactly one toast, got {:?}", *shown);
            shown[0].clone()
        }
    }

    pub struct FakeClipboard {
        pub succeeds: bool,
        pub copied: RefCell<Vec<String>>,
    }

    impl FakeClipboard {
        pub fn new(succeeds: bool) -> Self {
            Self {
                succeeds,
                copied: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Clipboard for FakeClipboard {
        async fn copy(&self, text: &str) -> bool {
            if self.succeeds {
                self.copied.borrow_mut().push(text.to_string());
            }
            self.succeeds
        }
    }

    /// Scripted API: each endpoint answers with the configured result
    #[derive(Default)]
    pub struct FakeApi {
        pub copy_result: Option<ApiError>,
        pub like_result: Option<ApiError>,
        pub calls: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl PromptApi for FakeApi {
        async fn record_copy(&self, prompt_id: &str) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("copy:{}", prompt_id));
            match &self.copy_result {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn like(&self, prompt_id: &str) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("like:{}", prompt_id));
            match &self.like_result {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }
}
