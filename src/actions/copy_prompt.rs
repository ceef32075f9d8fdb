use crate::components::toast::Toaster;
use crate::services::api::PromptApi;
use crate::utils::clipboard::Clipboard;

pub const COPIED_MESSAGE: &str = "Copied to clipboard!";
pub const COPY_MANUALLY_MESSAGE: &str = "Copy failed, please select the text and copy it manually";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text is on the clipboard; `recorded` says whether the copy counter
    /// request went through
    Copied { recorded: bool },
    /// Clipboard refused the text
    Failed,
}

/// Copy a prompt's content and bump its copy counter.
///
/// The counter request only happens after a successful copy and its failure
/// never reaches the user. The toast is shown once that request settled.
pub async fn copy_prompt<C, A, T>(
    clipboard: &C,
    api: &A,
    toaster: &T,
    prompt_id: &str,
    content: &str,
) -> CopyOutcome
where
    C: Clipboard + ?Sized,
    A: PromptApi + ?Sized,
    T: Toaster + ?Sized,
{
    if !clipboard.copy(content).await {
        toaster.error(COPY_MANUALLY_MESSAGE);
        return CopyOutcome::Failed;
    }

    let recorded = match api.record_copy(prompt_id).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to record copy of prompt {}: {}", prompt_id, e);
            false
        }
    };

    toaster.success(COPIED_MESSAGE);
    CopyOutcome::Copied { recorded }
}
