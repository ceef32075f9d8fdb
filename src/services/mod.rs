pub mod api;

pub use api::{ApiClient, ApiError, ApiErrorKind, PromptApi};
