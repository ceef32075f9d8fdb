use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error codes the server puts in `error_code`
const ALREADY_LIKED_CODE: &str = "already_liked";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn builder(&self, url: &str) -> RequestBuilder {
        match self {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Delete => Request::delete(url),
        }
    }
}

/// Extra headers and an already-encoded body
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Applied after the default JSON content type, so they win on conflict
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn json<B: Serialize + ?Sized>(data: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(data).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self {
            headers: Vec::new(),
            body: Some(body),
        })
    }
}

/// Machine-readable classification of an [`ApiError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    RateLimited,
    AlreadyLiked,
    NotFound,
    Http,
    Network,
    Decode,
    Encode,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("HTTP {status}: {status_text}")]
    Http {
        status: u16,
        status_text: String,
        /// `detail` from the server's error body
        detail: Option<String>,
        error_code: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to encode request body: {0}")]
    Encode(String),
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
}

impl ApiError {
    /// Build an HTTP error from a non-2xx response, keeping the server's
    /// `detail` and `error_code` when the body carries them
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
        let (detail, error_code) = match parsed {
            Some(resp) => {
                let detail = resp.detail.map(|d| match d {
                    Value::String(s) => s,
                    other => other.to_string(),
                });
                (detail, resp.error_code)
            }
            None => (None, None),
        };

        ApiError::Http {
            status,
            status_text: status_text.to_string(),
            detail,
            error_code,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Http {
                status, error_code, ..
            } => {
                let already_liked = error_code
                    .as_deref()
                    .map(|c| c.eq_ignore_ascii_case(ALREADY_LIKED_CODE))
                    .unwrap_or(false);

                match *status {
                    429 => ApiErrorKind::RateLimited,
                    409 => ApiErrorKind::AlreadyLiked,
                    _ if already_liked => ApiErrorKind::AlreadyLiked,
                    404 => ApiErrorKind::NotFound,
                    _ => ApiErrorKind::Http,
                }
            }
            ApiError::Network(_) => ApiErrorKind::Network,
            ApiError::Decode(_) => ApiErrorKind::Decode,
            ApiError::Encode(_) => ApiErrorKind::Encode,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Decode a success body; an empty body reads as JSON `null`
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// JSON client for the site's own API
#[derive(Clone, Debug, Default)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the JSON response.
    ///
    /// Failures are logged here and still returned; callers decide what the
    /// user sees.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let result = self.send(method, &url, options).await;

        if let Err(e) = &result {
            log::error!("API request failed: {} {}: {}", method.as_str(), url, e);
        }

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let mut builder = method.builder(url).header("Content-Type", "application/json");
        for (key, value) in &options.headers {
            builder = builder.header(key, value);
        }

        let response = match options.body {
            Some(body) => {
                builder
                    .body(body)
                    .map_err(|e| ApiError::Encode(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::from_response(
                response.status(),
                &response.status_text(),
                &text,
            ));
        }

        decode_body(&text)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, RequestOptions::default())
            .await
    }

    pub async fn post<T, B>(&self, path: &str, data: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, path, RequestOptions::json(data)?)
            .await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Post, path, RequestOptions::default())
            .await
    }

    pub async fn put<T, B>(&self, path: &str, data: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, path, RequestOptions::json(data)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Delete, path, RequestOptions::default())
            .await
    }
}

/// Path of the copy counter endpoint for a prompt
pub fn copy_path(prompt_id: &str) -> String {
    format!("/api/prompts/{}/copy", urlencoding::encode(prompt_id))
}

/// Path of the like endpoint for a prompt
pub fn like_path(prompt_id: &str) -> String {
    format!("/api/prompts/{}/like", urlencoding::encode(prompt_id))
}

/// The prompt endpoints the page actions call
#[async_trait(?Send)]
pub trait PromptApi {
    /// Bump the server-side copy counter
    async fn record_copy(&self, prompt_id: &str) -> Result<(), ApiError>;

    async fn like(&self, prompt_id: &str) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
impl PromptApi for ApiClient {
    async fn record_copy(&self, prompt_id: &str) -> Result<(), ApiError> {
        self.post_empty::<Value>(&copy_path(prompt_id)).await.map(|_| ())
    }

    async fn like(&self, prompt_id: &str) -> Result<(), ApiError> {
        self.post_empty::<Value>(&like_path(prompt_id)).await.map(|_| ())
    }
}
