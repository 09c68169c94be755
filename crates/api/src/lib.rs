//! Workflow API client utilities.
//!
//! This crate provides a lightweight client for the workflow execution
//! backend. It focuses on:
//!
//! - Constructing an HTTP client with a fixed request timeout
//! - Validating the configured base URL
//! - Exposing `get`/`post`/`delete` verbs that return a status plus a typed body
//! - The [`WorkflowApi`] trait, which names every endpoint the dashboard uses
//!
//! # Example
//!
//! ```ignore
//! use flowdash_api::{WorkflowApi, WorkflowClient};
//!
//! async fn list() -> Result<(), flowdash_api::ApiError> {
//!     let client = WorkflowClient::new("http://localhost:8000/api")?;
//!     for run in client.list_runs().await? {
//!         println!("{} {}", run.id, run.status);
//!     }
//!     Ok(())
//! }
//! ```

mod endpoints;

use std::env;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub use endpoints::{WorkflowApi, fetch_run_detail, run_path};

/// Every request fails after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);

/// Schemes accepted for the API base URL.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Errors surfaced by [`WorkflowClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{base}': {reason}")]
    InvalidBaseUrl { base: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Status code plus decoded body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Thin wrapper around a configured `reqwest::Client` for the workflow API.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl WorkflowClient {
    /// Build a client for `base_url` (for example `http://localhost:8000/api`).
    ///
    /// A trailing slash is trimmed so endpoint paths can always start with `/`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("flowdash/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API-relative path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        let (status, text) = self.send(Method::GET, path, self.request(Method::GET, path)).await?;
        Ok(ApiResponse {
            status,
            data: self.decode(path, &text)?,
        })
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let (status, text) = self.send(Method::POST, path, builder).await?;
        Ok(ApiResponse {
            status,
            data: self.decode(path, &text)?,
        })
    }

    /// Issue a DELETE; the response body is read but not decoded.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse<()>, ApiError> {
        let (status, _) = self.send(Method::DELETE, path, self.request(Method::DELETE, path)).await?;
        Ok(ApiResponse { status, data: () })
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<(u16, String), ApiError> {
        let url = self.url(path);
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;
        debug!(%method, %url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                url,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok((status.as_u16(), text))
    }

    fn decode<T: DeserializeOwned>(&self, path: &str, text: &str) -> Result<T, ApiError> {
        serde_json::from_str(text).map_err(|source| ApiError::Decode { url: self.url(path), source })
    }
}

/// Validate and normalize a base URL.
///
/// Rules:
/// - must parse as an absolute URL with a host
/// - scheme must be `http` or `https`
/// - a trailing `/` is removed
fn validate_base_url(base: &str) -> Result<String, ApiError> {
    let trimmed = base.trim();
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        base: trimmed.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|error| invalid(error.to_string()))?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(invalid(format!("scheme must be http or https; got '{}://'", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("must include a host".to_string()));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_and_paths_join() {
        let client = WorkflowClient::new("http://localhost:8000/api/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/workflow"), "http://localhost:8000/api/workflow");
        assert_eq!(client.url("run"), "http://localhost:8000/api/run");
    }

    #[test]
    fn rejects_non_http_schemes_and_garbage() {
        assert!(matches!(
            validate_base_url("ftp://example.com"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(validate_base_url("not a url"), Err(ApiError::InvalidBaseUrl { .. })));
        assert!(validate_base_url("https://dash.example.com").is_ok());
    }

    #[test]
    fn status_accessor_only_reports_http_failures() {
        let error = ApiError::Status {
            method: Method::GET,
            url: "http://localhost/workflow/x".into(),
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("HTTP 404"));
    }
}
