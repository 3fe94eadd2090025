//! Transactions API client
//!
//! `TransactionsApi` is the seam between the screen and the server. The
//! HTTP implementation talks JSON to the backend; tests use an in-memory fake.

use crate::types::{Transaction, TransactionId, UserId};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client as HttpClient, ClientBuilder};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Longest response body kept inside an error message
const MAX_ERROR_BODY: usize = 200;

/// Failure of a call to the transactions API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("HTTP error ({code}): {body}")]
    Status { code: u16, body: String },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Background worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    /// Map a non-success HTTP status and its body to an error
    pub fn from_status(code: u16, body: &str) -> Self {
        let body = truncate_body(body);
        match code {
            404 => ApiError::NotFound(body),
            _ => ApiError::Status { code, body },
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > MAX_ERROR_BODY {
        let cut: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Server operations the transactions screen depends on
pub trait TransactionsApi: Send + Sync {
    /// List every transaction of a user, in server order
    fn fetch_transactions(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Transaction>, ApiError>> + Send;

    /// Ask the server to refund one transaction
    fn refund_transaction(
        &self,
        user_id: &UserId,
        transaction_id: TransactionId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// JSON-over-HTTP client for the transactions backend
#[derive(Clone)]
pub struct HttpTransactionsApi {
    http_client: HttpClient,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpTransactionsApi {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        Self::with_builder(HttpClient::builder().timeout(timeout), base_url, api_token)
    }

    fn with_builder(
        builder: ClientBuilder,
        base_url: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self, ApiError> {
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim().trim_end_matches('/'))
            .map_err(|e| ApiError::Request(format!("Invalid API URL '{}': {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Request(format!("Invalid API URL '{}': cannot be a base", raw)));
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            base_url,
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Build a client from the runtime configuration
    pub fn from_config(config: &crate::config::Config) -> Result<Self, ApiError> {
        Self::new(
            config.api_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL with `segments` appended, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `with_builder`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn transactions_url(&self, user_id: &UserId) -> Url {
        self.endpoint(&["users", user_id.as_str(), "transactions"])
    }

    pub(crate) fn refund_url(&self, user_id: &UserId, transaction_id: TransactionId) -> Url {
        let id = transaction_id.to_string();
        self.endpoint(&["users", user_id.as_str(), "transactions", id.as_str(), "refund"])
    }

    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.api_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Request(format!("Failed to create auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }
        Ok(headers)
    }

    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        warn!("Transactions API returned {}: {}", code, body);
        ApiError::from_status(code, &body)
    }
}

impl TransactionsApi for HttpTransactionsApi {
    async fn fetch_transactions(&self, user_id: &UserId) -> Result<Vec<Transaction>, ApiError> {
        let url = self.transactions_url(user_id);
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .headers(self.create_headers()?)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await.map_err(ApiError::from_reqwest)?;
        serde_json::from_str::<Vec<Transaction>>(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn refund_transaction(&self, user_id: &UserId, transaction_id: TransactionId) -> Result<(), ApiError> {
        let url = self.refund_url(user_id, transaction_id);
        debug!("POST {}", url);
        let response = self
            .http_client
            .post(url)
            .headers(self.create_headers()?)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}
