// src/api/mod.rs
//! Service adapter for the triage backend: wire types, the normalized
//! error taxonomy, the service traits the orchestrators depend on, and the
//! reqwest implementation of all three.

mod types;

pub use types::*;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::TriagemConfig;

const USER_AGENT: &str = "Triagem/1.0";
const DEFAULT_CONNECT_TIMEOUT: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Empty/whitespace-only required field, caught before any request.
    #[error("{0}")]
    Validation(String),

    /// The request could not complete at all.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` carries the backend's `detail` when one
    /// was sent.
    #[error("Triagem API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// 2xx response whose body does not decode.
    #[error("Malformed response from triagem API: {0}")]
    Malformed(String),

    /// Well-formed response explicitly denying the operation.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// The two-phase submission contract consumed by the orchestrator.
#[async_trait]
pub trait TriageService: Send + Sync {
    /// Stateless classification of free-text symptoms. No record is created.
    async fn classify(&self, sintomas: &str) -> Result<ClassificationResult, ApiError>;

    /// Commits a classification for specialist review.
    async fn persist(&self, request: &PersistRequest) -> Result<PersistAck, ApiError>;
}

/// The authentication contract consumed by the session bootstrap.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginAck, ApiError>;
}

/// The review-panel contract.
#[async_trait]
pub trait ReviewService: Send + Sync {
    async fn list_triagens(&self, filter: ReviewFilter) -> Result<Vec<TriagemRecord>, ApiError>;

    async fn validate_triagem(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationOutcome, ApiError>;

    async fn delete_triagem(&self, triagem_id: &str) -> Result<(), ApiError>;

    async fn stats(&self) -> Result<TriagemStats, ApiError>;
}

/// HTTP/JSON client for the triage backend.
#[derive(Debug, Clone)]
pub struct TriagemClient {
    http: Client,
    base_url: String,
}

impl TriagemClient {
    pub fn new(config: &TriagemConfig) -> Result<Self, ApiError> {
        Self::build(
            config.api_base_url.clone(),
            config.connect_timeout,
            config.request_timeout,
        )
    }

    /// Client with default timeouts, for embedders and tests that do not go
    /// through the process-wide config.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::build(
            base_url.into(),
            DEFAULT_CONNECT_TIMEOUT,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }

    fn build(base_url: String, connect_timeout: u64, request_timeout: u64) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // FastAPI wraps its error messages in a `detail` field.
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(body);

        Err(ApiError::Api { status, message })
    }
}

#[async_trait]
impl TriageService for TriagemClient {
    async fn classify(&self, sintomas: &str) -> Result<ClassificationResult, ApiError> {
        let response = self
            .http
            .post(self.endpoint("api/processar-triagem"))
            .json(&serde_json::json!({ "sintomas": sintomas }))
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .json::<ClassificationResult>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn persist(&self, request: &PersistRequest) -> Result<PersistAck, ApiError> {
        let response = self
            .http
            .post(self.endpoint("api/triagem"))
            .json(request)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let raw: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        Ok(PersistAck::from_raw(&raw))
    }
}

#[async_trait]
impl AuthService for TriagemClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginAck, ApiError> {
        let response = self
            .http
            .post(self.endpoint("api/login"))
            .json(credentials)
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .json::<LoginAck>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ReviewService for TriagemClient {
    async fn list_triagens(&self, filter: ReviewFilter) -> Result<Vec<TriagemRecord>, ApiError> {
        let response = self
            .http
            .get(self.endpoint("api/triagens"))
            .query(&[("filtro", filter.as_str())])
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .json::<Vec<TriagemRecord>>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn validate_triagem(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationOutcome, ApiError> {
        let response = self
            .http
            .post(self.endpoint("api/validar-triagem"))
            .json(request)
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .json::<ValidationOutcome>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn delete_triagem(&self, triagem_id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("api/triagem/{triagem_id}")))
            .send()
            .await?;
        Self::check(response).await?;

        Ok(())
    }

    async fn stats(&self) -> Result<TriagemStats, ApiError> {
        let response = self.http.get(self.endpoint("api/estatisticas")).send().await?;
        let response = Self::check(response).await?;

        response
            .json::<TriagemStats>()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}
