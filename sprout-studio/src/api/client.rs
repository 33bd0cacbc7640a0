//! HTTP client for the caregiver backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use sprout_common::config::ApiConfig;
use sprout_common::model::ChildSnapshot;
use sprout_common::{ChildId, MilestoneId};

use crate::capture::Artifact;
use crate::error::{ApiError, UploadError};
use crate::upload::{EvidencePayload, EvidenceTransport};

const USER_AGENT: &str = concat!("sprout/", env!("CARGO_PKG_VERSION"));

/// Explicit connection context: where to talk and as whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    pub base_url: String,
    pub token: Option<String>,
    /// Applied to snapshot fetches and review overrides. Uploads run
    /// unbounded; only cancellation stops them.
    pub timeout: Duration,
}

impl ApiContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join a path onto the base URL with exactly one slash between them
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl From<&ApiConfig> for ApiContext {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Caregiver backend client
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    context: ApiContext,
}

impl BackendClient {
    pub fn new(context: ApiContext) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &context.token {
            let mut value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|e| ApiError::Client(format!("invalid auth token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            context,
        })
    }

    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    /// `GET caregiver/child/{id}/`
    ///
    /// 404 is `NotFound`; any other failure, including non-success statuses,
    /// is `FetchFailed`.
    pub async fn fetch_snapshot(&self, child_id: ChildId) -> Result<ChildSnapshot, ApiError> {
        let url = self.context.url(&format!("caregiver/child/{}/", child_id));
        tracing::debug!(child_id = %child_id, url = %url, "Fetching child snapshot");

        let response = self
            .http_client
            .get(&url)
            .timeout(self.context.timeout)
            .send()
            .await
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("child {}", child_id)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::FetchFailed(format!("{}: {}", status, body)));
        }

        let snapshot: ChildSnapshot = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::debug!(
            child_id = %child_id,
            milestones = snapshot.milestones.len(),
            pending_actions = snapshot.pending_actions.len(),
            timeline = snapshot.timeline.len(),
            "Child snapshot received"
        );
        Ok(snapshot)
    }

    /// `POST clinical/milestones/{id}/upload_evidence/` with multipart field `file`
    pub async fn upload_evidence(
        &self,
        milestone_id: MilestoneId,
        artifact: &Artifact,
    ) -> Result<(), UploadError> {
        let url = self
            .context
            .url(&format!("clinical/milestones/{}/upload_evidence/", milestone_id));
        let payload = EvidencePayload::new(milestone_id, artifact);

        tracing::debug!(
            milestone_id = %milestone_id,
            url = %url,
            file_name = %payload.file_name,
            content_type = %payload.content_type,
            bytes = payload.bytes.len(),
            "Posting evidence"
        );

        let form = Form::new().part("file", evidence_part(payload)?);
        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// `POST clinical/milestones/{id}/perform_human_review/`
    ///
    /// Administrative override; the backend decides whether it applies.
    pub async fn force_human_review(&self, milestone_id: MilestoneId) -> Result<(), ApiError> {
        let url = self
            .context
            .url(&format!("clinical/milestones/{}/perform_human_review/", milestone_id));
        tracing::debug!(milestone_id = %milestone_id, url = %url, "Requesting human review override");

        let response = self
            .http_client
            .post(&url)
            .timeout(self.context.timeout)
            .send()
            .await
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("milestone {}", milestone_id)));
        }
        error_for_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl EvidenceTransport for BackendClient {
    async fn upload(&self, milestone_id: MilestoneId, artifact: &Artifact) -> Result<(), UploadError> {
        self.upload_evidence(milestone_id, artifact).await
    }
}

fn evidence_part(payload: EvidencePayload) -> Result<Part, UploadError> {
    let essence = payload.essence().to_string();
    let part = Part::bytes(payload.bytes.clone())
        .file_name(payload.file_name.clone())
        .mime_str(&payload.content_type);

    match part {
        Ok(part) => Ok(part),
        // Parameters such as `codecs=vp8,opus` do not always parse; the bare type does
        Err(_) => Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&essence)
            .map_err(|e| UploadError::InvalidPayload(e.to_string())),
    }
}

async fn error_for_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Http {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_with_single_slash() {
        let context = ApiContext::new("http://localhost:8000/api/");
        assert_eq!(
            context.url("/caregiver/child/1/"),
            "http://localhost:8000/api/caregiver/child/1/"
        );
        let context = ApiContext::new("http://localhost:8000/api");
        assert_eq!(context.url("clinical/x/"), "http://localhost:8000/api/clinical/x/");
    }

    #[test]
    fn test_context_from_config_drops_blank_token() {
        let config = ApiConfig {
            base_url: "https://example.test/api".to_string(),
            token: Some("  ".to_string()),
            timeout_secs: 5,
        };
        let context = ApiContext::from(&config);
        assert_eq!(context.token, None);
        assert_eq!(context.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_token_is_client_error() {
        let context = ApiContext::new("http://localhost").with_token("bad\ntoken");
        assert!(matches!(BackendClient::new(context), Err(ApiError::Client(_))));
    }
}
