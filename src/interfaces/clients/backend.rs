use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, multipart, Client, StatusCode};
use tracing::{debug, error};

use crate::entities::account::{Account, AdRecord};
use crate::entities::submission::{SubmissionAck, SubmissionPayload};
use crate::errors::BackendError;

/// The ads backend the gateway fronts: session lookup, ad listing, ad
/// creation. The session cookie is forwarded opaquely; the backend owns it.
#[async_trait]
pub trait AdBackend: Send + Sync {
    /// Resolve the caller behind `session_cookie`. `Ok(None)` means no live
    /// session, which is not an error.
    async fn fetch_session(&self, session_cookie: &str) -> Result<Option<Account>, BackendError>;

    /// Ads belonging to the calling session's owner.
    async fn fetch_owned_ads(&self, session_cookie: &str) -> Result<Vec<AdRecord>, BackendError>;

    /// Forward one validated submission upstream.
    async fn submit_ad(
        &self,
        payload: &SubmissionPayload,
        session_cookie: &str,
    ) -> Result<SubmissionAck, BackendError>;

    /// Reachability probe for the health endpoint.
    async fn check_connection(&self) -> bool;
}

#[derive(Clone)]
pub struct HttpAdBackend {
    client: Client,
    base_url: String,
}

impl HttpAdBackend {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(HttpAdBackend { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AdBackend for HttpAdBackend {
    async fn fetch_session(&self, session_cookie: &str) -> Result<Option<Account>, BackendError> {
        let response = self
            .client
            .get(self.url("/session"))
            .header(header::COOKIE, session_cookie)
            .send()
            .await
            .map_err(BackendError::from)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            Ok(None)
        } else if status.is_success() {
            response
                .json::<Account>()
                .await
                .map(Some)
                .map_err(|e| BackendError::Schema(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::NonOk { status: status.as_u16(), body })
        }
    }

    async fn fetch_owned_ads(&self, session_cookie: &str) -> Result<Vec<AdRecord>, BackendError> {
        let response = self
            .client
            .get(self.url("/ads/get"))
            .header(header::COOKIE, session_cookie)
            .send()
            .await
            .map_err(BackendError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::NonOk { status, body });
        }

        response
            .json::<Vec<AdRecord>>()
            .await
            .map_err(|e| BackendError::Schema(e.to_string()))
    }

    async fn submit_ad(
        &self,
        payload: &SubmissionPayload,
        session_cookie: &str,
    ) -> Result<SubmissionAck, BackendError> {
        let mut part = multipart::Part::bytes(payload.image.bytes.clone())
            .file_name(payload.file_name.clone());

        if let Some(kind) = infer::get(&payload.image.bytes) {
            part = part
                .mime_str(kind.mime_type())
                .map_err(|e| BackendError::Network(format!("Invalid content type: {e}")))?;
        }

        let form = multipart::Form::new()
            .part("image-upload", part)
            .text("type", payload.slot.as_str())
            .text("level-id", payload.level_id.clone());

        debug!(
            "Uploading {} ({} bytes) for user {}",
            payload.file_name,
            payload.image.bytes.len(),
            payload.owner_id
        );

        let response = self
            .client
            .post(self.url("/ads/submit"))
            .header(header::COOKIE, session_cookie)
            .multipart(form)
            .send()
            .await
            .map_err(BackendError::from)?;

        if response.status().is_success() {
            response
                .json::<SubmissionAck>()
                .await
                .map_err(|e| BackendError::Schema(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Ad submission rejected upstream with {}: {}", status, body);
            Err(BackendError::NonOk { status, body })
        }
    }

    async fn check_connection(&self) -> bool {
        match self.client.get(self.url("/")).send().await {
            Ok(_) => true,
            Err(e) => {
                error!("Ads backend unreachable: {}", e);
                false
            }
        }
    }
}
