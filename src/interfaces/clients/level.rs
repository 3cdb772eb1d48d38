use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::entities::level::{parse_lookup_response, LevelStatus};

/// Lookup of level ids against the external directory.
#[async_trait]
pub trait LevelDirectory: Send + Sync {
    /// One fresh network call per invocation; results are never cached.
    async fn check_level(&self, id: &str) -> LevelStatus;
}

/// Client for the form-encoded level lookup endpoint.
#[derive(Clone)]
pub struct LevelLookupClient {
    client: Client,
    lookup_url: String,
}

impl LevelLookupClient {
    pub fn new(lookup_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(LevelLookupClient { client, lookup_url })
    }
}

#[async_trait]
impl LevelDirectory for LevelLookupClient {
    // Invariant: an unreachable or misbehaving directory never passes a
    // level, so every failure path below resolves to Invalid.
    async fn check_level(&self, id: &str) -> LevelStatus {
        let id = id.trim();
        if id.is_empty() {
            return LevelStatus::Unknown;
        }

        let response = match self
            .client
            .post(&self.lookup_url)
            .form(&[("level-id", id)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Level lookup request failed: {}", e);
                return LevelStatus::Invalid;
            }
        };

        if !response.status().is_success() {
            error!("Level lookup responded {}", response.status());
            return LevelStatus::Invalid;
        }

        match response.text().await {
            Ok(body) => {
                let status = parse_lookup_response(&body);
                debug!("Level {} resolved to {:?}", id, status);
                status
            }
            Err(e) => {
                error!("Failed to read level lookup response: {}", e);
                LevelStatus::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pointing at an unroutable address proves the short-circuit: a blank id
    // must resolve before any request goes out.
    #[actix_rt::test]
    async fn blank_ids_resolve_to_unknown_without_a_request() {
        let client = LevelLookupClient::new("http://127.0.0.1:1".to_string(), 1).unwrap();

        assert_eq!(client.check_level("").await, LevelStatus::Unknown);
        assert_eq!(client.check_level("   ").await, LevelStatus::Unknown);
    }
}
