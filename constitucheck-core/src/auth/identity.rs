use super::{AuthError, Result, ServiceAccount, TokenVerifier, VerifiedUser};
use crate::config::IdentityConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Verifies ID tokens through the identity toolkit `accounts:lookup` endpoint.
#[derive(Debug, Clone)]
pub struct IdentityToolkitVerifier {
    lookup_url: String,
    api_key: Option<String>,
    project_id: String,
    http_client: reqwest::Client,
}

impl IdentityToolkitVerifier {
    pub fn new(config: &IdentityConfig, account: ServiceAccount) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        info!(project_id = %account.project_id, "Identity verification enabled");

        Ok(Self {
            lookup_url: format!("{}/v1/accounts:lookup", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            project_id: account.project_id,
            http_client,
        })
    }
}

#[async_trait]
impl TokenVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser> {
        let mut request = self.http_client.post(&self.lookup_url).json(&LookupRequest {
            id_token: token,
            target_project_id: &self.project_id,
        });
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Token lookup refused: {}", body);
            return Err(AuthError::Rejected(format!("identity provider returned {}", status)));
        }

        let lookup: LookupResponse = response.json().await?;
        lookup
            .users
            .into_iter()
            .next()
            .map(|user| VerifiedUser {
                uid: user.local_id,
                email: user.email,
            })
            .ok_or_else(|| AuthError::Rejected("no user for token".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
    target_project_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}
