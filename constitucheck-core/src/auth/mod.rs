//! Bearer token verification.
//!
//! Protected routes expect `Authorization: Bearer <token>`. Checking the token
//! is delegated to a [`TokenVerifier`]; the gateway never inspects tokens
//! itself.

mod identity;
mod service_account;

pub use identity::IdentityToolkitVerifier;
pub use service_account::ServiceAccount;

use crate::config::IdentityConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token rejected: {0}")]
    Rejected(String),

    #[error("Invalid service account credential: {0}")]
    ServiceAccount(#[from] serde_json::Error),

    #[error("Identity request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Identity attached to a request after its token was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Verifies bearer tokens against an identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedUser>;
}

/// Extracts the token from an `Authorization` header value.
///
/// The value must be exactly `Bearer ` followed by a non-empty token.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Accepts a fixed set of tokens. Intended for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, uid: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), uid.into());
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser> {
        self.tokens
            .get(token)
            .map(|uid| VerifiedUser {
                uid: uid.clone(),
                email: None,
            })
            .ok_or_else(|| AuthError::Rejected("unknown token".to_string()))
    }
}

/// Builds the verifier described by the identity configuration.
///
/// A service-account credential enables the identity provider lookup and
/// takes precedence; static tokens are then ignored. Static tokens are only
/// used when no credential is set. Without either, `None` is returned and
/// every protected request is refused.
pub fn verifier_from_config(config: &IdentityConfig) -> Option<Arc<dyn TokenVerifier>> {
    let Some(raw) = config.service_account_json.as_deref() else {
        if !config.static_tokens.is_empty() {
            warn!(
                tokens = config.static_tokens.len(),
                "Static bearer tokens active, do not use outside local development"
            );
            let verifier = config
                .static_tokens
                .iter()
                .fold(StaticTokenVerifier::new(), |v, entry| {
                    v.with_token(&entry.token, &entry.uid)
                });
            return Some(Arc::new(verifier));
        }

        warn!("FIREBASE_SERVICE_ACCOUNT_JSON not set, auth verification will fail for protected endpoints");
        return None;
    };

    if !config.static_tokens.is_empty() {
        warn!(
            tokens = config.static_tokens.len(),
            "Ignoring static bearer tokens because a service account is configured"
        );
    }

    let account = match ServiceAccount::from_json(raw) {
        Ok(account) => account,
        Err(e) => {
            error!("Invalid FIREBASE_SERVICE_ACCOUNT_JSON: {}", e);
            return None;
        }
    };

    match IdentityToolkitVerifier::new(config, account) {
        Ok(verifier) => Some(Arc::new(verifier)),
        Err(e) => {
            error!("Failed to build identity verifier: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticToken;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Bearer a b")), Some("a b"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticTokenVerifier::new().with_token("t1", "user-1");

        let user = verifier.verify("t1").await.unwrap();
        assert_eq!(user.uid, "user-1");
        assert!(matches!(
            verifier.verify("t2").await,
            Err(AuthError::Rejected(_))
        ));
    }

    #[test]
    fn test_verifier_from_config_without_credentials() {
        assert!(verifier_from_config(&IdentityConfig::default()).is_none());

        let config = IdentityConfig {
            service_account_json: Some("not json".to_string()),
            ..IdentityConfig::default()
        };
        assert!(verifier_from_config(&config).is_none());
    }

    #[tokio::test]
    async fn test_verifier_from_config_static_tokens() {
        let config = IdentityConfig {
            static_tokens: vec![StaticToken {
                token: "dev".to_string(),
                uid: "dev-user".to_string(),
            }],
            ..IdentityConfig::default()
        };

        let verifier = verifier_from_config(&config).unwrap();
        assert_eq!(verifier.verify("dev").await.unwrap().uid, "dev-user");
    }

    #[test]
    fn test_verifier_from_config_service_account() {
        let config = IdentityConfig {
            service_account_json: Some(
                r#"{"type":"service_account","project_id":"constitucheck","client_email":"svc@constitucheck.iam.gserviceaccount.com"}"#
                    .to_string(),
            ),
            ..IdentityConfig::default()
        };
        assert!(verifier_from_config(&config).is_some());
    }

    #[tokio::test]
    async fn test_service_account_overrides_static_tokens() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let config = IdentityConfig {
            service_account_json: Some(r#"{"project_id":"constitucheck"}"#.to_string()),
            base_url: server.uri(),
            static_tokens: vec![StaticToken {
                token: "dev".to_string(),
                uid: "dev-user".to_string(),
            }],
            ..IdentityConfig::default()
        };

        let verifier = verifier_from_config(&config).unwrap();
        assert!(matches!(
            verifier.verify("dev").await,
            Err(AuthError::Rejected(_))
        ));
    }
}
