//! Wire-level checks for ID token verification.

use constitucheck_core::auth::{AuthError, IdentityToolkitVerifier, ServiceAccount};
use constitucheck_core::config::IdentityConfig;
use constitucheck_core::TokenVerifier;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn verifier(server: &MockServer, api_key: Option<&str>) -> IdentityToolkitVerifier {
    let config = IdentityConfig {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
        ..IdentityConfig::default()
    };
    let account =
        ServiceAccount::from_json(r#"{"type": "service_account", "project_id": "constitucheck-dev"}"#)
            .unwrap();
    IdentityToolkitVerifier::new(&config, account).unwrap()
}

#[tokio::test]
async fn lookup_resolves_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .and(query_param("key", "web-key"))
        .and(body_json(json!({
            "idToken": "id-token-123",
            "targetProjectId": "constitucheck-dev"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "identitytoolkit#GetAccountInfoResponse",
            "users": [{ "localId": "uid-42", "email": "counsel@example.com" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = verifier(&server, Some("web-key"))
        .verify("id-token-123")
        .await
        .unwrap();

    assert_eq!(user.uid, "uid-42");
    assert_eq!(user.email.as_deref(), Some("counsel@example.com"));
}

#[tokio::test]
async fn refused_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_ID_TOKEN" }
        })))
        .mount(&server)
        .await;

    let err = verifier(&server, None).verify("expired").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(_)));
}

#[tokio::test]
async fn empty_user_list_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = verifier(&server, None).verify("orphan").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(_)));
}
