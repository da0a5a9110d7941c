//! HTTP identity provider tests.
//!
//! The identity service is simulated with wiremock; the tests check the
//! request shape and how each kind of answer affects the session.

#![cfg(feature = "http")]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use serde_json::json;
use storefront_auth::{
    AuthError, HttpIdentityProvider, IdentityClaims, IdentityEndpoint, IdentityProvider,
    MemoryStore, SessionManager,
};
use storefront_rbac::Role;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential(user_id: &str, role: &str) -> String {
    let claims = IdentityClaims::new(user_id, Duration::hours(1)).with_role(role);
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    format!("{}.{}.sig", header, payload)
}

fn provider_for(server: &MockServer) -> HttpIdentityProvider {
    let endpoint = IdentityEndpoint {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    HttpIdentityProvider::new(endpoint).unwrap()
}

#[tokio::test]
async fn fetch_profile_sends_bearer_token() {
    let server = MockServer::start().await;
    let token = credential("42", "USER");

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "ADMIN"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = provider_for(&server).fetch_profile("42", &token).await.unwrap();

    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert_eq!(profile.session_role(), Role::Admin);
}

#[tokio::test]
async fn refresh_promotes_session_role() {
    let server = MockServer::start().await;
    let token = credential("42", "USER");

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42",
            "name": "Ada",
            "role": "ADMIN"
        })))
        .mount(&server)
        .await;

    let mut manager = SessionManager::load_default(MemoryStore::with_entry("token", token));
    assert_eq!(manager.current_role(), Role::User);

    let role = manager.refresh_identity(&provider_for(&server)).await.unwrap();
    assert_eq!(role, Role::Admin);
    assert_eq!(manager.current_role(), Role::Admin);
}

#[tokio::test]
async fn unauthorized_logs_the_session_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut manager =
        SessionManager::load_default(MemoryStore::with_entry("token", credential("42", "ADMIN")));

    let err = manager.refresh_identity(&provider_for(&server)).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized(_)));
    assert_eq!(manager.current_role(), Role::Guest);
    assert!(!manager.is_authenticated());
}

#[tokio::test]
async fn server_errors_keep_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let mut manager =
        SessionManager::load_default(MemoryStore::with_entry("token", credential("42", "ADMIN")));

    let err = manager.refresh_identity(&provider_for(&server)).await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityUnavailable(ref msg) if msg.contains("503")));
    assert_eq!(manager.current_role(), Role::Admin);
}

#[tokio::test]
async fn not_found_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_profile("42", "t.o.k").await;
    assert!(matches!(result, Err(AuthError::IdentityUnavailable(_))));
}

#[tokio::test]
async fn invalid_body_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_profile("42", "t.o.k").await;
    assert!(matches!(result, Err(AuthError::IdentityUnavailable(_))));
}

#[tokio::test]
async fn user_id_stays_one_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "../admin/secrets",
            "name": "Mallory",
            "role": "ADMIN"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    for user_id in ["../admin/secrets", "7?role=ADMIN", "7#frag", "a/b"] {
        let _ = provider.fetch_profile(user_id, "t.o.k").await;
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    for request in &requests {
        let segments: Vec<&str> = request.url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 2, "{}", request.url);
        assert_eq!(segments[0], "users");
        assert_eq!(request.url.query(), None);
        assert_eq!(request.url.fragment(), None);
    }
    assert_eq!(requests[0].url.path(), "/users/..%2Fadmin%2Fsecrets");
}

#[tokio::test]
async fn dot_segment_ids_are_refused_without_a_request() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    for user_id in ["..", ".", ""] {
        let result = provider.fetch_profile(user_id, "t.o.k").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))), "{user_id:?}");
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn base_url_path_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42",
            "name": "Ada",
            "role": "USER"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = IdentityEndpoint {
        base_url: format!("{}/api/", server.uri()),
        timeout_secs: 5,
    };
    let provider = HttpIdentityProvider::new(endpoint).unwrap();
    assert!(provider.fetch_profile("42", "t.o.k").await.is_ok());
}

#[tokio::test]
async fn numeric_profile_id_applies_role() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Ada",
            "role": "ADMIN"
        })))
        .mount(&server)
        .await;

    let claims: IdentityClaims = serde_json::from_value(json!({
        "id": 42,
        "role": "USER",
        "iat": chrono::Utc::now().timestamp(),
        "exp": chrono::Utc::now().timestamp() + 3600
    }))
    .unwrap();
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    let token = format!("{}.{}.sig", header, payload);

    let mut manager = SessionManager::load_default(MemoryStore::with_entry("token", token));
    assert_eq!(manager.user_id(), Some("42"));

    let role = manager.refresh_identity(&provider_for(&server)).await.unwrap();
    assert_eq!(role, Role::Admin);
    assert_eq!(manager.current_session().unwrap().profile().unwrap().id, "42");
}

#[test]
fn rejects_invalid_endpoint() {
    let endpoint = IdentityEndpoint::new("not a url");
    assert!(matches!(
        HttpIdentityProvider::new(endpoint),
        Err(AuthError::ConfigError(_))
    ));
}
