//! MaintainerClient tests against a mock server

use dogma_common::IpAccessAction;
use dogma_maintainer_client::{
    MaintainerClient, MaintainerClientConfig, MaintainerError,
    model::{AccessRule, CreateTokenForm},
};
use serde_json::json;
use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_json(app_id: &str, system_admin: bool) -> serde_json::Value {
    json!({
        "appId": app_id,
        "secret": "appToken-0123456789",
        "systemAdmin": system_admin,
        "creation": {"user": "admin@localhost", "timestamp": "2025-03-01T10:15:30Z"}
    })
}

// ============== Token Creation Tests ==============

#[tokio::test]
async fn test_create_token_with_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .and(header("authorization", "Bearer anonymous"))
        .and(body_string("appId=my-app&isSystemAdmin=false"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_json("my-app", false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = MaintainerClient::new(
        MaintainerClientConfig::new(&server.uri()).with_access_token("anonymous"),
    )
    .unwrap();
    let form = CreateTokenForm::new("my-app", false, &[]).unwrap();
    let token = client.create_token(&form).await.unwrap();

    assert_eq!(token.app_id, "my-app");
    assert_eq!(token.secret.as_deref(), Some("appToken-0123456789"));
    assert!(!token.system_admin);
}

#[tokio::test]
async fn test_create_token_sends_rules() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .and(body_string_contains("isSystemAdmin=true"))
        .and(body_string_contains("ipAccessControlRules="))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_json("ops", true)))
        .expect(1)
        .mount(&server)
        .await;

    let client = MaintainerClient::new(
        MaintainerClientConfig::new(&server.uri()).with_access_token("anonymous"),
    )
    .unwrap();
    let rules = vec![AccessRule::new(IpAccessAction::Deny, "10.0.0.0/8", None)];
    let form = CreateTokenForm::new("ops", true, &rules).unwrap();
    let token = client.create_token(&form).await.unwrap();

    assert!(token.system_admin);
}

#[tokio::test]
async fn test_create_token_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"exception": "TokenExistsException", "message": "Token 'my-app' already exists"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = MaintainerClient::new(
        MaintainerClientConfig::new(&server.uri()).with_access_token("anonymous"),
    )
    .unwrap();
    let form = CreateTokenForm::new("my-app", false, &[]).unwrap();
    let err = client.create_token(&form).await.unwrap_err();

    match err {
        MaintainerError::RequestFailed { status, body } => {
            assert_eq!(status, 409);
            assert!(body.contains("already exists"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============== Authentication Tests ==============

#[tokio::test]
async fn test_login_then_create_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_string("username=admin&password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "session-token",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_json("my-app", false)))
        .expect(2)
        .mount(&server)
        .await;

    let client = MaintainerClient::from_server_addr(&server.uri(), "admin", "secret").unwrap();
    let form = CreateTokenForm::new("my-app", false, &[]).unwrap();

    // The login token is cached across calls
    client.create_token(&form).await.unwrap();
    client.create_token(&form).await.unwrap();
}

#[tokio::test]
async fn test_short_lived_login_token_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short-token",
            "expires_in": 30
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .and(header("authorization", "Bearer short-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_json("my-app", false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = MaintainerClient::from_server_addr(&server.uri(), "admin", "secret").unwrap();
    let form = CreateTokenForm::new("my-app", false, &[]).unwrap();
    let detail = client.create_token(&form).await.unwrap();

    assert_eq!(detail.app_id, "my-app");
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let client = MaintainerClient::from_server_addr(&server.uri(), "admin", "wrong").unwrap();
    let form = CreateTokenForm::new("my-app", false, &[]).unwrap();
    let err = client.create_token(&form).await.unwrap_err();

    assert!(matches!(err, MaintainerError::AuthFailed(ref body) if body == "invalid credentials"));
}

#[tokio::test]
async fn test_unauthorized_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tokens"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = MaintainerClient::new(
        MaintainerClientConfig::new(&server.uri()).with_access_token("expired"),
    )
    .unwrap();
    let form = CreateTokenForm::new("my-app", false, &[]).unwrap();

    assert!(matches!(
        client.create_token(&form).await,
        Err(MaintainerError::AuthFailed(_))
    ));
}

// ============== User Tests ==============

#[tokio::test]
async fn test_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v0/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "admin",
            "name": "admin",
            "email": "admin@localhost",
            "roles": ["LEVEL_SYSTEM_ADMIN"]
        })))
        .mount(&server)
        .await;

    let client = MaintainerClient::new(
        MaintainerClientConfig::new(&server.uri()).with_access_token("anonymous"),
    )
    .unwrap();
    let user = client.current_user().await.unwrap();

    assert_eq!(user.login, "admin");
    assert!(user.is_system_admin());
}

// ============== Failover Tests ==============

#[tokio::test]
async fn test_transport_failure_switches_server_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v0/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "admin"})))
        .expect(1)
        .mount(&server)
        .await;

    // Nothing listens on port 1
    let config = MaintainerClientConfig::with_servers(vec![
        "http://127.0.0.1:1".to_string(),
        server.uri(),
    ])
    .with_access_token("anonymous")
    .with_timeouts(500, 2000);
    let client = MaintainerClient::new(config).unwrap();

    assert!(matches!(
        client.current_user().await,
        Err(MaintainerError::Http(_))
    ));
    assert_eq!(client.current_user().await.unwrap().login, "admin");
}
