#![allow(clippy::unwrap_used)]
// Integration tests for `CheckinClient` using wiremock.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mealgate_api::{BearerToken, CheckinClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

const ATTENDEE: &str = "702f951f-8719-445d-b277-eaa4ea49dd41";

fn test_token() -> BearerToken {
    let payload = json!({
        "sub": "operator-1",
        "exp": 4_102_444_800_i64,
        "cognito:groups": ["organizers_current"],
    });
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    BearerToken::decode(format!("eyJhbGciOiJSUzI1NiJ9.{body}.sig").into()).unwrap()
}

async fn setup() -> (MockServer, CheckinClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = CheckinClient::with_client(reqwest::Client::new(), base_url, test_token());
    (server, client)
}

fn form_path() -> String {
    format!("/users/{ATTENDEE}/forms/used_meals")
}

// ── Fetch tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_used_meals() {
    let (server, client) = setup().await;

    let bearer = format!("Bearer {}", test_token().expose());
    Mock::given(method("GET"))
        .and(path(form_path()))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mealList": "fri-dinner sat-breakfast"
        })))
        .mount(&server)
        .await;

    let history = client.get_used_meals(ATTENDEE).await.unwrap();
    assert_eq!(history, "fri-dinner sat-breakfast");
}

#[tokio::test]
async fn test_get_used_meals_missing_field_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(form_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let history = client.get_used_meals(ATTENDEE).await.unwrap();
    assert_eq!(history, "");
}

#[tokio::test]
async fn test_get_used_meals_non_200_is_access_denied() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(form_path()))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = client.get_used_meals(ATTENDEE).await;
    assert!(
        matches!(result, Err(Error::AccessDenied { status: 403 })),
        "expected AccessDenied, got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_used_meals_bad_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(form_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.get_used_meals(ATTENDEE).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization, got: {result:?}"
    );
}

// ── Update tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_put_used_meals() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(form_path()))
        .and(body_json(json!({ "mealList": "fri-dinner sat-lunch" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .put_used_meals(ATTENDEE, "fri-dinner sat-lunch")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_used_meals_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(form_path()))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.put_used_meals(ATTENDEE, "fri-dinner").await;
    assert!(
        matches!(result, Err(Error::AccessDenied { status: 401 })),
        "expected AccessDenied, got: {result:?}"
    );
}

#[tokio::test]
async fn test_put_used_meals_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(form_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.put_used_meals(ATTENDEE, "fri-dinner").await;
    assert!(
        matches!(result, Err(Error::Backend { status: 500, .. })),
        "expected Backend, got: {result:?}"
    );
}
