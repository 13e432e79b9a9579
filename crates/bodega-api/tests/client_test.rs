#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bodega_api::{ApiClient, ApiResponse, Error, Query};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn token() -> SecretString {
    "tok-123".to_string().into()
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_and_content_type_are_sent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let resp: ApiResponse<Value> = client.get("/auth/profile", Some(&token())).await.unwrap();
    assert_eq!(resp.code, 200);
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@b.co", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "ok"})))
        .mount(&server)
        .await;

    let _: ApiResponse<Value> = client
        .post("/auth/login", &json!({"email": "a@b.co", "password": "x"}), None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

// ── Query parameters ────────────────────────────────────────────────

#[tokio::test]
async fn test_query_only_carries_present_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/category"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .and(query_param("search", "elec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": [{"_id": "1", "name": "Electrónica"}],
            "meta": {"page": 1, "limit": 100, "total": 1, "totalPages": 1}
        })))
        .mount(&server)
        .await;

    let query = Query::paged(1, 100)
        .push_opt("search", Some("elec"))
        .push_opt::<&str>("status", None);
    let resp: ApiResponse<Vec<Value>> = client
        .get_with_params("/category", &query, Some(&token()))
        .await
        .unwrap();

    assert_eq!(resp.total_pages(), 1);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=1&limit=100&search=elec"));
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_error_uses_json_message() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/product/p1/status"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .mount(&server)
        .await;

    let err = client
        .put::<Value, _>("/product/p1/status", &json!({"status": false}), Some(&token()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error 403 en la API: Forbidden");
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_error_falls_back_to_raw_text() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/category/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.delete::<Value>("/category/9", Some(&token())).await.unwrap_err();
    assert_eq!(err.to_string(), "Error 500 en la API: boom");
}

#[tokio::test]
async fn test_error_falls_back_to_status_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get::<Value>("/user/404", Some(&token())).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Error 404 en la API: Not Found");
}

#[tokio::test]
async fn test_connection_failure_is_distinct() {
    // Nothing listens on port 9 locally.
    let client = ApiClient::from_reqwest("http://127.0.0.1:9", reqwest::Client::new()).unwrap();

    let err = client.get::<Value>("/sales/stats", Some(&token())).await.unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "got: {err:?}");
    assert_eq!(
        err.to_string(),
        "Error de conexión con el servidor (verifique la red o la URL de la API)"
    );
}

// ── Success bodies ──────────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_success_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/kardex/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.get::<ApiResponse<Value>>("/kardex/stats", Some(&token())).await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_null() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/user/u1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value: Option<Value> = client.delete("/user/u1", Some(&token())).await.unwrap();
    assert!(value.is_none());
}
