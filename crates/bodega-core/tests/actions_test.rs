#![allow(clippy::unwrap_used)]
// Integration tests for the action layer using wiremock.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bodega_api::{ApiClient, TransportConfig};
use bodega_core::{
    Actions, CreateCategory, ErrorKind, LoginCredentials, MemorySession, ProductFilters, Role,
    SaleStatus, Session, SessionProvider, User, View,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn user_json(role: &str) -> Value {
    json!({
        "_id": "u1",
        "name": "Ana",
        "lastName": "Pérez",
        "idNumber": "100200",
        "typeDocument": "cc",
        "phone": "3001234567",
        "email": "ana@example.com",
        "role": role,
        "status": true
    })
}

fn user(role: &str) -> User {
    serde_json::from_value(user_json(role)).unwrap()
}

fn product_json(id: &str, status: bool) -> Value {
    json!({
        "_id": id,
        "name": "Mouse",
        "price": 25000,
        "stock": 5,
        "status": status,
        "category_id": "c1"
    })
}

async fn setup(logged_in: bool) -> (MockServer, Actions, Arc<MemorySession>) {
    let server = MockServer::start().await;
    let api = ApiClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    let session = Arc::new(if logged_in {
        MemorySession::with_session(Session {
            token: SecretString::from("tok-123".to_owned()),
            user: user("admin"),
        })
    } else {
        MemorySession::new()
    });
    let actions = Actions::new(api, session.clone());
    (server, actions, session)
}

// ── Session guard ───────────────────────────────────────────────────

#[tokio::test]
async fn test_no_session_fails_before_any_request() {
    let (server, actions, _) = setup(false).await;

    let result = actions
        .list_products(1, 10, &ProductFilters::default())
        .await;

    assert_eq!(result.error(), Some("No autenticado"));
    assert_eq!(result.kind(), Some(ErrorKind::AuthMissing));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_session_for_every_mutation() {
    let (server, actions, _) = setup(false).await;

    assert!(!actions.toggle_product_status("p1", false).await.is_success());
    assert!(!actions.delete_category("c1").await.is_success());
    assert!(!actions.update_sale_status("s1", SaleStatus::Completed).await.is_success());
    assert!(!actions.change_password("u1", "old", "nueva123").await.is_success());

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_product_filters_become_query_keys() {
    let (server, actions, _) = setup(true).await;

    Mock::given(method("GET"))
        .and(path("/product/user"))
        .and(header("authorization", "Bearer tok-123"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "elec"))
        .and(query_param("status", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [product_json("p1", true)],
            "meta": { "page": 2, "limit": 10, "total": 11, "totalPages": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = ProductFilters {
        search: Some("elec".into()),
        status: Some(true),
        ..ProductFilters::default()
    };
    let page = actions.list_products(2, 10, &filters).await.into_result().unwrap();

    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.data.unwrap()[0].id, "p1");
}

#[tokio::test]
async fn test_forbidden_toggle_surfaces_server_message() {
    let (server, actions, _) = setup(true).await;

    Mock::given(method("PUT"))
        .and(path("/product/p1/status"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "message": "No tienes permisos para esta acción" })),
        )
        .mount(&server)
        .await;

    let result = actions.toggle_product_status("p1", false).await;

    assert_eq!(
        result.error(),
        Some("Error 403 en la API: No tienes permisos para esta acción")
    );
    assert_eq!(result.kind(), Some(ErrorKind::Http { status: 403 }));
}

#[tokio::test]
async fn test_toggling_twice_restores_original_status() {
    let (server, actions, _) = setup(true).await;

    Mock::given(method("GET"))
        .and(path("/product/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": product_json("p1", true) })),
        )
        .mount(&server)
        .await;
    for status in [false, true] {
        Mock::given(method("PUT"))
            .and(path("/product/p1/status"))
            .and(body_json(json!({ "status": status })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": product_json("p1", status) })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let original = actions.get_product("p1").await.into_result().unwrap();
    assert!(original.status);

    let toggled = actions
        .toggle_product_status(&original.id, !original.status)
        .await
        .into_result()
        .unwrap();
    assert!(!toggled.status);

    let restored = actions
        .toggle_product_status(&toggled.id, !toggled.status)
        .await
        .into_result()
        .unwrap();
    assert_eq!(restored.status, original.status);
}

#[tokio::test]
async fn test_created_category_is_listed_after_invalidation() {
    let (server, actions, _) = setup(true).await;
    let mut events = actions.invalidator().subscribe();

    Mock::given(method("POST"))
        .and(path("/category"))
        .and(body_json(json!({ "name": "Aseo", "description": "Limpieza" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "_id": "c9", "name": "Aseo", "description": "Limpieza" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "_id": "c9", "name": "Aseo", "description": "Limpieza" }]
        })))
        .mount(&server)
        .await;

    let created = actions
        .create_category(&CreateCategory {
            name: "Aseo".into(),
            description: "Limpieza".into(),
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(created.id, "c9");
    assert_eq!(events.try_recv().unwrap(), View::Categories);

    let listed = actions.all_categories().await.into_result().unwrap();
    assert!(listed.iter().any(|c| c.id == "c9"));
}

#[tokio::test]
async fn test_success_without_data_is_a_failure_and_invalidates_nothing() {
    let (server, actions, _) = setup(true).await;
    let mut events = actions.invalidator().subscribe();

    Mock::given(method("POST"))
        .and(path("/category"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let result = actions
        .create_category(&CreateCategory {
            name: "Aseo".into(),
            description: "Limpieza".into(),
        })
        .await;

    assert!(result.error().unwrap().contains("no incluye datos"));
    assert_eq!(result.into_result().unwrap_err().1, ErrorKind::Parse);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_sale_status_change_invalidates_sales() {
    let (server, actions, _) = setup(true).await;
    let mut events = actions.invalidator().subscribe();

    Mock::given(method("PUT"))
        .and(path("/sales/s1/status"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "_id": "s1", "status": "completed", "total": 10 }
        })))
        .mount(&server)
        .await;

    let sale = actions
        .update_sale_status("s1", SaleStatus::Completed)
        .await
        .into_result()
        .unwrap();

    assert_eq!(sale.status, SaleStatus::Completed);
    assert!(View::Sales.is_affected_by(&events.try_recv().unwrap()));
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let (server, actions, session) = setup(false).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "secreta" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "data": user_json("seller")
        })))
        .mount(&server)
        .await;

    let logged = actions
        .login(&LoginCredentials::new("ana@example.com", "secreta"))
        .await
        .into_result()
        .unwrap();

    assert_eq!(logged.role, Role::Seller);
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().email, "ana@example.com");
    assert_eq!(actions.verify_auth().data(), Some(&true));

    assert!(actions.logout().is_success());
    assert!(!session.is_authenticated());
    assert_eq!(actions.user_data().error(), Some("No se encontraron datos del usuario"));
}

#[tokio::test]
async fn test_login_rejects_blank_credentials_locally() {
    let (server, actions, _) = setup(false).await;

    let result = actions.login(&LoginCredentials::new("  ", "")).await;

    assert_eq!(result.error(), Some("Email y contraseña son requeridos"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_credentials_keep_session_empty() {
    let (server, actions, session) = setup(false).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Credenciales inválidas" })),
        )
        .mount(&server)
        .await;

    let result = actions
        .login(&LoginCredentials::new("ana@example.com", "mala"))
        .await;

    assert_eq!(result.error(), Some("Error 401 en la API: Credenciales inválidas"));
    assert!(!session.is_authenticated());
}

// ── Profile ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_update_refreshes_cached_user() {
    let (server, actions, session) = setup(true).await;

    let mut updated = user_json("admin");
    updated["phone"] = json!("3100000000");
    Mock::given(method("PUT"))
        .and(path("/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": updated })))
        .mount(&server)
        .await;

    let data = bodega_core::UpdateUser {
        phone: Some("3100000000".into()),
        ..Default::default()
    };
    actions
        .update_profile("u1", &data)
        .await
        .into_result()
        .unwrap();

    assert_eq!(session.user().unwrap().phone, "3100000000");
}

#[tokio::test]
async fn test_change_password_sends_only_new_password() {
    let (server, actions, _) = setup(true).await;

    Mock::given(method("PUT"))
        .and(path("/user/u1"))
        .and(body_json(json!({ "password": "nueva123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json("admin") })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(
        actions
            .change_password("u1", "vieja", "nueva123")
            .await
            .is_success()
    );
    let missing = actions.change_password("u1", "", "nueva123").await;
    assert_eq!(missing.error(), Some("La contraseña actual es requerida"));
}
