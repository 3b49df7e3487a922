//! HTTP API tests against the in-memory store

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use common::*;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use shared::{SessionContext, UserRole};
use tower::ServiceExt;
use uuid::Uuid;
use wm_backend::{
    config::{
        Config, DashboardConfig, DatabaseConfig, JwtConfig, ServerConfig, StoreBackend,
        StoreConfig,
    },
    create_app,
    middleware::Claims,
    store::MemoryStore,
    AppState,
};

const SECRET: &str = "test-secret";

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            rest_url: String::new(),
            rest_api_key: String::new(),
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
        },
        dashboard: DashboardConfig { activity_limit: 5 },
    }
}

fn test_state(store: &Arc<MemoryStore>) -> AppState {
    AppState::new(dyn_store(store), test_config())
}

fn token_for(user_id: Uuid, role: &str) -> String {
    sign(user_id, role, None)
}

fn owner_token(owner_id: i64) -> String {
    sign(Uuid::new_v4(), "owner", Some(owner_id))
}

fn sign(user_id: Uuid, role: &str, owner_id: Option<i64>) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
        owner_id,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ============================================================================
// Admin dashboard
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));

    let (status, body) = send(&app, request(Method::GET, "/api/v1/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_dashboard_requires_token() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));

    let (status, body) =
        send(&app, request(Method::GET, "/api/v1/admin/dashboard", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_dashboard_rejects_non_admin() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "owner");

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/dashboard", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_PERMISSIONS");
}

#[tokio::test]
async fn test_dashboard_payload() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/dashboard", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["pending_approvals"], 2);
    assert_eq!(body["stats"]["total_service_providers"], 4);
    assert_eq!(body["status_counts"]["rejected"], 1);
    assert_eq!(body["providers"].as_array().unwrap().len(), 4);
    assert_eq!(body["providers"][0]["status"], "Pending");
    assert_eq!(body["providers"][0]["type"], "hall");
}

#[tokio::test]
async fn test_list_providers_filtered() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers?status=active", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let providers = body["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["id"], 2);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers?status=banned", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "status");
}

#[tokio::test]
async fn test_provider_detail_lists_actions() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers/3", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Rejected");
    assert_eq!(body["actions"], serde_json::json!(["approve", "reset"]));
}

#[tokio::test]
async fn test_approve_via_api() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/admin/providers/1/approve", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["previous_status"], "Pending");
    assert_eq!(body["status"], "Active");
    assert_eq!(body["pending_approvals"], 1);
    assert_eq!(store.provider_fields(1), Some(shared::ProviderFields::ACTIVE));
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/admin/providers/1/promote", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_update_failure_maps_to_bad_gateway() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");
    store.set_writes_offline(true);

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/admin/providers/2/reset", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPDATE_FAILED");
    assert_eq!(store.provider_fields(2), Some(shared::ProviderFields::ACTIVE));

    // The board of this session still shows the provider as active
    let (_, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers/2", Some(&token), None),
    )
    .await;
    assert_eq!(body["status"], "Active");
}

#[tokio::test]
async fn test_delete_provider() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (status, _) = send(
        &app,
        request(Method::DELETE, "/api/v1/admin/providers/1", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers/1", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overlapping_action_is_refused() {
    let store = Arc::new(seeded_store());
    let state = test_state(&store);
    let app = create_app(state.clone());
    let user_id = Uuid::new_v4();
    let token = token_for(user_id, "admin");

    let ctx = SessionContext::new(user_id, UserRole::Admin);
    let _in_flight = state.sessions.acquire(&ctx).await.unwrap();

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/admin/providers/1/approve", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "OPERATION_IN_PROGRESS");
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_customer_and_payment_status() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let token = token_for(Uuid::new_v4(), "admin");

    let (_, dashboard) = send(
        &app,
        request(Method::GET, "/api/v1/admin/dashboard", Some(&token), None),
    )
    .await;
    let omar_id = dashboard["customers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Omar")
        .map(|c| c["id"].as_str().unwrap().to_string())
        .unwrap();

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/v1/admin/customers/{}/status", omar_id),
            Some(&token),
            Some(serde_json::json!({ "status": "active" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Active");

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/v1/admin/payments/11/status",
            Some(&token),
            Some(serde_json::json!({ "status": "completed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");
    assert_eq!(body["commission"], "60.00");
}

#[tokio::test]
async fn test_second_admin_sees_first_admins_approval() {
    let store = Arc::new(seeded_store());
    let app = create_app(test_state(&store));
    let admin_a = token_for(Uuid::new_v4(), "admin");
    let admin_b = token_for(Uuid::new_v4(), "admin");

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers?status=pending", Some(&admin_a), None),
    )
    .await;
    assert_eq!(body["providers"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/admin/providers/1/approve", Some(&admin_b), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers?status=pending", Some(&admin_a), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pending = body["providers"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], 4);

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/v1/admin/providers/1", Some(&admin_a), None),
    )
    .await;
    assert_eq!(body["status"], "Active");
    assert_eq!(body["actions"], serde_json::json!(["reset"]));

    // A's counter starts from the stored Active status, not its old Pending
    let (_, body) = send(
        &app,
        request(Method::POST, "/api/v1/admin/providers/1/reject", Some(&admin_a), None),
    )
    .await;
    assert_eq!(body["previous_status"], "Active");
    assert_eq!(body["pending_approvals"], 1);
}

#[tokio::test]
async fn test_close_session() {
    let store = Arc::new(seeded_store());
    let state = test_state(&store);
    let app = create_app(state.clone());
    let user_id = Uuid::new_v4();
    let token = token_for(user_id, "admin");

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/v1/admin/dashboard", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(Method::DELETE, "/api/v1/admin/session", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let ctx = SessionContext::new(user_id, UserRole::Admin);
    assert!(!state.sessions.acquire(&ctx).await.unwrap().is_loaded());

    let (status, _) = send(
        &app,
        request(Method::DELETE, "/api/v1/admin/session", Some(&owner_token(4)), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Provider self-service
// ============================================================================

#[tokio::test]
async fn test_owner_lists_and_accepts_visits() {
    let store = Arc::new(owner_store());
    let app = create_app(test_state(&store));
    let token = owner_token(4);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/owner/visits", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let visits = body["visits"].as_array().unwrap();
    assert_eq!(visits.len(), 3);
    assert_eq!(visits[0]["id"], 101);
    assert_eq!(visits[0]["visit_date"], "2025-06-05");
    assert_eq!(visits[0]["status"], "Awaiting");

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/v1/owner/visits/101/accept", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Accepted");

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/owner/visits/200/accept", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_reservations_and_profile() {
    let store = Arc::new(owner_store());
    let app = create_app(test_state(&store));
    let token = owner_token(1);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/owner/reservations", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reservations = body["reservations"].as_array().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0]["id"], 12);
    assert_eq!(reservations[0]["status"], "Pending");

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            "/api/v1/owner/profile",
            Some(&token),
            Some(serde_json::json!({ "name": "Sweet Layers", "visible": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sweet Layers");
    assert_eq!(body["status"], "Pending");
    assert_eq!(store.provider_fields(1), Some(shared::ProviderFields::PENDING));

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/owner/profile", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "cake");
}

#[tokio::test]
async fn test_owner_routes_need_bound_owner() {
    let store = Arc::new(owner_store());
    let app = create_app(test_state(&store));

    let (status, _) = send(&app, request(Method::GET, "/api/v1/owner/visits", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for token in [
        token_for(Uuid::new_v4(), "owner"),
        token_for(Uuid::new_v4(), "admin"),
    ] {
        let (status, body) = send(
            &app,
            request(Method::GET, "/api/v1/owner/visits", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_PERMISSIONS");
    }
}
