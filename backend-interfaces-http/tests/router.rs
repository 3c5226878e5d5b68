use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use backend_application::AppState;
use backend_domain::{Role, RuntimeConfig, User, UserId, UserRepository};
use backend_infrastructure::{MemoryStore, SystemClock};
use backend_interfaces_http::build_router;

struct TestApp {
    router: Router,
    admin: String,
}

async fn app(config: RuntimeConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let admin = User {
        id: UserId::generate(),
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        role: Role::Admin,
        employee_id: None,
        created_at: chrono::Utc::now(),
    };
    UserRepository::insert(store.as_ref(), &admin).await.unwrap();
    let state = AppState::new(config, store.stores(), Arc::new(SystemClock));
    TestApp {
        router: build_router(state),
        admin: admin.id.to_string(),
    }
}

fn request(method: &str, uri: &str, actor: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = actor {
        builder = builder.header("X-User-Id", user_id).header("X-User-Role", role);
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = app(RuntimeConfig::default()).await;
    let (status, body) = send(&app.router, request("GET", "/v1/items", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn api_token_is_enforced_when_configured() {
    let config = RuntimeConfig {
        api_token: Some("s3cret".to_string()),
        ..RuntimeConfig::default()
    };
    let app = app(config).await;
    let admin = app.admin.clone();

    let (status, _) = send(
        &app.router,
        request("GET", "/v1/items", Some((&admin, "ADMIN")), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut req = request("GET", "/v1/items", Some((&admin, "ADMIN")), None);
    req.headers_mut()
        .insert("Authorization", "Bearer s3cret".parse().unwrap());
    let (status, body) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn item_lifecycle_over_http() {
    let app = app(RuntimeConfig::default()).await;
    let admin = app.admin.clone();
    let admin_actor = Some((admin.as_str(), "ADMIN"));

    let (status, item) = send(
        &app.router,
        request(
            "POST",
            "/v1/items",
            admin_actor,
            Some(json!({
                "qr_code": "QR-77",
                "identity_code": "pc-77",
                "item_type": "System Unit"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["identity_code"], "PC-77");
    assert_eq!(item["status"], "available");
    let item_id = item["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/v1/items/{}/assign", item_id),
            admin_actor,
            Some(json!({ "user_id": "floor-1", "location": "Floor 2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let floor_actor = Some(("floor-1", "BPO"));
    let (status, scanned) = send(
        &app.router,
        request(
            "POST",
            "/v1/items/scan",
            floor_actor,
            Some(json!({ "identity_code": "pc-77", "action_type": "SCAN_IN", "location": "Floor 2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scanned["assigned_user_id"], "floor-1");

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/v1/items/scan",
            floor_actor,
            Some(json!({ "qr_code": "QR-77", "action_type": "TELEPORT", "location": "Floor 2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("TELEPORT"));

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/v1/items/scan",
            Some(("floor-2", "BPO")),
            Some(json!({ "qr_code": "QR-77", "action_type": "SCAN_OUT", "location": "Floor 2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "item not assigned to you");

    let (status, history) = send(
        &app.router,
        request(
            "GET",
            &format!("/v1/analytics/item-history/{}", item_id),
            admin_actor,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["action_type"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["SCAN_IN", "ASSIGNED"]);

    let (status, _) = send(
        &app.router,
        request("GET", "/v1/analytics/dashboard", floor_actor, None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn review_twice_conflicts() {
    let app = app(RuntimeConfig::default()).await;
    let admin = app.admin.clone();
    let admin_actor = Some((admin.as_str(), "ADMIN"));

    let (_, item) = send(
        &app.router,
        request(
            "POST",
            "/v1/items",
            admin_actor,
            Some(json!({ "qr_code": "QR-88", "identity_code": "ups-88", "item_type": "UPS" })),
        ),
    )
    .await;
    let item_id = item["id"].as_str().unwrap().to_string();

    let (status, request_body) = send(
        &app.router,
        request(
            "POST",
            "/v1/movement-requests",
            admin_actor,
            Some(json!({
                "item_id": item_id,
                "action_type": "REQUEST_DISPOSE",
                "reason": "battery swollen",
                "location": "Storage"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request_body["status"], "pending");
    let review_uri = format!(
        "/v1/movement-requests/{}/review",
        request_body["id"].as_str().unwrap()
    );

    let (status, reviewed) = send(
        &app.router,
        request("POST", &review_uri, admin_actor, Some(json!({ "status": "approved" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "approved");

    let (status, _) = send(
        &app.router,
        request("POST", &review_uri, admin_actor, Some(json!({ "status": "rejected" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, item) = send(
        &app.router,
        request("GET", &format!("/v1/items/{}", item_id), admin_actor, None),
    )
    .await;
    assert_eq!(item["status"], "disposed");

    let (status, _) = send(
        &app.router,
        request(
            "POST",
            "/v1/movement-requests/does-not-exist/review",
            admin_actor,
            Some(json!({ "status": "approved" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ops_endpoints_report_health_and_metrics() {
    let app = app(RuntimeConfig::default()).await;
    let (status, _) = send(&app.router, request("GET", "/v1/ops/health/live", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app.router, request("GET", "/v1/ops/health/ready", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["event_log"], "ok");

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/v1/ops/metrics/prometheus", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("equiptrack_pipeline_events_total 0"));
}
