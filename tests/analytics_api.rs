mod common;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use serde_json::Value;

use common::{bearer, TestContext};
use user_management::errors::ApiError;
use user_management::models::Role;

#[actix_web::test]
async fn test_admin_calculates_and_staff_reads_snapshots() {
    let ctx = TestContext::new();
    let admin = ctx.seed("root_admin", Role::Admin, true).await;
    let manager = ctx.seed("a_manager", Role::Manager, true).await;
    ctx.seed("member_one", Role::Authenticated, true).await;
    ctx.seed("member_two", Role::Authenticated, true).await;
    ctx.seed("pending_one", Role::Anonymous, false).await;
    let app = spawn_app!(ctx);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/analytics/retention")
            .insert_header(bearer(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let snapshot = &body["data"];
        assert_eq!(snapshot["total_anonymous_users"], 1);
        assert_eq!(snapshot["total_authenticated_users"], 2);
        assert_eq!(snapshot["conversion_rate"], "66.67%");
    }

    let req = test::TestRequest::get()
        .uri("/api/analytics/retention")
        .insert_header(bearer(&manager))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0]["timestamp"].as_str() >= history[1]["timestamp"].as_str());
}

#[actix_web::test]
async fn test_retention_permissions() {
    let ctx = TestContext::new();
    let manager = ctx.seed("a_manager", Role::Manager, true).await;
    let member = ctx.seed("a_member", Role::Authenticated, true).await;
    let app = spawn_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/analytics/retention")
        .insert_header(bearer(&manager))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "ADMIN_REQUIRED");

    let req = test::TestRequest::get()
        .uri("/api/analytics/retention")
        .insert_header(bearer(&member))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/analytics/retention")
        .to_request();
    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    let code = err.as_error::<ApiError>().map(|e| e.code().to_string());
    assert_eq!(code.as_deref(), Some("AUTH_REQUIRED"));
}

#[actix_web::test]
async fn test_health_and_openapi_are_public() {
    let ctx = TestContext::new();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");

    let req = test::TestRequest::get().uri("/api/openapi.json").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["paths"]["/api/users/search"].is_object());
}

#[actix_web::test]
async fn test_cross_origin_requests_are_allowed() {
    let ctx = TestContext::new();
    let member = ctx.seed("a_member", Role::Authenticated, true).await;
    let app = spawn_app!(ctx);
    let origin = "https://dashboard.example.org";

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/users/search")
        .insert_header(("Origin", origin))
        .insert_header(("Access-Control-Request-Method", "GET"))
        .insert_header(("Access-Control-Request-Headers", "authorization"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let allowed = resp.headers().get("access-control-allow-origin").unwrap();
    assert_eq!(allowed.to_str().unwrap(), origin);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Origin", origin))
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let allowed = resp.headers().get("access-control-allow-origin").unwrap();
    assert_eq!(allowed.to_str().unwrap(), origin);
}
