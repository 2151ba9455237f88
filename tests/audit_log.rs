mod common;

use std::sync::Mutex;

use actix_web::http::StatusCode;
use actix_web::test;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;

use common::{bearer, TestContext};
use user_management::models::Role;
use user_management::repositories::UserRepository;

/// Keeps every record emitted by the crate so tests can assert on audit lines.
struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("user_management")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn install_logger() {
    // Only the first call in this binary wins; later ones are no-ops.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

/// Warn records that mention every one of `needles`.
fn warnings_naming(needles: &[&str]) -> Vec<String> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, message)| {
            *level == Level::Warn && needles.iter().all(|n| message.contains(n))
        })
        .map(|(_, message)| message.clone())
        .collect()
}

#[actix_web::test]
async fn test_denied_role_change_is_logged_with_actor_and_target() {
    install_logger();
    let ctx = TestContext::new();
    let manager = ctx.seed("log_manager", Role::Manager, true).await;
    let target = ctx.seed("log_target", Role::Authenticated, true).await;
    let app = spawn_app!(ctx);

    let actor_id = manager.id.to_hex();
    let target_id = target.id.to_hex();
    assert!(warnings_naming(&[&actor_id, &target_id]).is_empty());

    let req = test::TestRequest::patch()
        .uri(&format!("/api/users/{}/role", target_id))
        .insert_header(bearer(&manager))
        .set_json(json!({ "role": "ADMIN" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let lines = warnings_naming(&[&actor_id, &target_id]);
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].starts_with("Denied role change"));
    assert!(lines[0].contains("ADMIN"));
}

#[actix_web::test]
async fn test_denied_role_change_with_stale_admin_token_is_logged() {
    install_logger();
    let ctx = TestContext::new();
    let admin = ctx.seed("log_former_admin", Role::Admin, true).await;
    let target = ctx.seed("log_other_target", Role::Authenticated, true).await;
    let stale = bearer(&admin);

    let mut demoted = ctx.reload(&admin).await;
    demoted.role = Role::Authenticated;
    ctx.users.replace(&demoted).await.unwrap();
    let app = spawn_app!(ctx);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/users/{}/role", target.id.to_hex()))
        .insert_header(stale)
        .set_json(json!({ "role": "MANAGER" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let lines = warnings_naming(&[&admin.id.to_hex(), &target.id.to_hex()]);
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].starts_with("Denied role change"));
}
