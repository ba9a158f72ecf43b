use super::common::*;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::applications::router::ingest_handler;
use crate::applications::ApplicationService;

#[tokio::test]
async fn ingest_then_decide_by_id() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "/api/benefits/ingest",
            &serde_json::to_value(benefit_spec()).expect("spec json"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["id"], "benefit-2026-011");

    let response = router
        .oneshot(json_request(
            "/api/benefits/decision",
            &json!({
                "spec_id": "benefit-2026-011",
                "user_id": "user-42",
                "profile": serde_json::to_value(complete_profile()).expect("profile json"),
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "AUTO_SUBMIT");
    assert_eq!(payload["reason"], "ready_for_submission");
    assert!(payload.get("sms").is_none());
}

#[tokio::test]
async fn decision_accepts_camel_case_profiles() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/api/benefits/decision",
            &json!({
                "spec": {
                    "id": "inline-1",
                    "title": "Subsidiya",
                    "requiredFields": ["tin", "phone"],
                    "submitChannel": "manual_link"
                },
                "profile": { "businessName": "Baraka", "phone": "+998901234567" }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "MANUAL_ONLY");
    assert_eq!(payload["evaluation"]["missing_fields"], json!(["tin"]));
    assert_eq!(payload["payload"]["fields"]["phone"], "+998901234567");
}

#[tokio::test]
async fn unknown_spec_id_is_404() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/api/benefits/decision",
            &json!({ "spec_id": "nope", "profile": {} }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "application spec 'nope' not found");
}

#[tokio::test]
async fn decision_without_spec_is_400() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(json_request("/api/benefits/decision", &json!({ "profile": {} })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tax_route_forces_tax_guard_order() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);
    let mut spec = benefit_spec();
    spec.status_hint = crate::applications::StatusHint::Inactive;

    let response = router
        .oneshot(json_request(
            "/api/tax/decide",
            &json!({
                "spec": serde_json::to_value(spec).expect("spec json"),
                "profile": serde_json::to_value(complete_profile()).expect("profile json"),
                "consent": false,
            }),
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "SEND_SMS");
    assert_eq!(payload["reason"], "consent_missing");
    assert!(payload["sms"]
        .as_str()
        .is_some_and(|sms| sms.contains("Xizmat: https://my.gov.uz/services/subsidy")));
}

#[tokio::test]
async fn submit_routes_issue_channel_specific_tracking_ids() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);
    let body = json!({
        "application_id": "benefit-2026-011",
        "user_id": "user-42",
        "payload": { "tin": "301234567" },
    });

    let direct = router
        .clone()
        .oneshot(json_request("/api/submit", &body))
        .await
        .expect("route executes");
    let mygov = router
        .clone()
        .oneshot(json_request("/api/mygov/submit", &body))
        .await
        .expect("route executes");

    assert_eq!(direct.status(), StatusCode::OK);
    let direct = read_json_body(direct).await;
    let mygov = read_json_body(mygov).await;
    assert!(direct["tracking_id"]
        .as_str()
        .is_some_and(|id| id.starts_with("APP-")));
    assert!(mygov["tracking_id"]
        .as_str()
        .is_some_and(|id| id.starts_with("MYGOV-")));
    assert_eq!(mygov["status"], "submitted");

    let status = router
        .oneshot(
            Request::get("/api/benefits/status?user_id=user-42")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let status = read_json_body(status).await;
    assert_eq!(status["user_id"], "user-42");
    assert_eq!(status["applications"].as_array().map(Vec::len), Some(1));
    assert_eq!(status["events"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn status_requires_user_id() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/benefits/status")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sms_route_returns_message_id() {
    let (service, _, outbox, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/api/notify/sms",
            &json!({ "to_phone": "+998901234567", "message": "salom" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload["message_id"]
        .as_str()
        .is_some_and(|id| id.starts_with("sms-")));
    assert_eq!(outbox.messages().len(), 1);
}

#[tokio::test]
async fn scan_route_reads_profile_from_query() {
    let (service, _, _, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(
            Request::get(
                "/api/auto-applications/new?business_name=Baraka&tin=301234567&legal_form=YTT&phone=%2B998901234567",
            )
            .body(axum::body::Body::empty())
            .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 3);
    assert_eq!(payload["items"][0]["reason"], "required_fields_missing");
    assert_eq!(payload["items"][2]["reason"], "eligible");
}

#[tokio::test]
async fn analyze_route_returns_partitions() {
    let (service, _, outbox, _) = build_service();
    let router = application_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/api/auto-applications/analyze",
            &json!({
                "profile": serde_json::to_value(complete_profile()).expect("profile json"),
                "user_id": "user-42",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["auto_submitted"].as_array().map(Vec::len), Some(2));
    assert_eq!(payload["pending_user_input"].as_array().map(Vec::len), Some(1));
    assert_eq!(outbox.messages().len(), 1);
}

#[tokio::test]
async fn ingest_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(ApplicationService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryOutbox::default()),
        Arc::new(MemoryAudit::default()),
        &notification_config(),
    ));

    let response = ingest_handler::<UnavailableRepository, MemoryOutbox, MemoryAudit>(
        State(service),
        axum::Json(benefit_spec()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
