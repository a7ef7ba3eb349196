//! Requests that must be rejected before any storage access. These run against
//! a router whose database is unreachable, so reaching storage would be a 503.

mod common;

use axum::http::StatusCode;
use common::{call, date, offline_router};
use serde_json::json;

fn valid_order() -> serde_json::Value {
    json!({
        "number": "PC-1001",
        "issue_date": "2024-03-01",
        "supplier_code": "ACME",
        "items_count": 4,
        "followup_date": "2024-03-12",
        "warehouse": "WH1"
    })
}

#[tokio::test]
async fn followup_before_issue_is_rejected() {
    let app = offline_router(date(2024, 3, 15));
    let mut body = valid_order();
    body["followup_date"] = json!("2024-02-20");

    let (status, json) = call(&app, "POST", "/api/orders", Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["details"]["followup_date"].is_array());
}

#[tokio::test]
async fn field_rules_are_reported_per_field() {
    let app = offline_router(date(2024, 3, 15));
    let mut body = valid_order();
    body["number"] = json!("");
    body["items_count"] = json!(-2);

    let (status, json) = call(&app, "POST", "/api/orders", Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["details"]["number"].is_array());
    assert!(json["details"]["items_count"].is_array());
}

#[tokio::test]
async fn missing_field_is_unprocessable() {
    let app = offline_router(date(2024, 3, 15));
    let mut body = valid_order();
    body.as_object_mut().unwrap().remove("warehouse");

    let (status, _) = call(&app, "POST", "/api/orders", Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_status_in_body_is_unprocessable() {
    let app = offline_router(date(2024, 3, 15));
    let mut body = valid_order();
    body["status"] = json!("FINALIZADO");

    let (status, _) = call(&app, "POST", "/api/orders", Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = offline_router(date(2024, 3, 15));

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/suppliers")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"code\": "))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_page_size_is_rejected() {
    let app = offline_router(date(2024, 3, 15));

    for uri in [
        "/api/orders?page_size=0",
        "/api/suppliers?page_size=-5",
        "/api/deliveries?page=0",
    ] {
        let (status, _) = call(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
}

#[tokio::test]
async fn malformed_query_values_are_bad_requests() {
    let app = offline_router(date(2024, 3, 15));

    for uri in [
        "/api/orders?bucket=someday",
        "/api/orders?status=OPEN",
        "/api/orders?ordering=supplier",
        "/api/orders?page=two",
        "/api/deliveries?manifest_date=15-03-2024",
        "/api/stats?date=tomorrow",
    ] {
        let (status, json) = call(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn malformed_order_id_is_bad_request() {
    let app = offline_router(date(2024, 3, 15));

    let (status, _) = call(&app, "GET", "/api/orders/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn supplier_code_is_immutable() {
    let app = offline_router(date(2024, 3, 15));

    let (status, _) = call(
        &app,
        "PATCH",
        "/api/suppliers/ACME",
        Some(json!({ "code": "ACME2" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn order_number_is_immutable() {
    let app = offline_router(date(2024, 3, 15));
    let uri = format!("/api/orders/{}", uuid::Uuid::new_v4());

    let (status, json) = call(&app, "PATCH", &uri, Some(json!({ "number": "RENAMED-1" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());
}
