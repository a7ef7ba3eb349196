mod common;

use axum::http::StatusCode;
use chrono::Days;
use common::{date, TestApp};
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn receipt_links_to_its_order() {
    let today = date(2024, 3, 15);
    let app = TestApp::spawn(today).await;
    let supplier = app.create_supplier().await;
    let order = app.create_order(&supplier, today, "PENDING").await;
    let order_id = order["order_id"].as_str().unwrap();

    let receipt = app
        .create_delivery(&supplier, today, "PENDING", Some(order_id))
        .await;
    assert_eq!(receipt["purchase_order_id"], order_id);
    assert_eq!(receipt["purchase_order_number"], order["number"]);
    assert_eq!(receipt["supplier"]["code"], supplier.as_str());

    let page: Value = app
        .get(&format!("/api/deliveries?purchase_order_id={}", order_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["count"], 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn receipt_order_must_belong_to_same_supplier() {
    let today = date(2024, 3, 15);
    let app = TestApp::spawn(today).await;
    let supplier = app.create_supplier().await;
    let other = app.create_supplier().await;
    let order = app.create_order(&other, today, "PENDING").await;

    let response = app
        .post(
            "/api/deliveries",
            &json!({
                "cargo_number": "CG-1",
                "manifest_date": today,
                "supplier_code": supplier,
                "invoice_number": "NF-1",
                "issue_date": today,
                "purchase_order_id": order["order_id"],
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = response.json().await.unwrap();
    assert!(error["details"]["purchase_order_id"].is_array());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn receipt_progress_and_completion() {
    let today = date(2024, 3, 15);
    let app = TestApp::spawn(today).await;
    let supplier = app.create_supplier().await;
    let receipt = app.create_delivery(&supplier, today, "PENDING", None).await;
    let path = format!("/api/deliveries/{}", receipt["receipt_id"].as_str().unwrap());

    let response = app
        .patch(&path, &json!({ "entry_time": "08:15:00", "exit_time": "09:40:00" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["entry_time"], "08:15:00");
    assert_eq!(updated["status"], "PENDING");

    let response = app.patch(&path, &json!({ "status": "COMPLETED" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.patch(&path, &json!({ "status": "PENDING" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn deliveries_default_to_newest_manifest_first() {
    let today = date(2024, 3, 15);
    let app = TestApp::spawn(today).await;
    let supplier = app.create_supplier().await;
    for offset in 0..3 {
        app.create_delivery(&supplier, today - Days::new(offset), "COMPLETED", None)
            .await;
    }

    let page: Value = app
        .get(&format!("/api/deliveries?supplier={}", supplier))
        .await
        .json()
        .await
        .unwrap();
    let dates: Vec<&str> = page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["manifest_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-03-15", "2024-03-14", "2024-03-13"]);

    let page: Value = app
        .get(&format!(
            "/api/deliveries?supplier={}&manifest_date=2024-03-14",
            supplier
        ))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["count"], 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn unknown_receipt_is_not_found() {
    let app = TestApp::spawn(date(2024, 3, 15)).await;

    let response = app
        .get(&format!("/api/deliveries/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
