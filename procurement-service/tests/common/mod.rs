//! Common test utilities for procurement-service integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use procurement_service::config::{
    DatabaseConfig, PaginationConfig, ProcurementConfig, ReportingConfig,
};
use procurement_service::services::{Database, FixedClock};
use procurement_service::startup::{router, AppState, Application};
use serde_json::{json, Value};
use service_core::config::Config as CommonConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Once};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

/// Nothing listens here, so every query fails fast with a pool timeout.
const UNREACHABLE_DATABASE_URL: &str = "postgres://procurement@127.0.0.1:1/unreachable";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,procurement_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Short unique identifier that fits the 20-character code columns.
pub fn unique(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..10])
}

fn test_config(database_url: String) -> ProcurementConfig {
    ProcurementConfig {
        common: CommonConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        },
        service_name: "procurement-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: database_url,
            max_connections: 2,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        pagination: PaginationConfig::default(),
        reporting: ReportingConfig::default(),
    }
}

/// Router over a pool that never connects. Requests rejected before storage
/// access behave normally; anything that reaches the database gets a 503.
pub fn offline_router(today: NaiveDate) -> Router {
    init_tracing();

    let config = test_config(UNREACHABLE_DATABASE_URL.to_string());
    let db = Database::connect_lazy(UNREACHABLE_DATABASE_URL, Duration::from_millis(500))
        .expect("Failed to build lazy pool");

    router(AppState {
        config,
        db: Arc::new(db),
        clock: Arc::new(FixedClock(today)),
    })
}

/// Drive one request through a router, returning the status and JSON body
/// (`Value::Null` for empty or non-JSON bodies).
pub async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Router failed");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Test application wrapper around a running server.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub today: NaiveDate,
}

impl TestApp {
    /// Spawn the service against `TEST_DATABASE_URL` with a fixed reference date.
    pub async fn spawn(today: NaiveDate) -> Self {
        init_tracing();

        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set to run database tests");

        let app = Application::build_with_clock(test_config(database_url), Arc::new(FixedClock(today)))
            .await
            .expect("Failed to build application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the liveness endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            today,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a supplier with a unique code and return the code.
    pub async fn create_supplier(&self) -> String {
        let code = unique("SUP");
        let response = self
            .post(
                "/api/suppliers",
                &json!({ "code": code, "name": format!("Supplier {}", code) }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        code
    }

    /// Create a purchase order and return its JSON representation.
    pub async fn create_order(
        &self,
        supplier_code: &str,
        followup_date: NaiveDate,
        status: &str,
    ) -> Value {
        let issue_date = followup_date - chrono::Days::new(10);
        let response = self
            .post(
                "/api/orders",
                &json!({
                    "number": unique("PC"),
                    "issue_date": issue_date,
                    "supplier_code": supplier_code,
                    "items_count": 3,
                    "followup_date": followup_date,
                    "warehouse": "WH1",
                    "status": status,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse JSON")
    }

    /// Create a delivery receipt and return its JSON representation.
    pub async fn create_delivery(
        &self,
        supplier_code: &str,
        manifest_date: NaiveDate,
        status: &str,
        purchase_order_id: Option<&str>,
    ) -> Value {
        let response = self
            .post(
                "/api/deliveries",
                &json!({
                    "cargo_number": unique("CG"),
                    "manifest_date": manifest_date,
                    "supplier_code": supplier_code,
                    "invoice_number": unique("NF"),
                    "issue_date": manifest_date,
                    "status": status,
                    "purchase_order_id": purchase_order_id,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("Failed to parse JSON")
    }
}
