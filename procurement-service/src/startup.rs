//! Application startup and lifecycle management.

use crate::config::ProcurementConfig;
use crate::handlers;
use crate::services::{init_metrics, Clock, Database, SystemClock};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProcurementConfig,
    pub db: Arc<Database>,
    pub clock: Arc<dyn Clock>,
}

/// The HTTP surface: `/api/*` plus the operational endpoints.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/orders/:order_id",
            get(handlers::get_order)
                .patch(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route(
            "/suppliers",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/suppliers/:code",
            get(handlers::get_supplier)
                .patch(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route(
            "/deliveries",
            get(handlers::list_deliveries).post(handlers::create_delivery),
        )
        .route(
            "/deliveries/:receipt_id",
            get(handlers::get_delivery).patch(handlers::update_delivery),
        )
        .route("/stats", get(handlers::dashboard_stats))
        .route("/health", get(handlers::health_check));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ProcurementConfig) -> Result<Self, AppError> {
        let clock = system_clock(&config)?;
        Self::build_internal(config, clock, true).await
    }

    /// Build the application without running migrations.
    /// Use this in tests when migrations are already applied by the test harness.
    pub async fn build_without_migrations(config: ProcurementConfig) -> Result<Self, AppError> {
        let clock = system_clock(&config)?;
        Self::build_internal(config, clock, false).await
    }

    /// Build with an explicit reference-date source, running migrations.
    pub async fn build_with_clock(
        config: ProcurementConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        Self::build_internal(config, clock, true).await
    }

    async fn build_internal(
        config: ProcurementConfig,
        clock: Arc<dyn Clock>,
        run_migrations: bool,
    ) -> Result<Self, AppError> {
        // Initialize metrics
        init_metrics();

        // Connect to database
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
            Duration::from_secs(config.database.acquire_timeout_secs),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        // Run migrations only if requested
        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let state = AppState {
            config: config.clone(),
            db: Arc::new(db),
            clock,
        };

        // Bind HTTP listener
        let addr = config.common.bind_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Procurement service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state);

        tracing::info!(
            service = "procurement-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, app).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}

fn system_clock(config: &ProcurementConfig) -> Result<Arc<dyn Clock>, AppError> {
    let offset = config.reporting.utc_offset_minutes;
    let clock = SystemClock::with_offset_minutes(offset).ok_or_else(|| {
        AppError::ConfigError(anyhow::anyhow!(
            "REPORTING_UTC_OFFSET_MINUTES out of range: {}",
            offset
        ))
    })?;
    Ok(Arc::new(clock))
}
