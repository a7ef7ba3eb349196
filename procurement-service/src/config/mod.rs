//! Configuration module for procurement-service.

use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProcurementConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Page-number pagination bounds shared by every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 11,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "page sizes must be positive"
            )));
        }
        if self.default_page_size > self.max_page_size {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PAGINATION_DEFAULT_PAGE_SIZE ({}) exceeds PAGINATION_MAX_PAGE_SIZE ({})",
                self.default_page_size,
                self.max_page_size
            )));
        }
        Ok(())
    }
}

/// Where "today" is for the dashboard and the date buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportingConfig {
    /// Offset of the reporting calendar from UTC, in minutes (e.g. -180).
    pub utc_offset_minutes: i32,
}

impl ReportingConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "REPORTING_UTC_OFFSET_MINUTES must be within +/- 1439, got {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: '{}'", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

impl ProcurementConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_page_size: parse_env(
                "PAGINATION_DEFAULT_PAGE_SIZE",
                defaults.default_page_size,
            )?,
            max_page_size: parse_env("PAGINATION_MAX_PAGE_SIZE", defaults.max_page_size)?,
        };
        pagination.validate()?;

        let reporting = ReportingConfig {
            utc_offset_minutes: parse_env("REPORTING_UTC_OFFSET_MINUTES", 0)?,
        };
        reporting.validate()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "procurement-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
                })?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 2)?,
                acquire_timeout_secs: parse_env("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?,
            },
            pagination,
            reporting,
        })
    }
}
