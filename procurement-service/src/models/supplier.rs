//! Supplier model.

use super::ParseStatusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierStatus {
    Active,
    Inactive,
}

impl SupplierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "ACTIVE",
            SupplierStatus::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupplierStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(SupplierStatus::Active),
            "INACTIVE" => Ok(SupplierStatus::Inactive),
            other => Err(ParseStatusError::new("supplier status", other)),
        }
    }
}

impl TryFrom<String> for SupplierStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Supplier {
    pub supplier_id: Uuid,
    pub code: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: SupplierStatus,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ListSuppliersFilter {
    pub status: Option<SupplierStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSupplier {
    pub code: String,
    pub name: String,
    pub status: SupplierStatus,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSupplier {
    pub name: Option<String>,
    pub status: Option<SupplierStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_column_text() {
        for status in [SupplierStatus::Active, SupplierStatus::Inactive] {
            assert_eq!(SupplierStatus::try_from(status.to_string()), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "ATIVO".parse::<SupplierStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown supplier status 'ATIVO'");
    }
}
