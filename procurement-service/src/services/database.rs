//! Database service for procurement-service.

use crate::models::{
    CreateDeliveryReceipt, CreatePurchaseOrder, CreateSupplier, DeliveryReceipt,
    ListDeliveriesFilter, ListOrdersFilter, ListSuppliersFilter, OrderStatus, PurchaseOrder,
    ReceiptStatus, Supplier, UpdateDeliveryReceipt, UpdatePurchaseOrder, UpdateSupplier,
};
use crate::reporting::{OrderSchedule, ReceiptSnapshot};
use crate::services::metrics::{record_entity_write, QueryTimer};
use chrono::NaiveDate;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const SUPPLIER_COLUMNS: &str = "supplier_id, code, name, status, created_utc, updated_utc";

const SUPPLIER_FILTER: &str = r#"
    WHERE ($1::varchar IS NULL OR status = $1)
      AND ($2::varchar IS NULL OR code ILIKE $2 OR name ILIKE $2)
"#;

/// Projection shared by every order read; `o` may be the table or a CTE.
const ORDER_COLUMNS: &str = r#"
    o.order_id, o.number, o.issue_date, o.supplier_id,
    s.code AS supplier_code, s.name AS supplier_name, s.status AS supplier_status,
    o.items_count, o.followup_date, o.warehouse, o.status, o.created_utc, o.updated_utc
"#;

const ORDER_FILTER: &str = r#"
    WHERE ($1::varchar IS NULL OR o.status = $1)
      AND ($2::varchar IS NULL OR s.code = $2)
      AND ($3::varchar IS NULL OR o.warehouse = $3)
      AND ($4::date IS NULL OR o.followup_date >= $4)
      AND ($5::date IS NULL OR o.followup_date <= $5)
      AND ($6::bool = FALSE OR o.status IN ('PENDING', 'PARTIAL'))
      AND ($7::varchar IS NULL OR o.number ILIKE $7 OR s.name ILIKE $7 OR s.code ILIKE $7)
"#;

const RECEIPT_COLUMNS: &str = r#"
    d.receipt_id, d.cargo_number, d.manifest_date, d.supplier_id,
    s.code AS supplier_code, s.name AS supplier_name, s.status AS supplier_status,
    d.invoice_number, d.issue_date, d.manifest_time, d.entry_time, d.exit_time,
    d.status, d.purchase_order_id, o.number AS purchase_order_number, d.created_utc
"#;

const RECEIPT_FILTER: &str = r#"
    WHERE ($1::varchar IS NULL OR d.status = $1)
      AND ($2::varchar IS NULL OR s.code = $2)
      AND ($3::uuid IS NULL OR d.purchase_order_id = $3)
      AND ($4::date IS NULL OR d.manifest_date = $4)
      AND ($5::varchar IS NULL OR d.cargo_number ILIKE $5 OR d.invoice_number ILIKE $5)
"#;

/// Connectivity failures surface as 503; everything else is a 500.
fn storage_error(context: &str, e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            warn!(error = %e, context, "Database unreachable");
            AppError::ServiceUnavailable
        }
        _ => AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, e)),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// `%term%` for ILIKE, with the pattern metacharacters escaped.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn search_pattern(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern)
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "procurement-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Pool that connects on first use; startup succeeds with the database down.
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid DATABASE_URL: {}", e)))?;
        Ok(Self { pool })
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Health check failed", e))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Supplier Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_supplier(&self, input: &CreateSupplier) -> Result<Supplier, AppError> {
        let timer = QueryTimer::start("create_supplier");

        let sql = format!(
            "INSERT INTO suppliers (supplier_id, code, name, status) VALUES ($1, $2, $3, $4) RETURNING {}",
            SUPPLIER_COLUMNS
        );
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::invalid_field(
                        "code",
                        "unique",
                        format!("supplier code '{}' already exists", input.code),
                    )
                } else {
                    storage_error("Failed to create supplier", e)
                }
            })?;

        timer.observe_duration();
        record_entity_write("supplier", "create");

        info!(supplier_id = %supplier.supplier_id, code = %supplier.code, "Supplier created");

        Ok(supplier)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, code: &str) -> Result<Option<Supplier>, AppError> {
        let timer = QueryTimer::start("get_supplier");

        let sql = format!("SELECT {} FROM suppliers WHERE code = $1", SUPPLIER_COLUMNS);
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get supplier", e))?;

        timer.observe_duration();

        Ok(supplier)
    }

    /// Suppliers ordered by name, with the total matching count.
    #[instrument(skip(self, filter))]
    pub async fn list_suppliers(
        &self,
        filter: &ListSuppliersFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Supplier>, i64), AppError> {
        let timer = QueryTimer::start("list_suppliers");

        let status = filter.status.map(|s| s.as_str());
        let search = search_pattern(&filter.search);

        let count_sql = format!("SELECT COUNT(*) FROM suppliers {}", SUPPLIER_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count suppliers", e))?;

        let sql = format!(
            "SELECT {} FROM suppliers {} ORDER BY name ASC, code ASC LIMIT $3 OFFSET $4",
            SUPPLIER_COLUMNS, SUPPLIER_FILTER
        );
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .bind(status)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list suppliers", e))?;

        timer.observe_duration();

        Ok((suppliers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        code: &str,
        input: &UpdateSupplier,
    ) -> Result<Option<Supplier>, AppError> {
        let timer = QueryTimer::start("update_supplier");

        let sql = format!(
            r#"
            UPDATE suppliers
            SET name = COALESCE($2, name),
                status = COALESCE($3, status),
                updated_utc = NOW()
            WHERE code = $1
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        );
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(code)
            .bind(&input.name)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update supplier", e))?;

        timer.observe_duration();
        if supplier.is_some() {
            record_entity_write("supplier", "update");
        }

        Ok(supplier)
    }

    /// Number of orders and receipts that reference the supplier, or `None`
    /// when the supplier does not exist.
    #[instrument(skip(self))]
    pub async fn supplier_dependents(&self, code: &str) -> Result<Option<(i64, i64)>, AppError> {
        let timer = QueryTimer::start("supplier_dependents");

        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM purchase_orders o WHERE o.supplier_id = s.supplier_id),
                (SELECT COUNT(*) FROM delivery_receipts d WHERE d.supplier_id = s.supplier_id)
            FROM suppliers s
            WHERE s.code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to count supplier dependents", e))?;

        timer.observe_duration();

        Ok(counts)
    }

    /// Delete a supplier that nothing references.
    ///
    /// The foreign keys are `ON DELETE RESTRICT`; a dependent row created after
    /// the caller's check still blocks the delete and is reported as a conflict.
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, code: &str) -> Result<bool, AppError> {
        let timer = QueryTimer::start("delete_supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(anyhow::anyhow!(
                        "Supplier '{}' is referenced by orders or deliveries",
                        code
                    ))
                } else {
                    storage_error("Failed to delete supplier", e)
                }
            })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            record_entity_write("supplier", "delete");
            info!(code = %code, "Supplier deleted");
        }

        Ok(deleted)
    }

    async fn supplier_id_for_code(&self, field: &'static str, code: &str) -> Result<Uuid, AppError> {
        self.get_supplier(code)
            .await?
            .map(|s| s.supplier_id)
            .ok_or_else(|| {
                AppError::invalid_field(field, "unknown_supplier", format!("no supplier with code '{}'", code))
            })
    }

    // -------------------------------------------------------------------------
    // Purchase Order Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn count_orders(&self) -> Result<i64, AppError> {
        let timer = QueryTimer::start("count_orders");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase_orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count orders", e))?;

        timer.observe_duration();

        Ok(total)
    }

    #[instrument(skip(self, input), fields(number = %input.number))]
    pub async fn create_order(&self, input: &CreatePurchaseOrder) -> Result<PurchaseOrder, AppError> {
        let timer = QueryTimer::start("create_order");

        let supplier_id = self
            .supplier_id_for_code("supplier_code", &input.supplier_code)
            .await?;

        let sql = format!(
            r#"
            WITH o AS (
                INSERT INTO purchase_orders
                    (order_id, number, issue_date, supplier_id, items_count, followup_date, warehouse, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT {} FROM o JOIN suppliers s ON s.supplier_id = o.supplier_id
            "#,
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.number)
            .bind(input.issue_date)
            .bind(supplier_id)
            .bind(input.items_count)
            .bind(input.followup_date)
            .bind(&input.warehouse)
            .bind(input.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::invalid_field(
                        "number",
                        "unique",
                        format!("order number '{}' already exists", input.number),
                    )
                } else if is_foreign_key_violation(&e) {
                    AppError::invalid_field(
                        "supplier_code",
                        "unknown_supplier",
                        format!("no supplier with code '{}'", input.supplier_code),
                    )
                } else {
                    storage_error("Failed to create order", e)
                }
            })?;

        timer.observe_duration();
        record_entity_write("purchase_order", "create");

        info!(order_id = %order.order_id, number = %order.number, "Purchase order created");

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<PurchaseOrder>, AppError> {
        let timer = QueryTimer::start("get_order");

        let sql = format!(
            r#"
            SELECT {} FROM purchase_orders o
            JOIN suppliers s ON s.supplier_id = o.supplier_id
            WHERE o.order_id = $1
            "#,
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get order", e))?;

        timer.observe_duration();

        Ok(order)
    }

    /// One page of orders plus the total matching count. `today` anchors the
    /// date bucket, if one is set.
    #[instrument(skip(self, filter), fields(bucket = ?filter.bucket))]
    pub async fn list_orders(
        &self,
        filter: &ListOrdersFilter,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PurchaseOrder>, i64), AppError> {
        let (from, to) = match filter.bucket {
            Some(bucket) => match bucket.followup_range(today) {
                Some(range) => (range.from, range.to),
                None => return Ok((Vec::new(), 0)),
            },
            None => (None, None),
        };
        let active_only = filter.bucket.is_some();

        let timer = QueryTimer::start("list_orders");

        let status = filter.status.map(|s| s.as_str());
        let search = search_pattern(&filter.search);

        let count_sql = format!(
            "SELECT COUNT(*) FROM purchase_orders o JOIN suppliers s ON s.supplier_id = o.supplier_id {}",
            ORDER_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(&filter.supplier_code)
            .bind(&filter.warehouse)
            .bind(from)
            .bind(to)
            .bind(active_only)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count orders", e))?;

        let sql = format!(
            r#"
            SELECT {} FROM purchase_orders o
            JOIN suppliers s ON s.supplier_id = o.supplier_id
            {}
            ORDER BY {}
            LIMIT $8 OFFSET $9
            "#,
            ORDER_COLUMNS,
            ORDER_FILTER,
            filter.ordering.to_sql()
        );
        let orders = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .bind(status)
            .bind(&filter.supplier_code)
            .bind(&filter.warehouse)
            .bind(from)
            .bind(to)
            .bind(active_only)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list orders", e))?;

        timer.observe_duration();

        Ok((orders, total))
    }

    /// Apply `input` if the stored status is still `expected_status`.
    ///
    /// Returns `None` when the order is gone or its status moved underneath
    /// the caller.
    #[instrument(skip(self, input), fields(order_id = %order_id))]
    pub async fn update_order(
        &self,
        order_id: Uuid,
        expected_status: OrderStatus,
        input: &UpdatePurchaseOrder,
    ) -> Result<Option<PurchaseOrder>, AppError> {
        let supplier_id = match &input.supplier_code {
            Some(code) => Some(self.supplier_id_for_code("supplier_code", code).await?),
            None => None,
        };

        let timer = QueryTimer::start("update_order");

        let sql = format!(
            r#"
            WITH o AS (
                UPDATE purchase_orders
                SET issue_date = COALESCE($3, issue_date),
                    supplier_id = COALESCE($4, supplier_id),
                    items_count = COALESCE($5, items_count),
                    followup_date = COALESCE($6, followup_date),
                    warehouse = COALESCE($7, warehouse),
                    status = COALESCE($8, status),
                    updated_utc = NOW()
                WHERE order_id = $1 AND status = $2
                RETURNING *
            )
            SELECT {} FROM o JOIN suppliers s ON s.supplier_id = o.supplier_id
            "#,
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .bind(order_id)
            .bind(expected_status.as_str())
            .bind(input.issue_date)
            .bind(supplier_id)
            .bind(input.items_count)
            .bind(input.followup_date)
            .bind(&input.warehouse)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update order", e))?;

        timer.observe_duration();
        if let Some(order) = &order {
            record_entity_write("purchase_order", "update");
            info!(number = %order.number, status = %order.status, "Purchase order updated");
        }

        Ok(order)
    }

    /// Number of delivery receipts linked to the order.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn linked_receipts(&self, order_id: Uuid) -> Result<i64, AppError> {
        let timer = QueryTimer::start("linked_receipts");

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM delivery_receipts WHERE purchase_order_id = $1")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to count linked receipts", e))?;

        timer.observe_duration();

        Ok(total)
    }

    /// Receipts linked to the order keep existing with the link cleared.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<bool, AppError> {
        let timer = QueryTimer::start("delete_order");

        let result = sqlx::query("DELETE FROM purchase_orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete order", e))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            record_entity_write("purchase_order", "delete");
            info!("Purchase order deleted");
        }

        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Delivery Receipt Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(cargo_number = %input.cargo_number))]
    pub async fn create_delivery(
        &self,
        input: &CreateDeliveryReceipt,
    ) -> Result<DeliveryReceipt, AppError> {
        let timer = QueryTimer::start("create_delivery");

        let supplier_id = self
            .supplier_id_for_code("supplier_code", &input.supplier_code)
            .await?;

        let sql = format!(
            r#"
            WITH d AS (
                INSERT INTO delivery_receipts
                    (receipt_id, cargo_number, manifest_date, supplier_id, invoice_number, issue_date,
                     manifest_time, entry_time, exit_time, status, purchase_order_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            SELECT {} FROM d
            JOIN suppliers s ON s.supplier_id = d.supplier_id
            LEFT JOIN purchase_orders o ON o.order_id = d.purchase_order_id
            "#,
            RECEIPT_COLUMNS
        );
        let receipt = sqlx::query_as::<_, DeliveryReceipt>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.cargo_number)
            .bind(input.manifest_date)
            .bind(supplier_id)
            .bind(&input.invoice_number)
            .bind(input.issue_date)
            .bind(input.manifest_time)
            .bind(input.entry_time)
            .bind(input.exit_time)
            .bind(input.status.as_str())
            .bind(input.purchase_order_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::invalid_field(
                        "purchase_order_id",
                        "unknown_order",
                        "referenced purchase order does not exist",
                    )
                } else {
                    storage_error("Failed to create delivery receipt", e)
                }
            })?;

        timer.observe_duration();
        record_entity_write("delivery_receipt", "create");

        info!(receipt_id = %receipt.receipt_id, supplier = %receipt.supplier_code, "Delivery receipt created");

        Ok(receipt)
    }

    #[instrument(skip(self), fields(receipt_id = %receipt_id))]
    pub async fn get_delivery(&self, receipt_id: Uuid) -> Result<Option<DeliveryReceipt>, AppError> {
        let timer = QueryTimer::start("get_delivery");

        let sql = format!(
            r#"
            SELECT {} FROM delivery_receipts d
            JOIN suppliers s ON s.supplier_id = d.supplier_id
            LEFT JOIN purchase_orders o ON o.order_id = d.purchase_order_id
            WHERE d.receipt_id = $1
            "#,
            RECEIPT_COLUMNS
        );
        let receipt = sqlx::query_as::<_, DeliveryReceipt>(&sql)
            .bind(receipt_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get delivery receipt", e))?;

        timer.observe_duration();

        Ok(receipt)
    }

    #[instrument(skip(self, filter))]
    pub async fn list_deliveries(
        &self,
        filter: &ListDeliveriesFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DeliveryReceipt>, i64), AppError> {
        let timer = QueryTimer::start("list_deliveries");

        let status = filter.status.map(|s| s.as_str());
        let search = search_pattern(&filter.search);

        let count_sql = format!(
            "SELECT COUNT(*) FROM delivery_receipts d JOIN suppliers s ON s.supplier_id = d.supplier_id {}",
            RECEIPT_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(&filter.supplier_code)
            .bind(filter.purchase_order_id)
            .bind(filter.manifest_date)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to count delivery receipts", e))?;

        let sql = format!(
            r#"
            SELECT {} FROM delivery_receipts d
            JOIN suppliers s ON s.supplier_id = d.supplier_id
            LEFT JOIN purchase_orders o ON o.order_id = d.purchase_order_id
            {}
            ORDER BY {}
            LIMIT $6 OFFSET $7
            "#,
            RECEIPT_COLUMNS,
            RECEIPT_FILTER,
            filter.ordering.to_sql()
        );
        let receipts = sqlx::query_as::<_, DeliveryReceipt>(&sql)
            .bind(status)
            .bind(&filter.supplier_code)
            .bind(filter.purchase_order_id)
            .bind(filter.manifest_date)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list delivery receipts", e))?;

        timer.observe_duration();

        Ok((receipts, total))
    }

    /// Same contract as [`Database::update_order`].
    #[instrument(skip(self, input), fields(receipt_id = %receipt_id))]
    pub async fn update_delivery(
        &self,
        receipt_id: Uuid,
        expected_status: ReceiptStatus,
        input: &UpdateDeliveryReceipt,
    ) -> Result<Option<DeliveryReceipt>, AppError> {
        let timer = QueryTimer::start("update_delivery");

        let sql = format!(
            r#"
            WITH d AS (
                UPDATE delivery_receipts
                SET manifest_time = COALESCE($3, manifest_time),
                    entry_time = COALESCE($4, entry_time),
                    exit_time = COALESCE($5, exit_time),
                    status = COALESCE($6, status)
                WHERE receipt_id = $1 AND status = $2
                RETURNING *
            )
            SELECT {} FROM d
            JOIN suppliers s ON s.supplier_id = d.supplier_id
            LEFT JOIN purchase_orders o ON o.order_id = d.purchase_order_id
            "#,
            RECEIPT_COLUMNS
        );
        let receipt = sqlx::query_as::<_, DeliveryReceipt>(&sql)
            .bind(receipt_id)
            .bind(expected_status.as_str())
            .bind(input.manifest_time)
            .bind(input.entry_time)
            .bind(input.exit_time)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to update delivery receipt", e))?;

        timer.observe_duration();
        if receipt.is_some() {
            record_entity_write("delivery_receipt", "update");
        }

        Ok(receipt)
    }

    // -------------------------------------------------------------------------
    // Dashboard Inputs
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn active_order_schedules(&self) -> Result<Vec<OrderSchedule>, AppError> {
        let timer = QueryTimer::start("active_order_schedules");

        let schedules = sqlx::query_as::<_, OrderSchedule>(
            r#"
            SELECT followup_date, status
            FROM purchase_orders
            WHERE status IN ('PENDING', 'PARTIAL')
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to load active orders", e))?;

        timer.observe_duration();

        Ok(schedules)
    }

    #[instrument(skip(self))]
    pub async fn receipts_on(&self, manifest_date: NaiveDate) -> Result<Vec<ReceiptSnapshot>, AppError> {
        let timer = QueryTimer::start("receipts_on");

        let receipts = sqlx::query_as::<_, ReceiptSnapshot>(
            "SELECT manifest_date, status FROM delivery_receipts WHERE manifest_date = $1",
        )
        .bind(manifest_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to load delivery receipts", e))?;

        timer.observe_duration();

        Ok(receipts)
    }
}
