pub mod deliveries;
pub mod health;
pub mod orders;
pub mod stats;
pub mod suppliers;

pub use deliveries::{create_delivery, get_delivery, list_deliveries, update_delivery};
pub use health::{health_check, metrics_handler, readiness_check};
pub use orders::{create_order, delete_order, get_order, list_orders, update_order};
pub use stats::dashboard_stats;
pub use suppliers::{
    create_supplier, delete_supplier, get_supplier, list_suppliers, update_supplier,
};
