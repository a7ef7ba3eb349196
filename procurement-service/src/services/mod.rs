//! Services module for procurement-service.

pub mod clock;
pub mod database;
pub mod metrics;

pub use clock::{Clock, FixedClock, SystemClock};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_entity_write, record_rejection, QueryTimer};
