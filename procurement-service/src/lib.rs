//! procurement-service: purchase orders, delivery receipts and the due-date dashboard.

pub mod config;
pub mod dtos;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod reporting;
pub mod services;
pub mod startup;
