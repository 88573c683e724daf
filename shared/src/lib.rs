//! Shared types and domain logic for the inventory management platform.
//!
//! This crate contains the data model and the pure computation cores (stock
//! ledger math, demand forecasting, alert decisions) shared between the
//! backend services and their tests. Nothing in here performs I/O.

pub mod alerting;
pub mod forecast;
pub mod models;
pub mod stock;
pub mod types;

pub use models::*;
pub use types::*;
