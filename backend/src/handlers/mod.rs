//! HTTP handlers

mod alerts;
mod auth;
mod forecasts;
mod health;
mod inventory;
mod products;
mod trends;
mod ws;

pub use alerts::*;
pub use auth::*;
pub use forecasts::*;
pub use health::*;
pub use inventory::*;
pub use products::*;
pub use trends::*;
pub use ws::*;
