//! Domain models for the inventory management platform.

mod alert;
mod product;
mod sales;
mod stock_movement;
mod trend;
mod user;

pub use alert::*;
pub use product::*;
pub use sales::*;
pub use stock_movement::*;
pub use trend::*;
pub use user::*;
