pub mod alert;
pub mod auth;
pub mod forecast;
pub mod inventory;
pub mod product;
pub mod realtime;
pub mod trend;

pub use alert::AlertService;
pub use auth::AuthService;
pub use forecast::ForecastService;
pub use inventory::InventoryService;
pub use product::ProductService;
pub use realtime::AlertBroadcaster;
pub use trend::TrendService;
