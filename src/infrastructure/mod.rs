pub mod cache;
pub mod config;
pub mod database;
pub mod repositories;
pub mod service_initializer;

pub use config::AppConfig;
pub use database::DatabaseManager;
pub use service_initializer::{Services, initialize_services};
