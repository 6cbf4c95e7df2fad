//! Time-blocking planner core: recurring items that roll forward on
//! completion, and rollups of logged 15-minute blocks into work-hour totals.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use application::ServiceError;
pub use domain::RepositoryError;
