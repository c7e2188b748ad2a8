pub mod api;
pub mod config;
pub mod convert;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod store;

pub use error::{Result, ServiceError};
