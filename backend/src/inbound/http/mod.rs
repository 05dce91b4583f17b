//! HTTP inbound adapter exposing the weather endpoints.

pub mod app;
pub mod error;
pub mod health;
pub mod state;
pub mod status;
pub mod weather;

pub use app::{AppDependencies, build_app};
pub use error::{ApiError, ApiResult};
