use parallel_timeline_protocol::WindowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("min_range_ms ({min}) must not exceed max_range_ms ({max})")]
    RangeBounds { min: f64, max: f64 },
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("invalid default view: {0}")]
    Window(#[from] WindowError),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}
