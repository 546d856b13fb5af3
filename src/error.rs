// error.rs - Engine error type
//
// Everything the host can hand us that might be unusable ends up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed flight config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid flight config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("host object is missing `{0}`")]
    MissingHostFn(&'static str),
}

pub type Result<T> = std::result::Result<T, EngineError>;
