// crates/gcb-core/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GcbError>;

#[derive(Debug, Error)]
pub enum GcbError {
    /// Dictionary missing/unparseable at load time. Fatal.
    #[error("config error: {0}")]
    Config(String),

    /// A value failed a structural or range invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown beacon type or a pattern-length disagreement.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
