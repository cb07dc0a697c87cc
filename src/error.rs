use thiserror::Error;

/// Errors reported before or around a training run.
///
/// The numeric kernels themselves never return errors; shape problems inside
/// a step are programming errors and panic in `Matrix`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("shape mismatch: {what} is {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("malformed IDX file: {0}")]
    Idx(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
