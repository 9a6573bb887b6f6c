use thiserror::Error;

// Unified error type for andermix

#[derive(Error, Debug)]
pub enum AmError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("map evaluation failed: {0}")]
    EvalError(String),
}
