use thiserror::Error;

/// Error types for the kmeanspp-rs library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// The input data cannot be clustered as given (e.g. vectors of differing length)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value is out of range (e.g. k or restarts is 0)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested operation is not implemented
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call fit() first.")]
    NotFitted,
}
