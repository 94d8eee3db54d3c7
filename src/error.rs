use thiserror::Error;

/// Errors that can occur when setting up or running a k-means calculation.
#[derive(Debug, Error)]
pub enum KMeansError {
    /// One of the calculation parameters is out of its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The passed samples do not match the announced shape
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// The worker pool for the calculation could not be started
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError)
}

pub type Result<T> = std::result::Result<T, KMeansError>;
