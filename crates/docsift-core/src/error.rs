use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid feature bucket: {0}")]
    InvalidFeatureBucket(String),

    #[error("Invalid decision: {0}")]
    InvalidDecision(String),
}

pub type Result<T> = std::result::Result<T, Error>;
