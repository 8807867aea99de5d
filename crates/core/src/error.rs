use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiftError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("partition inconsistency in {context}: expected {expected}, found {actual}")]
    PartitionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid cluster interchange: {0}")]
    InvalidInterchange(&'static str),
    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SiftError>;

impl From<anyhow::Error> for SiftError {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(value.to_string())
    }
}
