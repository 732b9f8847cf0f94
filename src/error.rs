use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unmapped attack name: {0:?}")]
    UnmappedLabel(String),

    #[error("schema mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: String, got: String },

    #[error("numerical failure: {0}")]
    Numerical(String),

    #[error("data source error: {0}")]
    DataSource(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

pub type Result<T> = std::result::Result<T, Error>;
