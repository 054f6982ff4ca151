use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown attribute datatype: {0}")]
    UnknownDatatype(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
