use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid octal permissions: {0:?}")]
    InvalidPermissions(String),
}
