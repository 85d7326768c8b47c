use serde::{Deserialize, Serialize};

/// Failure taxonomy for the inventory transaction service
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("a product named '{0}' already exists")]
    DuplicateName(String),

    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("sale {0} not found")]
    SaleNotFound(i64),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    /// Negative success: an update where no field actually differed
    #[error("no changes detected")]
    NoChange,

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Flat machine-readable mirror of the taxonomy, for callers that branch on
/// error class rather than display text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    DuplicateName,
    NotFound,
    InsufficientStock,
    NoChange,
    Storage,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::DuplicateName(_) => ErrorKind::DuplicateName,
            LedgerError::ProductNotFound(_) | LedgerError::SaleNotFound(_) => ErrorKind::NotFound,
            LedgerError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            LedgerError::NoChange => ErrorKind::NoChange,
            LedgerError::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
