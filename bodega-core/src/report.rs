use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LedgerError, LedgerResult};

/// Shell-facing outcome of a mutating operation: the success flag and
/// display message the reporting shell branches on, plus a machine-readable
/// kind so tests and callers never have to parse the message text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub ok: bool,
    pub message: String,
    pub kind: Option<ErrorKind>,
}

impl Report {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            kind: None,
        }
    }

    pub fn failure(err: &LedgerError) -> Self {
        Self {
            ok: false,
            message: err.to_string(),
            kind: Some(err.kind()),
        }
    }

    pub fn from_result<T>(result: &LedgerResult<T>, success_message: &str) -> Self {
        match result {
            Ok(_) => Self::success(success_message),
            Err(err) => Self::failure(err),
        }
    }
}
