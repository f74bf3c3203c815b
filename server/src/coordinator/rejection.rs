use thiserror::Error;

use shared::types::ValidationErrors;

use crate::database::StoreError;
use crate::token::{TokenError, TokenKind};

/// Why a coordinator refused or failed a request.
///
/// The first group are caller mistakes and carry the exact message the client
/// shows. `StoreFault` and `EncodeFault` are server faults; their detail is
/// for the log only.
#[derive(Debug, Error)]
pub enum Rejection {
    /// Cookie absent.
    #[error("{} token not found.", label(.0))]
    MissingToken(TokenKind),

    /// Cookie present but bad signature, malformed, wrong kind or expired.
    #[error("Invalid {} token.", .0)]
    InvalidToken(TokenKind),

    #[error("{0}")]
    BadRequest(String),

    /// Field-level credential problems, reported per field.
    #[error("request failed validation")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("store fault: {0}")]
    StoreFault(#[from] StoreError),

    #[error("token fault: {0}")]
    EncodeFault(TokenError),

    /// A fault whose message is safe and useful to show.
    #[error("{0}")]
    Internal(&'static str),
}

fn label(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::Auth => "Auth",
        TokenKind::State => "State",
        TokenKind::Invite => "Invite",
    }
}

impl Rejection {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Rejection::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Rejection::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Rejection::NotFound(message.into())
    }

    /// True for server-side faults that must be logged and hidden.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Rejection::StoreFault(_) | Rejection::EncodeFault(_) | Rejection::Internal(_)
        )
    }

    /// Message for the `{error}` body. Faults get a fixed text.
    pub fn public_message(&self) -> String {
        match self {
            Rejection::StoreFault(_) | Rejection::EncodeFault(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Turn a store lookup of the target itself into a rejection: a missing row
/// is the caller's problem. Lookups of ancestors use plain `?`, which makes
/// a missing parent a fault.
pub trait OrNotFound<T> {
    fn or_not_found(self, message: &str) -> Result<T, Rejection>;
}

impl<T> OrNotFound<T> for Result<T, StoreError> {
    fn or_not_found(self, message: &str) -> Result<T, Rejection> {
        self.map_err(|e| match e {
            StoreError::NotFound => Rejection::not_found(message),
            other => Rejection::StoreFault(other),
        })
    }
}
