//! Centralized error types for Vaani.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can end a single request.
///
/// None of these are fatal to the process; each one is scoped to the request
/// that produced it.
#[derive(Error, Debug)]
pub enum VaaniError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Graph query failed: {0}")]
    Query(String),
}

/// Result type for Vaani operations.
pub type VaaniResult<T> = Result<T, VaaniError>;

impl VaaniError {
    /// Create a malformed input error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Text that is safe to show to an end user.
    ///
    /// Store details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput(reason) => {
                format!("🤔 I couldn't read that question ({}). Try something shorter, like \"List ISRO satellites\".", reason)
            }
            Self::StoreUnavailable(_) | Self::Query(_) => {
                "🔧 Sorry, I couldn't reach my space knowledge base just now. Please try again in a moment.".to_string()
            }
        }
    }

    /// Whether this error came from the graph store.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Query(_))
    }
}

impl From<StoreError> for VaaniError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => Self::StoreUnavailable(detail),
            StoreError::Query(detail) => Self::Query(detail),
        }
    }
}
