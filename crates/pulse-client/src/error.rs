use pulse_store::StoreError;
use pulse_types::{Role, ValidationError};
use thiserror::Error;

use crate::session::Action;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{what} '{id}' not found")]
    NotFound { what: &'static str, id: String },

    #[error("sign in required")]
    NotSignedIn,

    #[error("already signed in; sign out before switching accounts")]
    AlreadySignedIn,

    #[error("role '{role}' may not {action}")]
    Forbidden { role: Role, action: Action },

    #[error("feedback '{id}' belongs to another user")]
    NotAuthor { id: String },

    #[error("local snapshot unavailable: {0}")]
    Snapshot(StoreError),
}

impl AppError {
    pub(crate) fn feedback_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "feedback",
            id: id.to_string(),
        }
    }

    pub(crate) fn movie_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "movie",
            id: id.to_string(),
        }
    }

    /// True for failures caused by the caller's role or identity.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotSignedIn | Self::Forbidden { .. } | Self::NotAuthor { .. }
        )
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::NotFound { id } => Self::NotFound {
                what: "feedback",
                id,
            },
            other => Self::Snapshot(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
