use thiserror::Error;

/// Input rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("please use a valid @gmail.com address")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("name must not be empty")]
    EmptyName,

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("unknown release type '{0}'")]
    UnknownReleaseType(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),
}
