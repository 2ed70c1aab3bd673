use serde::{Deserialize, Serialize};

use crate::api::{LoginRequest, SignupRequest};
use crate::models::{FeedbackRecord, Rating};

/// Mutations queued for the remote mirror after the local state changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MirrorEvent {
    /// A new review was submitted locally
    FeedbackCreated(FeedbackRecord),

    /// A review's rating/text was revised
    FeedbackUpdated {
        id: String,
        rating: Rating,
        text: String,
    },

    /// A review was deleted (by its author or an admin)
    FeedbackDeleted { id: String },

    /// A new account was registered
    SignedUp(SignupRequest),

    /// An existing account signed in
    SignedIn(LoginRequest),
}

impl MirrorEvent {
    /// Short name for logs; never includes payload data such as passwords.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FeedbackCreated(_) => "feedback_created",
            Self::FeedbackUpdated { .. } => "feedback_updated",
            Self::FeedbackDeleted { .. } => "feedback_deleted",
            Self::SignedUp(_) => "signed_up",
            Self::SignedIn(_) => "signed_in",
        }
    }
}
