//! Shared CinemaPulse types.
//!
//! Models and validation used by the client core, the wire DTOs spoken with
//! the remote mirror, and the static movie catalog.

pub mod api;
pub mod catalog;
pub mod error;
pub mod events;
pub mod models;
pub mod validation;

pub use catalog::Catalog;
pub use error::ValidationError;
pub use events::MirrorEvent;
pub use models::{
    CatalogEntry, Category, FeedbackFilter, FeedbackRecord, Identity, Rating, ReleaseType, Role,
    Sentiment,
};
