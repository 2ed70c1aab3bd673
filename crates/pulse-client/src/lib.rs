//! CinemaPulse client core.
//!
//! [`App`] is the composition root: it owns the record store, the session,
//! the catalog overlay, navigation, the local snapshot and the optional
//! remote mirror. All of it runs on the caller's thread except the mirror
//! worker, which needs a tokio runtime.

pub mod app;
pub mod catalog;
pub mod cheers;
pub mod config;
pub mod error;
pub mod mirror;
pub mod navigation;
pub mod session;

pub use app::{App, Submission};
pub use catalog::{AdminRow, CatalogOverlay, CategoryFilter};
pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use mirror::{HttpMirror, MirrorError, MirrorHandle, RemoteMirror};
pub use navigation::{Access, Navigator, Page, StaticPage};
pub use session::{Action, ProfileUpdate, RolePolicy, Session};
