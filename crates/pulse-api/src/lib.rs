//! HTTP handlers for the CinemaPulse remote collaborator.

pub mod auth;
pub mod feedback;
pub mod movies;

use axum::{
    Router,
    routing::{get, post, put},
};

pub use auth::{AppState, AppStateInner};

/// All `/api` routes, with state applied.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/movies", get(movies::list_movies))
        .route(
            "/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route(
            "/feedback/{id}",
            put(feedback::update_feedback).delete(feedback::delete_feedback),
        )
        .with_state(state);

    Router::new().nest("/api", api)
}
