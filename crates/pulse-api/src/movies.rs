use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use pulse_db::models::MovieRow;
use pulse_types::{CatalogEntry, Category, ReleaseType};

use crate::auth::AppState;

pub async fn list_movies(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .list_movies()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let movies: Vec<CatalogEntry> = rows.into_iter().filter_map(row_to_entry).collect();
    Ok(Json(movies))
}

fn row_to_entry(row: MovieRow) -> Option<CatalogEntry> {
    let parsed = row
        .category
        .parse::<Category>()
        .and_then(|category| Ok((category, row.release_type.parse::<ReleaseType>()?)));

    match parsed {
        Ok((category, release_type)) => Some(CatalogEntry {
            id: row.id,
            title: row.title,
            genre: row.genre,
            category,
            director: row.director,
            release_type,
            base_rating: row.base_rating as f32,
        }),
        Err(e) => {
            warn!("Skipping movie {}: {}", row.id, e);
            None
        }
    }
}
