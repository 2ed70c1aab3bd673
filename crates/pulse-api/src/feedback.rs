use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use pulse_db::models::FeedbackRow;
use pulse_types::api::{StatusResponse, UpdateFeedbackRequest};
use pulse_types::{FeedbackRecord, Rating, Sentiment};

use crate::auth::AppState;

pub async fn list_feedback(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let rows = state.db.list_feedback().map_err(|e| {
        error!("Failed to list feedback: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let records: Vec<FeedbackRecord> = rows.into_iter().filter_map(row_to_record).collect();
    Ok(Json(records))
}

pub async fn create_feedback(
    State(state): State<AppState>,
    Json(record): Json<FeedbackRecord>,
) -> Result<impl IntoResponse, StatusCode> {
    // Run blocking DB insert off the async runtime
    let db = state.clone();
    let id = record.id.clone();
    tokio::task::spawn_blocking(move || db.db.insert_feedback(&record))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("Failed to insert feedback {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    debug!(id = %id, "feedback stored");
    Ok((StatusCode::CREATED, Json(StatusResponse::success())))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFeedbackRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let rating = Rating::new(req.rating).map_err(|_| StatusCode::BAD_REQUEST)?;
    // The client's sentiment is ignored; it always follows the rating.
    let sentiment = Sentiment::classify(rating);

    let updated = state
        .db
        .update_feedback(&id, i64::from(rating.get()), &req.text, sentiment.as_str())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !updated {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(StatusResponse::success()))
}

/// Idempotent: deleting a missing id still succeeds.
pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let removed = state
        .db
        .delete_feedback(&id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !removed {
        debug!(id = %id, "delete of unknown feedback ignored");
    }
    Ok(Json(StatusResponse::success()))
}

fn row_to_record(row: FeedbackRow) -> Option<FeedbackRecord> {
    let created_at = match DateTime::parse_from_rfc3339(&row.created_at) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            warn!("Skipping feedback {} with bad timestamp: {}", row.id, e);
            return None;
        }
    };
    let rating = match Rating::new(row.rating) {
        Ok(r) => r,
        Err(e) => {
            warn!("Skipping feedback {}: {}", row.id, e);
            return None;
        }
    };

    Some(FeedbackRecord::new(
        row.id,
        row.movie_id,
        row.user_id,
        row.user_name,
        rating,
        row.text,
        created_at,
    ))
}
