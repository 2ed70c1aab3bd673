use std::str::FromStr;
use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info};
use uuid::Uuid;

use pulse_db::Database;
use pulse_db::models::UserRow;
use pulse_db::queries::NewUser;
use pulse_types::Role;
use pulse_types::api::{LoginRequest, SignupRequest, UserResponse};
use pulse_types::validation::{validate_email, validate_name, validate_password};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Validate input
    validate_name(&req.name)
        .and_then(|_| validate_email(&req.email))
        .and_then(|_| validate_password(&req.password))
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    // Check if the email is taken
    if state
        .db
        .get_user_by_email(&req.email)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .is_some()
    {
        return Err(StatusCode::CONFLICT);
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .to_string();

    let user_id = req.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let name = req.name.trim();

    state
        .db
        .create_user(&NewUser {
            id: &user_id,
            name,
            email: &req.email,
            password_hash: &password_hash,
            role: req.role.as_str(),
        })
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!(user_id = %user_id, role = %req.role, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user_id,
            name: name.to_string(),
            email: req.email,
            role: req.role,
            photo: None,
            notifications_enabled: true,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .db
        .get_user_by_email(&req.email)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Verify password
    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(Json(user_response(user)?))
}

fn user_response(user: UserRow) -> Result<UserResponse, StatusCode> {
    let role = Role::from_str(&user.role).map_err(|e| {
        error!("Stored user {} has a bad role: {}", user.id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role,
        photo: user.photo,
        notifications_enabled: user.notifications_enabled,
    })
}
