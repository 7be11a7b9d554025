use axum::{Json, extract::State, response::IntoResponse};
use tracing::{info, warn};

use evergreens_db::Database;
use evergreens_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use evergreens_types::models::{Role, User};

use crate::error::PortalError;
use crate::{AppState, blocking};

/// Exact-match credential check. Unknown email and wrong password are the
/// same failure.
pub fn authenticate(db: &Database, email: &str, password: &str) -> Result<User, PortalError> {
    let row = db
        .find_user_by_credentials(email, password)?
        .ok_or(PortalError::InvalidCredentials)?;

    let role = row
        .role
        .parse::<Role>()
        .map_err(|e| anyhow::anyhow!("user {}: role '{}': {}", row.id, row.role, e))?;

    Ok(User {
        id: row.id,
        email: row.email,
        role,
        name: row.name,
    })
}

/// Insert a new account. Role defaults to influencer; nothing is validated.
pub fn register_user(db: &Database, req: &RegisterRequest) -> Result<i64, PortalError> {
    let role = req.role.unwrap_or_default();
    db.create_user(&req.email, &req.password, &req.name, <&'static str>::from(role))?
        .ok_or(PortalError::DuplicateEmail)
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let email = req.email.clone();
    let result = blocking(&state, move |db| register_user(db, &req)).await;

    match &result {
        Ok(user_id) => info!("Registered user {} as id {}", email, user_id),
        Err(PortalError::DuplicateEmail) => warn!("Registration refused, {} already exists", email),
        Err(_) => {}
    }

    Ok(Json(RegisterResponse {
        success: true,
        user_id: result?,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let email = req.email.clone();
    let result = blocking(&state, move |db| authenticate(db, &req.email, &req.password)).await;

    match &result {
        Ok(user) => info!("User {} logged in as {}", user.id, user.role),
        Err(PortalError::InvalidCredentials) => warn!("Failed login for {}", email),
        Err(_) => {}
    }

    Ok(Json(LoginResponse {
        success: true,
        user: result?,
    }))
}
