use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use jotter_auth::{hash_password, issue_token, verify_password};
use jotter_db::StoreError;
use jotter_types::api::{ApiResponse, LoginRequest, LoginResponse, LoginUser, RegisterRequest};

use crate::error::require;
use crate::{ApiError, AppState, run_blocking};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    // Validate input
    require("email", &req.email)?;
    require("username", &req.username)?;
    require("password", &req.password)?;
    if !is_plausible_email(&req.email) {
        return Err(ApiError::Validation("email is not a valid address".into()));
    }

    // Hash and insert off the runtime; uniqueness is enforced by the store.
    let users = state.users.clone();
    let username = req.username.clone();
    let user_id = run_blocking(move || {
        let password_hash = hash_password(&req.password)?;
        Ok(users.create_user(&req.email, &req.username, &password_hash)?)
    })
    .await?;

    info!("Registered user {} ({})", user_id, username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("user created")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    require("email", &req.email)?;
    require("password", &req.password)?;

    let users = state.users.clone();
    let user = run_blocking(move || {
        let user = match users.find_by_email(&req.email) {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                warn!("Login attempt for unknown email");
                return Err(ApiError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        // Verify password
        if !verify_password(&user.password, &req.password) {
            warn!("Failed login for user {}", user.id);
            return Err(ApiError::InvalidCredentials);
        }

        Ok(user)
    })
    .await?;

    let token = issue_token(&state.auth, user.id)?;

    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            email: user.email,
            username: user.username,
        },
    }))
}

/// One `@` with something on both sides and a dot in the domain.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
