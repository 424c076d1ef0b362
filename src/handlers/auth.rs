// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    utils::jwt::{ADMIN_ROLE, sign_jwt},
};

/// DTO for admin login.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// Exchanges the shared admin password for a bearer token.
pub async fn admin_login(
    State(config): State<Config>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.password != config.admin_password {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(
        ADMIN_ROLE,
        ADMIN_ROLE,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    tracing::info!("Admin logged in");

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "expires_in": config.jwt_expiration,
    })))
}
