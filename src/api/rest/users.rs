use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::rest::extract::ApiJson;
use crate::engine::accounts::{self, NewUser};
use crate::error::AppError;
use crate::models::user::UserSummary;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub gender: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize)]
struct UserResponse {
    success: bool,
    message: &'static str,
    user: UserSummary,
}

async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let mut missing = Vec::new();
    if payload.username.trim().is_empty() {
        missing.push("username is required");
    }
    if payload.email.trim().is_empty() {
        missing.push("email is required");
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(missing.join(", ")));
    }

    let user = accounts::register_user(
        &state,
        NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            username: payload.username,
            email: payload.email,
            mobile: payload.mobile,
            gender: payload.gender,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: "User registered successfully",
            user: user.summary(),
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = accounts::login_user(
        &state,
        payload.username.as_deref(),
        payload.email.as_deref(),
    )?;

    Ok(Json(UserResponse {
        success: true,
        message: "Login successful",
        user: user.summary(),
    }))
}
