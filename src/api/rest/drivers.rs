use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::extract::ApiJson;
use crate::engine::accounts::{self, NewDriver};
use crate::error::AppError;
use crate::models::driver::{Driver, DriverProfile};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/register-driver", post(register_driver))
        .route("/api/driver-login", post(driver_login))
        .route("/api/drivers", get(list_drivers))
        .route("/api/setup-drivers", post(setup_drivers))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDriverRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub contact: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLoginRequest {
    pub driver_id: Uuid,
    pub password: String,
}

#[derive(Serialize)]
struct DriverProfileResponse {
    success: bool,
    message: &'static str,
    driver: DriverProfile,
}

#[derive(Serialize)]
struct DriversResponse {
    success: bool,
    drivers: Vec<Driver>,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

async fn register_driver(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterDriverRequest>,
) -> Result<(StatusCode, Json<DriverProfileResponse>), AppError> {
    if payload.password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }

    let driver = accounts::register_driver(
        &state,
        NewDriver {
            name: payload.name,
            vehicle_number: payload.vehicle_number,
            contact: payload.contact,
            password: payload.password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DriverProfileResponse {
            success: true,
            message: "Driver registered successfully",
            driver: driver.profile(),
        }),
    ))
}

async fn driver_login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<DriverLoginRequest>,
) -> Result<Json<DriverProfileResponse>, AppError> {
    let driver = accounts::login_driver(&state, payload.driver_id, payload.password).await?;

    Ok(Json(DriverProfileResponse {
        success: true,
        message: "Login successful",
        driver: driver.profile(),
    }))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<DriversResponse> {
    Json(DriversResponse {
        success: true,
        drivers: accounts::list_drivers(&state),
    })
}

async fn setup_drivers(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    accounts::setup_sample_drivers(&state);

    Json(MessageResponse {
        success: true,
        message: "Drivers added successfully",
    })
}
