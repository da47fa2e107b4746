use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::extract::{ApiJson, ApiPath};
use crate::engine::feed::{self, LocationSample};
use crate::error::AppError;
use crate::models::location::Location;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/update-location", post(update_location))
        .route("/api/driver-location/:driver_id", get(driver_location))
        .route("/api/booking-locations/:booking_id", get(booking_locations))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub driver_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub booking_id: Option<Uuid>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct LocationResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    location: Location,
}

#[derive(Serialize)]
struct LocationsResponse {
    success: bool,
    locations: Vec<Location>,
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<UpdateLocationRequest>,
) -> (StatusCode, Json<LocationResponse>) {
    let location = feed::record_location(
        &state,
        LocationSample {
            driver_id: payload.driver_id,
            latitude: payload.latitude,
            longitude: payload.longitude,
            booking_id: payload.booking_id,
            timestamp: payload.timestamp,
        },
    );

    (
        StatusCode::CREATED,
        Json(LocationResponse {
            success: true,
            message: Some("Location updated successfully"),
            location,
        }),
    )
}

async fn driver_location(
    State(state): State<Arc<AppState>>,
    ApiPath(driver_id): ApiPath<Uuid>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = feed::current_location(&state, driver_id)?;

    Ok(Json(LocationResponse {
        success: true,
        message: None,
        location,
    }))
}

async fn booking_locations(
    State(state): State<Arc<AppState>>,
    ApiPath(booking_id): ApiPath<Uuid>,
) -> Json<LocationsResponse> {
    Json(LocationsResponse {
        success: true,
        locations: feed::location_history(&state, booking_id),
    })
}
