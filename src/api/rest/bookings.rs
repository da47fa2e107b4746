use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::extract::{ApiJson, ApiPath};
use crate::engine::lifecycle::{self, NewBooking};
use crate::error::AppError;
use crate::models::booking::BookingView;
use crate::models::driver::DriverSummary;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/book-ambulance", post(book_ambulance))
        .route("/api/booking/:id", get(get_booking))
        .route("/api/booking/:id/status", put(update_status))
        .route("/api/booking/:id/assign-driver", put(assign_driver))
        .route("/api/booking/:id/complete", put(complete_booking))
        .route("/api/user-bookings/:user_id", get(user_bookings))
        .route("/api/active-bookings", get(active_bookings))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAmbulanceRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub pickup_address: String,
    pub booking_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ambulance_type: String,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDriverRequest {
    pub driver_id: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingCreatedResponse {
    success: bool,
    message: &'static str,
    booking_id: Uuid,
    driver: Option<DriverSummary>,
}

#[derive(Serialize)]
struct BookingResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    booking: BookingView,
}

#[derive(Serialize)]
struct BookingsResponse {
    success: bool,
    bookings: Vec<BookingView>,
}

impl BookingResponse {
    fn new(booking: BookingView, message: Option<&'static str>) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            booking,
        })
    }
}

async fn book_ambulance(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<BookAmbulanceRequest>,
) -> (StatusCode, Json<BookingCreatedResponse>) {
    let (booking, driver) = lifecycle::create_booking(
        &state,
        NewBooking {
            patient_name: payload.patient_name,
            contact_number: payload.contact_number,
            pickup_address: payload.pickup_address,
            booking_date_time: payload.booking_date_time,
            ambulance_type: payload.ambulance_type,
            user_id: payload.user_id,
        },
    );

    (
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            success: true,
            message: "Booking successful!",
            booking_id: booking.id,
            driver: driver.map(|driver| driver.summary()),
        }),
    )
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = lifecycle::get_booking(&state, id)?;
    Ok(BookingResponse::new(booking, None))
}

/// Unwraps a booking update body; a missing booking wins over a bad body.
fn body_for_booking<T>(
    state: &AppState,
    id: Uuid,
    body: Result<ApiJson<T>, AppError>,
) -> Result<T, AppError> {
    match body {
        Ok(ApiJson(payload)) => Ok(payload),
        Err(err) => {
            lifecycle::ensure_booking(state, id)?;
            Err(err)
        }
    }
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    body: Result<ApiJson<UpdateStatusRequest>, AppError>,
) -> Result<Json<BookingResponse>, AppError> {
    let payload = body_for_booking(&state, id, body)?;
    let booking = lifecycle::set_status(&state, id, payload.status)?;
    Ok(BookingResponse::new(booking, Some("Booking status updated")))
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    body: Result<ApiJson<AssignDriverRequest>, AppError>,
) -> Result<Json<BookingResponse>, AppError> {
    let payload = body_for_booking(&state, id, body)?;
    let booking = lifecycle::assign_driver(&state, id, payload.driver_id)?;
    Ok(BookingResponse::new(
        booking,
        Some("Driver assigned successfully"),
    ))
}

async fn complete_booking(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = lifecycle::complete_booking(&state, id)?;
    Ok(BookingResponse::new(
        booking,
        Some("Booking completed successfully"),
    ))
}

async fn user_bookings(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Json<BookingsResponse> {
    Json(BookingsResponse {
        success: true,
        bookings: lifecycle::list_bookings_for_user(&state, user_id),
    })
}

async fn active_bookings(State(state): State<Arc<AppState>>) -> Json<BookingsResponse> {
    Json(BookingsResponse {
        success: true,
        bookings: lifecycle::list_active_bookings(&state),
    })
}
