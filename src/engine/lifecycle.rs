//! Booking lifecycle: creation, driver assignment, status changes and the
//! resolved read models served to clients.
//!
//! Every status mutation after creation goes through [`apply_transition`],
//! which is also the only place that touches driver availability for an
//! existing booking.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::availability;
use crate::error::AppError;
use crate::models::booking::{Booking, BookingStatus, BookingView};
use crate::models::driver::Driver;
use crate::state::AppState;

const BOOKING_NOT_FOUND: &str = "Booking not found";

#[derive(Debug, Clone, Default)]
pub struct NewBooking {
    pub patient_name: String,
    pub contact_number: String,
    pub pickup_address: String,
    pub booking_date_time: Option<DateTime<Utc>>,
    pub ambulance_type: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Overwrite the driver reference and force the booking to `confirmed`.
    AssignDriver(Option<Uuid>),
    /// Mark `completed` and free the assigned driver.
    Complete,
    /// Overwrite the status verbatim with no side effects.
    SetStatus(BookingStatus),
}

impl Transition {
    fn label(&self) -> &'static str {
        match self {
            Transition::AssignDriver(_) => "assign_driver",
            Transition::Complete => "complete",
            Transition::SetStatus(_) => "set_status",
        }
    }
}

/// Persists a new `pending` booking, claiming the first available driver if there is one.
pub fn create_booking(state: &AppState, request: NewBooking) -> (Booking, Option<Driver>) {
    let driver = availability::claim_first_available(state);

    let booking = Booking {
        id: Uuid::new_v4(),
        patient_name: request.patient_name,
        contact_number: request.contact_number,
        pickup_address: request.pickup_address,
        booking_date_time: request.booking_date_time,
        ambulance_type: request.ambulance_type,
        status: BookingStatus::Pending,
        driver_id: driver.as_ref().map(|driver| driver.id),
        user_id: request.user_id,
        created_at: Utc::now(),
    };

    state.bookings.insert(booking.id, booking.clone());

    let outcome = if driver.is_some() { "assigned" } else { "unassigned" };
    state
        .metrics
        .bookings_created_total
        .with_label_values(&[outcome])
        .inc();

    match &driver {
        Some(driver) => info!(
            booking_id = %booking.id,
            driver_id = %driver.id,
            "booking created with driver"
        ),
        None => warn!(booking_id = %booking.id, "booking created without an available driver"),
    }

    (booking, driver)
}

/// Applies a status transition to an existing booking and returns the resolved result.
///
/// Transitions are not checked against the current status.
pub fn apply_transition(
    state: &AppState,
    booking_id: Uuid,
    transition: Transition,
) -> Result<BookingView, AppError> {
    let updated = {
        let mut booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::NotFound(BOOKING_NOT_FOUND.to_string()))?;

        match &transition {
            Transition::AssignDriver(driver_id) => {
                booking.driver_id = *driver_id;
                booking.status = BookingStatus::Confirmed;
            }
            Transition::Complete => booking.status = BookingStatus::Completed,
            Transition::SetStatus(status) => booking.status = status.clone(),
        }

        booking.clone()
    };

    match &transition {
        Transition::AssignDriver(Some(driver_id)) => {
            if availability::mark_unavailable(state, *driver_id) {
                info!(booking_id = %booking_id, driver_id = %driver_id, "driver assigned");
            } else {
                warn!(
                    booking_id = %booking_id,
                    driver_id = %driver_id,
                    "assigned driver does not exist"
                );
            }
        }
        Transition::Complete => {
            if let Some(driver_id) = updated.driver_id {
                if availability::release(state, driver_id) {
                    info!(booking_id = %booking_id, driver_id = %driver_id, "driver released");
                }
            }
            info!(booking_id = %booking_id, "booking completed");
        }
        Transition::SetStatus(status) => {
            info!(booking_id = %booking_id, status = %status, "booking status updated");
        }
        Transition::AssignDriver(None) => {
            info!(booking_id = %booking_id, "booking confirmed with driver cleared");
        }
    }

    state
        .metrics
        .booking_transitions_total
        .with_label_values(&[transition.label()])
        .inc();

    Ok(resolve(state, updated))
}

pub fn assign_driver(
    state: &AppState,
    booking_id: Uuid,
    driver_id: Option<Uuid>,
) -> Result<BookingView, AppError> {
    apply_transition(state, booking_id, Transition::AssignDriver(driver_id))
}

pub fn complete_booking(state: &AppState, booking_id: Uuid) -> Result<BookingView, AppError> {
    apply_transition(state, booking_id, Transition::Complete)
}

pub fn set_status(
    state: &AppState,
    booking_id: Uuid,
    status: impl Into<BookingStatus>,
) -> Result<BookingView, AppError> {
    apply_transition(state, booking_id, Transition::SetStatus(status.into()))
}

/// Fails with NotFound unless the booking exists.
pub fn ensure_booking(state: &AppState, booking_id: Uuid) -> Result<(), AppError> {
    if state.bookings.contains_key(&booking_id) {
        Ok(())
    } else {
        Err(AppError::NotFound(BOOKING_NOT_FOUND.to_string()))
    }
}

pub fn get_booking(state: &AppState, booking_id: Uuid) -> Result<BookingView, AppError> {
    let booking = state
        .bookings
        .get(&booking_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(BOOKING_NOT_FOUND.to_string()))?;

    Ok(resolve(state, booking))
}

/// Bookings placed by a user, newest first.
pub fn list_bookings_for_user(state: &AppState, user_id: Uuid) -> Vec<BookingView> {
    collect_newest_first(state, |booking| booking.user_id == Some(user_id))
}

/// Pending and confirmed bookings, newest first.
pub fn list_active_bookings(state: &AppState) -> Vec<BookingView> {
    collect_newest_first(state, |booking| booking.status.is_active())
}

fn collect_newest_first<F>(state: &AppState, keep: F) -> Vec<BookingView>
where
    F: Fn(&Booking) -> bool,
{
    let mut bookings: Vec<Booking> = state
        .bookings
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| entry.value().clone())
        .collect();
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    bookings
        .into_iter()
        .map(|booking| resolve(state, booking))
        .collect()
}

/// Replaces driver and user ids with their records; dangling ids resolve to `None`.
fn resolve(state: &AppState, booking: Booking) -> BookingView {
    let driver = booking
        .driver_id
        .and_then(|id| state.drivers.get(&id).map(|entry| entry.value().clone()));
    let user = booking
        .user_id
        .and_then(|id| state.users.get(&id).map(|entry| entry.value().clone()));

    BookingView {
        booking,
        driver,
        user,
    }
}
