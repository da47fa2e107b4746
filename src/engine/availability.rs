//! Driver availability flag.
//!
//! Only the booking lifecycle calls into this module. Claiming is a
//! compare-and-swap on the flag under the map's per-entry lock, so two
//! concurrent bookings can never both take the same driver.

use uuid::Uuid;

use crate::models::driver::Driver;
use crate::state::AppState;

/// Claims the first available driver, oldest registration first.
///
/// Candidates are snapshotted without holding any lock; each one is then
/// re-checked under its entry lock and skipped if another request won it.
pub fn claim_first_available(state: &AppState) -> Option<Driver> {
    let mut candidates: Vec<(chrono::DateTime<chrono::Utc>, Uuid)> = state
        .drivers
        .iter()
        .filter(|entry| entry.value().available)
        .map(|entry| (entry.value().created_at, *entry.key()))
        .collect();
    candidates.sort();

    let claimed = candidates
        .into_iter()
        .find_map(|(_, driver_id)| try_claim(state, driver_id));

    refresh_gauge(state);
    claimed
}

fn try_claim(state: &AppState, driver_id: Uuid) -> Option<Driver> {
    let mut driver = state.drivers.get_mut(&driver_id)?;
    if !driver.available {
        return None;
    }

    driver.available = false;
    Some(driver.clone())
}

/// Flags a driver as busy regardless of its current state.
///
/// Returns `false` when the id does not resolve to a driver.
pub fn mark_unavailable(state: &AppState, driver_id: Uuid) -> bool {
    let found = set_available(state, driver_id, false);
    refresh_gauge(state);
    found
}

/// Flags a driver as free again.
///
/// Returns `false` when the id does not resolve to a driver.
pub fn release(state: &AppState, driver_id: Uuid) -> bool {
    let found = set_available(state, driver_id, true);
    refresh_gauge(state);
    found
}

fn set_available(state: &AppState, driver_id: Uuid, available: bool) -> bool {
    match state.drivers.get_mut(&driver_id) {
        Some(mut driver) => {
            driver.available = available;
            true
        }
        None => false,
    }
}

pub fn available_count(state: &AppState) -> usize {
    state
        .drivers
        .iter()
        .filter(|entry| entry.value().available)
        .count()
}

pub fn refresh_gauge(state: &AppState) {
    state
        .metrics
        .available_drivers
        .set(available_count(state) as i64);
}
