//! Append-only driver location feed.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::location::Location;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct LocationSample {
    pub driver_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub booking_id: Option<Uuid>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Appends a sample and publishes it to live subscribers.
pub fn record_location(state: &AppState, sample: LocationSample) -> Location {
    let location = Location {
        id: Uuid::new_v4(),
        driver_id: sample.driver_id,
        latitude: sample.latitude,
        longitude: sample.longitude,
        timestamp: sample.timestamp.unwrap_or_else(Utc::now),
        booking_id: sample.booking_id,
    };

    state
        .locations
        .entry(location.driver_id)
        .or_default()
        .push(location.clone());

    state.metrics.location_samples_total.inc();
    let _ = state.location_events_tx.send(location.clone());

    debug!(
        driver_id = %location.driver_id,
        booking_id = ?location.booking_id,
        "location recorded"
    );

    location
}

/// Latest sample for a driver. Equal timestamps resolve to the most recently recorded one.
pub fn current_location(state: &AppState, driver_id: Uuid) -> Result<Location, AppError> {
    state
        .locations
        .get(&driver_id)
        .and_then(|samples| samples.iter().max_by_key(|sample| sample.timestamp).cloned())
        .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
}

/// Every sample tagged with the booking, oldest first.
pub fn location_history(state: &AppState, booking_id: Uuid) -> Vec<Location> {
    let mut history: Vec<Location> = state
        .locations
        .iter()
        .flat_map(|entry| {
            entry
                .value()
                .iter()
                .filter(|sample| sample.booking_id == Some(booking_id))
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect();
    history.sort_by_key(|sample| sample.timestamp);
    history
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    fn sample(driver_id: Uuid, booking_id: Option<Uuid>, offset_secs: i64) -> LocationSample {
        LocationSample {
            driver_id,
            latitude: 13.0827,
            longitude: 80.2707 + offset_secs as f64 * 0.001,
            booking_id,
            timestamp: Some(Utc::now() + Duration::seconds(offset_secs)),
        }
    }

    #[test]
    fn current_location_is_latest_timestamp_not_latest_insert() {
        let state = AppState::new(16, 4);
        let driver = Uuid::new_v4();

        record_location(&state, sample(driver, None, 30));
        let newest = record_location(&state, sample(driver, None, 60));
        record_location(&state, sample(driver, None, 10));

        let current = current_location(&state, driver).unwrap();
        assert_eq!(current, newest);
    }

    #[test]
    fn ties_resolve_to_most_recent_insert() {
        let state = AppState::new(16, 4);
        let driver = Uuid::new_v4();
        let at = Utc::now();

        let mut first = sample(driver, None, 0);
        first.timestamp = Some(at);
        let mut second = sample(driver, None, 0);
        second.timestamp = Some(at);
        second.latitude = 12.0;

        record_location(&state, first);
        let second = record_location(&state, second);

        assert_eq!(current_location(&state, driver).unwrap().id, second.id);
    }

    #[test]
    fn current_location_for_unknown_driver_is_not_found() {
        let state = AppState::new(16, 4);

        let result = current_location(&state, Uuid::new_v4());

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn history_is_oldest_first_across_drivers() {
        let state = AppState::new(16, 4);
        let booking = Uuid::new_v4();
        let first_driver = Uuid::new_v4();
        let second_driver = Uuid::new_v4();

        record_location(&state, sample(first_driver, Some(booking), 20));
        record_location(&state, sample(second_driver, Some(booking), 5));
        record_location(&state, sample(first_driver, Some(booking), 40));
        record_location(&state, sample(first_driver, None, 1));
        record_location(&state, sample(first_driver, Some(Uuid::new_v4()), 2));

        let history = location_history(&state, booking);

        assert_eq!(history.len(), 3);
        assert!(history
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
        assert_eq!(history[0].driver_id, second_driver);
    }

    #[test]
    fn samples_are_never_overwritten() {
        let state = AppState::new(16, 4);
        let driver = Uuid::new_v4();

        for offset in 0..5 {
            record_location(&state, sample(driver, None, offset));
        }

        assert_eq!(state.locations.get(&driver).unwrap().len(), 5);
        assert_eq!(state.metrics.location_samples_total.get(), 5);
    }

    #[tokio::test]
    async fn recorded_samples_are_broadcast() {
        let state = AppState::new(16, 4);
        let mut rx = state.location_events_tx.subscribe();
        let driver = Uuid::new_v4();

        let recorded = record_location(&state, sample(driver, None, 0));

        let received = rx.recv().await.unwrap();
        assert_eq!(received, recorded);
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let state = AppState::new(16, 4);
        let before = Utc::now();

        let mut input = sample(Uuid::new_v4(), None, 0);
        input.timestamp = None;
        let recorded = record_location(&state, input);

        assert!(recorded.timestamp >= before);
    }
}
