use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::driver::Driver;
use crate::models::location::Location;
use crate::models::payment::Payment;
use crate::models::user::User;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub users: DashMap<Uuid, User>,
    /// Unique handles (`username:<name>` and `email:<address>`) reserved by registered users.
    pub user_handles: DashMap<String, Uuid>,
    pub drivers: DashMap<Uuid, Driver>,
    pub bookings: DashMap<Uuid, Booking>,
    pub payments: DashMap<Uuid, Payment>,
    /// Location samples per driver, in the order they were recorded.
    pub locations: DashMap<Uuid, Vec<Location>>,
    pub location_events_tx: broadcast::Sender<Location>,
    pub bcrypt_cost: u32,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, bcrypt_cost: u32) -> Self {
        let (location_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            users: DashMap::new(),
            user_handles: DashMap::new(),
            drivers: DashMap::new(),
            bookings: DashMap::new(),
            payments: DashMap::new(),
            locations: DashMap::new(),
            location_events_tx,
            bcrypt_cost,
            metrics: Metrics::new(),
        }
    }
}
