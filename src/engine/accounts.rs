//! User and driver registration and login.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::{availability, credentials};
use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::user::User;
use crate::state::AppState;

const DUPLICATE_USER: &str = "Username or email already exists";
const INVALID_DRIVER_CREDENTIALS: &str = "Invalid credentials";
const INVALID_USER_CREDENTIALS: &str = "Invalid credentials. Please check your username and email.";

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub gender: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewDriver {
    pub name: String,
    pub vehicle_number: String,
    pub contact: String,
    pub password: String,
}

fn username_handle(username: &str) -> String {
    format!("username:{username}")
}

fn email_handle(email: &str) -> String {
    format!("email:{email}")
}

/// Registers a user, reserving the username and email atomically.
pub fn register_user(state: &AppState, request: NewUser) -> Result<User, AppError> {
    let user = User {
        id: Uuid::new_v4(),
        first_name: request.first_name,
        last_name: request.last_name,
        username: request.username,
        email: request.email,
        mobile: request.mobile,
        gender: request.gender,
        created_at: Utc::now(),
    };

    let username_key = username_handle(&user.username);
    let email_key = email_handle(&user.email);

    reserve_handle(state, &username_key, user.id)?;
    if let Err(err) = reserve_handle(state, &email_key, user.id) {
        state.user_handles.remove(&username_key);
        return Err(err);
    }

    state.users.insert(user.id, user.clone());
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

fn reserve_handle(state: &AppState, key: &str, user_id: Uuid) -> Result<(), AppError> {
    match state.user_handles.entry(key.to_string()) {
        Entry::Occupied(_) => {
            warn!(handle = %key, "registration rejected: handle taken");
            Err(AppError::Validation(DUPLICATE_USER.to_string()))
        }
        Entry::Vacant(slot) => {
            slot.insert(user_id);
            Ok(())
        }
    }
}

/// Finds a user matching either the username or the email.
pub fn login_user(
    state: &AppState,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<User, AppError> {
    let handles = [
        username.filter(|name| !name.is_empty()).map(username_handle),
        email.filter(|email| !email.is_empty()).map(email_handle),
    ];

    let user = handles
        .into_iter()
        .flatten()
        .find_map(|handle| {
            let user_id = *state.user_handles.get(&handle)?;
            state.users.get(&user_id).map(|entry| entry.value().clone())
        })
        .ok_or_else(|| {
            warn!(username = ?username, email = ?email, "user login failed");
            AppError::Unauthorized(INVALID_USER_CREDENTIALS.to_string())
        })?;

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

pub async fn register_driver(state: &AppState, request: NewDriver) -> Result<Driver, AppError> {
    let password_hash = credentials::hash_password(request.password, state.bcrypt_cost).await?;

    let driver = Driver {
        id: Uuid::new_v4(),
        name: request.name,
        vehicle_number: request.vehicle_number,
        contact: request.contact,
        password_hash: Some(password_hash),
        available: true,
        created_at: Utc::now(),
    };

    state.drivers.insert(driver.id, driver.clone());
    availability::refresh_gauge(state);

    info!(driver_id = %driver.id, "driver registered");
    Ok(driver)
}

pub async fn login_driver(
    state: &AppState,
    driver_id: Uuid,
    password: String,
) -> Result<Driver, AppError> {
    let invalid = || AppError::Unauthorized(INVALID_DRIVER_CREDENTIALS.to_string());

    let driver = state
        .drivers
        .get(&driver_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| {
            warn!(driver_id = %driver_id, "driver login for unknown driver");
            invalid()
        })?;

    let Some(hash) = driver.password_hash.clone() else {
        warn!(driver_id = %driver_id, "driver has no credential");
        return Err(invalid());
    };

    if !credentials::verify_password(password, hash).await? {
        warn!(driver_id = %driver_id, "driver login with wrong password");
        return Err(invalid());
    }

    info!(driver_id = %driver_id, "driver logged in");
    Ok(driver)
}

/// All drivers, oldest registration first.
pub fn list_drivers(state: &AppState) -> Vec<Driver> {
    let mut drivers: Vec<Driver> = state
        .drivers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    drivers.sort_by_key(|driver| driver.created_at);
    drivers
}

/// Replaces every driver with the three sample drivers.
pub fn setup_sample_drivers(state: &AppState) -> Vec<Driver> {
    const SAMPLES: [(&str, &str, &str); 3] = [
        ("John Raj", "TN 05 AB 1234", "+91 9876543210"),
        ("Kumar Selvaraj", "TN 05 CD 5678", "+91 9876543211"),
        ("Ravi Shankar", "TN 05 EF 9012", "+91 9876543212"),
    ];

    state.drivers.clear();

    let base = Utc::now();
    let drivers: Vec<Driver> = SAMPLES
        .iter()
        .enumerate()
        .map(|(offset, (name, vehicle_number, contact))| Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            vehicle_number: vehicle_number.to_string(),
            contact: contact.to_string(),
            password_hash: None,
            available: true,
            created_at: base + chrono::Duration::milliseconds(offset as i64),
        })
        .collect();

    for driver in &drivers {
        state.drivers.insert(driver.id, driver.clone());
    }
    availability::refresh_gauge(state);

    info!(count = drivers.len(), "sample drivers installed");
    drivers
}
