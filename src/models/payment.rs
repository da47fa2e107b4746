use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A recorded payment. Card fields are stored as submitted; the type has no
/// `Serialize` or `Debug` impl so they never reach a response or a log line.
#[derive(Clone)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub card_name: String,
    pub card_number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvv: String,
    pub amount: Option<f64>,
    pub paid_at: DateTime<Utc>,
}
