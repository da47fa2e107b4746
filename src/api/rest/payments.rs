use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::rest::extract::ApiJson;
use crate::models::payment::Payment;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/payment", post(record_payment))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRequest {
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
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponse {
    success: bool,
    message: &'static str,
    payment_id: Uuid,
}

/// Stores the payment as submitted. The referenced booking is not checked.
async fn record_payment(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<PaymentRequest>,
) -> (StatusCode, Json<PaymentResponse>) {
    let payment = Payment {
        id: Uuid::new_v4(),
        booking_id: payload.booking_id,
        full_name: payload.full_name,
        email: payload.email,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        card_name: payload.card_name,
        card_number: payload.card_number,
        exp_month: payload.exp_month,
        exp_year: payload.exp_year,
        cvv: payload.cvv,
        amount: payload.amount,
        paid_at: Utc::now(),
    };

    let payment_id = payment.id;
    info!(
        payment_id = %payment_id,
        booking_id = ?payment.booking_id,
        amount = ?payment.amount,
        "payment recorded"
    );
    state.payments.insert(payment_id, payment);

    (
        StatusCode::CREATED,
        Json(PaymentResponse {
            success: true,
            message: "Payment processed successfully",
            payment_id,
        }),
    )
}
