use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::rest::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStreamQuery {
    pub driver_id: Option<Uuid>,
}

pub async fn ws_handler(
    ApiQuery(query): ApiQuery<LocationStreamQuery>,
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.driver_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, driver_filter: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();
    let mut locations = BroadcastStream::new(state.location_events_tx.subscribe());

    info!(driver_id = ?driver_filter, "location stream client connected");

    let send_task = tokio::spawn(async move {
        while let Some(event) = locations.next().await {
            let location = match event {
                Ok(location) => location,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "location stream client lagged");
                    continue;
                }
            };

            if driver_filter.is_some_and(|driver_id| driver_id != location.driver_id) {
                continue;
            }

            let json = match serde_json::to_string(&location) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize location for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("location stream client disconnected");
}
