use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};

use crate::state::{AppState, StreamEvent};

pub async fn market_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_market(socket, state))
}

async fn stream_market(mut socket: WebSocket, state: AppState) {
    let mut snapshots = state.market().subscribe();

    let current = snapshots.borrow_and_update().clone();
    if send_event(&mut socket, StreamEvent::Connected(&current))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => return,
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if send_event(&mut socket, StreamEvent::MarketUpdate(&snapshot)).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: StreamEvent<'_>) -> Result<(), ()> {
    let payload = event_json(&event)?;
    socket.send(Message::Text(payload)).await.map_err(|_| ())
}

fn event_json(event: &StreamEvent<'_>) -> Result<String, ()> {
    serde_json::to_string(event).map_err(|error| {
        tracing::warn!(%error, "failed to encode market stream event");
    })
}

