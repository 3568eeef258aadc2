//! Realtime WebSocket Handler

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::{ClientCommand, RealtimeEvent};
use tokio::time::Duration;

use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /api/realtime/ws
pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();
    let registry = state.registry.clone();
    let mut handle = registry.connect();
    let conn_id = handle.id;

    tracing::info!(conn_id = %conn_id, "Realtime WS connected");

    let ready = RealtimeEvent::Ready {
        connection_id: conn_id,
    };
    if send_message(&mut sink, &ready).await.is_err() {
        registry.disconnect(conn_id);
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = handle.rx.recv() => {
                match event {
                    Some(event) => {
                        if send_message(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    // 被注册表移除
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(cmd) => {
                                let topic = cmd.topic();
                                if cmd.is_subscribe() {
                                    registry.join(conn_id, topic);
                                } else {
                                    registry.leave(conn_id, topic);
                                }
                            }
                            Err(e) => {
                                tracing::debug!(conn_id = %conn_id, error = %e, "Invalid realtime command");
                                let msg = RealtimeEvent::Error {
                                    message: format!("Invalid command: {}", e),
                                };
                                if send_message(&mut sink, &msg).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    registry.disconnect(conn_id);
    tracing::info!(conn_id = %conn_id, "Realtime WS disconnected");
}

async fn send_message<S>(sink: &mut S, msg: &RealtimeEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
