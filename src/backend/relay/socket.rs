//! WebSocket transport for the relay (`GET /ws`)

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::backend::relay::engine::RelayEngine;
use crate::backend::relay::registry::ConnectionHandle;
use crate::shared::ServerEvent;

/// How long the writer gets to flush and send a close frame
const CLOSE_GRACE: Duration = Duration::from_secs(2);

pub async fn ws_handler(ws: WebSocketUpgrade, State(relay): State<RelayEngine>) -> Response {
    ws.on_upgrade(move |socket| relay_connection(socket, relay))
}

async fn next_ping(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Drain the outbound queue onto the socket and send periodic pings
///
/// Ends with a close frame once every sender for the queue is gone.
async fn write_frames(
    mut sink: SplitSink<WebSocket, WsMessage>,
    mut outbound: mpsc::Receiver<ServerEvent>,
    ping_interval: Option<Duration>,
) {
    let mut heartbeat = ping_interval.map(|period| {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        tokio::select! {
            event = outbound.recv() => {
                let Some(event) = event else { break };
                let json = match event.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("[Relay] Failed to encode outbound event: {}", e);
                        continue;
                    }
                };
                if sink.send(WsMessage::Text(json.into())).await.is_err() {
                    return; // client disconnected
                }
            }
            _ = next_ping(&mut heartbeat) => {
                if sink.send(WsMessage::Ping(Bytes::new())).await.is_err() {
                    return;
                }
            }
        }
    }

    let _ = sink.close().await;
}

/// Drive one connection until the client leaves or goes idle
///
/// Frames are read and handled one at a time by this task. A separate writer
/// task drains the outbound queue so a slow reader never blocks senders.
/// Any inbound frame, pongs included, resets the idle timer.
async fn relay_connection(socket: WebSocket, relay: RelayEngine) {
    let settings = relay.settings();
    let (handle, outbound) = ConnectionHandle::channel(settings.outbound_capacity);
    let connection_id = handle.id();
    let mut session = relay.open_session(handle);
    let (sink, mut stream) = socket.split();

    let mut writer = tokio::spawn(write_frames(sink, outbound, settings.ping_interval));

    loop {
        let next = match settings.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::info!("[Relay] Connection {} idle, closing", connection_id);
                    break;
                }
            },
            None => stream.next().await,
        };

        match next {
            Some(Ok(WsMessage::Text(text))) => {
                session.handle_frame(text.as_str()).await;
            }
            Some(Ok(WsMessage::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                Ok(text) => {
                    session.handle_frame(text).await;
                }
                Err(_) => {
                    tracing::warn!(
                        "[Relay] Discarding non-UTF-8 binary frame on {}",
                        connection_id
                    );
                }
            },
            Some(Ok(WsMessage::Close(_))) | None => break,
            Some(Ok(_)) => {} // ping/pong
            Some(Err(e)) => {
                tracing::debug!("[Relay] Connection {} read error: {}", connection_id, e);
                break;
            }
        }
    }

    // Dropping the session releases the last sender, so the writer can
    // finish the close handshake on its own.
    session.close();
    drop(session);
    if tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        tracing::debug!("[Relay] Writer for {} did not finish, aborting", connection_id);
        writer.abort();
    }
}
