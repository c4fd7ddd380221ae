//! WebSocket Connection Handler
//!
//! The socket is server-to-client only. Each connection gets a bounded outbound
//! queue drained by a writer task; the read loop only watches for the peer
//! going away.
//!
//! The handler holds a sender for the whole life of the socket. When a reconnect
//! replaces this session in the registry the queue stays open, and the socket
//! is only closed by its own peer or a failed write.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Extension, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use crate::domain::{Connection, Frame, UserIdentity};
use crate::presentation::middleware::AuthUser;
use crate::startup::AppState;

/// WebSocket upgrade handler. Authentication already ran as route middleware.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    let user = auth.identity();
    ws.on_upgrade(move |socket| handle_socket(socket, state, user))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, user: UserIdentity) {
    let settings = &state.settings.presence;
    let (connection, outbound) = Connection::channel(settings.outbound_buffer);
    let connection_id = connection.id();

    let (sink, mut stream) = socket.split();
    let mut writer = tokio::spawn(write_loop(
        sink,
        outbound,
        settings.write_timeout(),
        user.id,
        connection_id,
    ));

    state.hub.on_connect(&user, &connection).await;

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(
                            user_id = user.id,
                            connection_id = %connection_id,
                            "Connection closed by peer"
                        );
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::debug!(
                            user_id = user.id,
                            connection_id = %connection_id,
                            error = %e,
                            "WebSocket error"
                        );
                        break;
                    }
                    // Pings are answered by axum; inbound frames carry nothing
                    Some(Ok(_)) => {}
                }
            }

            _ = &mut writer => {
                tracing::debug!(
                    user_id = user.id,
                    connection_id = %connection_id,
                    "Writer stopped, closing connection"
                );
                break;
            }
        }
    }

    writer.abort();
    state.hub.on_disconnect(user.id, connection_id);
    drop(connection);
}

/// Drain the outbound queue into the socket.
///
/// Stops on the first failed or timed-out write. Dropping the queue receiver
/// then makes further pushes to this connection fail with `Closed`.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Frame>,
    write_timeout: Duration,
    user_id: i64,
    connection_id: Uuid,
) {
    while let Some(frame) = outbound.recv().await {
        match timeout(write_timeout, sink.send(Message::Text(frame.to_string().into()))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(
                    user_id = user_id,
                    connection_id = %connection_id,
                    error = %e,
                    "Socket write failed"
                );
                return;
            }
            Err(_) => {
                tracing::warn!(
                    user_id = user_id,
                    connection_id = %connection_id,
                    timeout_ms = write_timeout.as_millis() as u64,
                    "Socket write timed out"
                );
                return;
            }
        }
    }
}
