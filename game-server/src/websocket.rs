use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::session::{ConnectionId, SessionManager};
use crate::tools::ToolHandler;
use game_types::{ClientMessage, ServerMessage};

/// One websocket connection is one player. Tool calls arrive as JSON text
/// frames; replies flow back over an mpsc channel so the tool handler never
/// touches the socket directly. Disconnecting tears down the session, which
/// resets the match.
pub async fn handle_connection(
    websocket: WebSocket,
    session_manager: Arc<SessionManager>,
    tool_handler: Arc<ToolHandler>,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let session = session_manager.create_session(connection_id).await;
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let incoming_handler = {
        let session = session.clone();
        let tool_handler = tool_handler.clone();

        async move {
            while let Some(result) = ws_receiver.next().await {
                let msg = match result {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                };

                if msg.is_close() {
                    break;
                }
                if !msg.is_text() {
                    continue;
                }
                let Ok(text) = msg.to_str() else {
                    continue;
                };

                let responses = match serde_json::from_str::<ClientMessage>(text) {
                    Ok(client_message) => {
                        tool_handler.handle_message(&session, client_message).await
                    }
                    Err(e) => vec![ServerMessage::Error {
                        message: format!("Invalid JSON message: {}", e),
                    }],
                };

                for response in responses {
                    if tx.send(response).is_err() {
                        return;
                    }
                }
            }
        }
    };

    let outgoing_handler = async move {
        while let Some(message) = rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Connection {} disconnected", connection_id);
    tool_handler.abandon_active_round(&session).await;
    session_manager.remove_session(connection_id).await;
}
