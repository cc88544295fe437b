//! HTTP surface: the game WebSocket and a read-only leaderboard.

use axum::{
    Json, Router,
    body::Body,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

use crate::{Flow, GameHub, GameRepository, Outbound, UserId, user_id_from_headers};

/// Router serving the game on `GET /ws`.
pub fn game_router(hub: GameHub) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(hub)
}

/// Router serving `GET /leaderboard` as JSON.
pub fn leaderboard_router(repository: GameRepository) -> Router {
    Router::new()
        .route("/leaderboard", get(leaderboard_handler))
        .with_state(repository)
}

/// Full application: game, leaderboard, and request logging.
pub fn app(hub: GameHub, repository: GameRepository) -> Router {
    game_router(hub)
        .merge(leaderboard_router(repository))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(hub): State<GameHub>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = user_id_from_headers(&headers);
    ws.on_upgrade(move |socket| handle_socket(socket, hub, user_id))
}

/// Drives one connection from accept to close.
#[instrument(skip(socket, hub))]
async fn handle_socket(socket: WebSocket, hub: GameHub, user_id: Option<UserId>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let connection = hub.connect(user_id).await;
    let id = connection.id;
    let mut outbound = connection.outbound;

    // Drains the outbound queue; exits on a close request, a dead socket,
    // or once the session has dropped every sender.
    let send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            match frame {
                Outbound::Text(text) => {
                    if ws_sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = ws_sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if hub.handle_message(id, text.as_str()).await == Flow::Closed {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!(connection_id = %id, "Client closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(connection_id = %id, error = %e, "WebSocket receive failed");
                break;
            }
        }
    }

    hub.disconnect(id).await;
    if let Err(e) = send_task.await {
        error!(connection_id = %id, error = %e, "Writer task failed");
    }
    info!(connection_id = %id, "WebSocket connection terminated");
}

/// Leaderboard as JSON.
async fn leaderboard_handler(State(repository): State<GameRepository>) -> impl IntoResponse {
    match tokio::task::spawn_blocking(move || repository.leaderboard()).await {
        Ok(Ok(entries)) => Json(entries).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Leaderboard query failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            error!(error = %e, "Leaderboard task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
