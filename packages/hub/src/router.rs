use std::ops::ControlFlow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use shared::protocol::{GameAction, IncomingMessage, ServerEvent, ServerMessage};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::registry::ConnectionId;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Forward outbound messages from the registry channel onto the socket.
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let Ok(json) = serde_json::to_string(&message) else {
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let connection_id = Uuid::new_v4();
    state.registry.register(connection_id, tx);
    tracing::debug!("Connection {} opened", connection_id);

    while let Some(result) = receiver.next().await {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                // Transport-level error: close this connection, leave the
                // rest of the hub alone.
                tracing::error!("Connection {} transport error: {}", connection_id, e);
                break;
            }
        };

        match message {
            Message::Text(text) => {
                if handle_message(&state, connection_id, &text)
                    .await
                    .is_break()
                {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    disconnect(&state, connection_id).await;
}

async fn handle_message(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    text: &str,
) -> ControlFlow<()> {
    let parsed = match IncomingMessage::parse(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Connection {} sent malformed payload: {}", connection_id, e);
            return ControlFlow::Break(());
        }
    };

    match parsed {
        IncomingMessage::Auth { token } => {
            state.presence.on_authenticated(connection_id, &token).await;
            ControlFlow::Continue(())
        }
        IncomingMessage::Action(action) => dispatch_action(state, connection_id, action).await,
        IncomingMessage::UnknownAction(action) => {
            tracing::warn!("Unknown action: {}", action);
            ControlFlow::Continue(())
        }
        IncomingMessage::Unrecognized => ControlFlow::Continue(()),
    }
}

async fn dispatch_action(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    action: GameAction,
) -> ControlFlow<()> {
    // Loopback-originated and deliberately unauthenticated: the delayed-task
    // runner reports an expired invitation it already removed.
    if let GameAction::AutoDeclineGame {
        session_id,
        player1_id,
    } = &action
    {
        state
            .coordinator
            .auto_decline_notify(session_id, player1_id)
            .await;
        broadcast_presence_refresh(state);
        return ControlFlow::Continue(());
    }

    let Some(user_id) = state.registry.bound_user(&connection_id) else {
        tracing::warn!(
            "Connection {} attempted a game action before authenticating",
            connection_id
        );
        return ControlFlow::Break(());
    };

    let is_answer = matches!(
        action,
        GameAction::CorrectAnswer { .. } | GameAction::InCorrectAnswer { .. }
    );

    let result = match action {
        GameAction::CreateGame { opponent_id } => {
            state
                .coordinator
                .create_game(connection_id, &user_id, &opponent_id)
                .await
        }
        GameAction::AcceptGame { session_id } => {
            state
                .coordinator
                .accept_game(connection_id, &user_id, &session_id)
                .await
        }
        GameAction::DeclineGame { session_id } => {
            state
                .coordinator
                .decline_game(connection_id, &user_id, &session_id)
                .await
        }
        GameAction::CancelPendingGames { session_id } => {
            state
                .coordinator
                .cancel_game(connection_id, &user_id, session_id.as_deref())
                .await
        }
        GameAction::CompleteGame { session_id } => {
            state
                .coordinator
                .complete_game(connection_id, &user_id, &session_id)
                .await
        }
        GameAction::CorrectAnswer {
            session_id,
            word_id,
            sentence_id,
            is_last,
        } => {
            state
                .coordinator
                .submit_answer(
                    connection_id,
                    &user_id,
                    &session_id,
                    &word_id,
                    &sentence_id,
                    true,
                    is_last,
                )
                .await
        }
        GameAction::InCorrectAnswer {
            session_id,
            word_id,
            sentence_id,
            is_last,
        } => {
            state
                .coordinator
                .submit_answer(
                    connection_id,
                    &user_id,
                    &session_id,
                    &word_id,
                    &sentence_id,
                    false,
                    is_last,
                )
                .await
        }
        GameAction::AutoDeclineGame { .. } => Ok(()),
    };

    if let Err(e) = result {
        match e.advisory_message() {
            Some(message) => state
                .registry
                .send_to(&connection_id, ServerMessage::error(message)),
            None => tracing::error!("Game action failed for user {}: {}", user_id, e),
        }
    }

    if !is_answer {
        broadcast_presence_refresh(state);
    }
    ControlFlow::Continue(())
}

/// Blanket `status-update` after every non-answer action; clients use it to
/// refresh their lobby list.
fn broadcast_presence_refresh(state: &Arc<AppState>) {
    state
        .registry
        .broadcast(&ServerMessage::from(ServerEvent::StatusUpdate { user: None }));
}

async fn disconnect(state: &Arc<AppState>, connection_id: ConnectionId) {
    tracing::info!("Connection {} has disconnected", connection_id);
    if let Some(user_id) = state.presence.on_disconnected(connection_id).await {
        if let Err(e) = state.coordinator.cleanup_after_disconnect(&user_id).await {
            tracing::error!("Disconnect cleanup failed for user {}: {}", user_id, e);
        }
    }
}
