use std::sync::Arc;

use shared::models::game_session::GameSession;
use shared::models::user::PublicUser;
use shared::protocol::{ServerEvent, ServerMessage};
use shared::services::errors::user_service_errors::UserServiceError;
use shared::services::game_session_service::GameSessionService;
use shared::services::scheduler_service::SchedulerService;
use shared::services::user_service::UserService;

use crate::error::GameFlowError;
use crate::registry::{ConnectionId, ConnectionRegistry};

/// Owns the lifecycle of two-player game sessions and relays scoring.
///
/// Session state machine, keyed by `(status, game_status)`:
/// `(pending, pending)` on invite → `(active, accepted)` on accept →
/// `(completed, completed)` on completion. Decline, cancel, auto-decline and
/// participant disconnect remove the session instead of transitioning it.
/// Every transition re-reads session state at action time; delivery order
/// between the two participants is never assumed.
pub struct GameCoordinator {
    registry: Arc<ConnectionRegistry>,
    sessions: GameSessionService,
    users: UserService,
    scheduler: SchedulerService,
}

impl GameCoordinator {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        sessions: GameSessionService,
        users: UserService,
        scheduler: SchedulerService,
    ) -> Self {
        GameCoordinator {
            registry,
            sessions,
            users,
            scheduler,
        }
    }

    /// Invite `opponent_id`. Both participants must be free; the transactional
    /// create backs the pre-checks up, so a concurrent second create from the
    /// same user loses cleanly instead of producing two open sessions.
    pub async fn create_game(
        &self,
        _connection_id: ConnectionId,
        user_id: &str,
        opponent_id: &str,
    ) -> Result<(), GameFlowError> {
        if self.sessions.open_session_for_user(user_id).await?.is_some() {
            return Err(GameFlowError::AlreadyInGame);
        }

        let opponent = self.public_profile(opponent_id).await?;
        if opponent.is_some()
            && self
                .sessions
                .open_session_for_user(opponent_id)
                .await?
                .is_some()
        {
            return Err(GameFlowError::OpponentBusy);
        }

        let session = self.sessions.create_session(user_id, opponent_id).await?;
        tracing::info!(
            "Game {} created by user {} with opponent {}",
            session.session_id,
            user_id,
            opponent_id
        );

        let requester = self
            .public_profile(user_id)
            .await?
            .ok_or_else(|| GameFlowError::Service(format!("Requester {} not found", user_id)))?;

        self.registry.notify_user(
            opponent_id,
            &ServerMessage::from(ServerEvent::GameInvite {
                session_id: session.session_id.clone(),
                from_user: requester,
            }),
        );
        self.registry.notify_user(
            user_id,
            &ServerMessage::from(ServerEvent::GameWaiting {
                session_id: session.session_id.clone(),
                waiting: opponent,
            }),
        );

        self.scheduler.schedule_auto_decline(&session).await?;
        Ok(())
    }

    pub async fn accept_game(
        &self,
        connection_id: ConnectionId,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), GameFlowError> {
        let session = self
            .sessions
            .get_session(session_id)
            .await?
            .ok_or(GameFlowError::SessionNotFound)?;

        if session.player2_id.as_deref() != Some(user_id) {
            return Err(GameFlowError::NotAuthorizedToAccept);
        }

        let session = self.sessions.accept_session(session_id).await?;
        tracing::info!("Game {} accepted by user {}", session.session_id, user_id);

        let accepted = ServerMessage::from(ServerEvent::GameAccepted {
            session_id: session.session_id.clone(),
        });
        self.registry.notify_user(&session.player1_id, &accepted);
        self.registry.send_to(&connection_id, accepted);
        Ok(())
    }

    /// No-op when the session is already gone; the auto-decline job or a
    /// disconnect may have cleaned it up in the meantime.
    pub async fn decline_game(
        &self,
        _connection_id: ConnectionId,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), GameFlowError> {
        let Some(session) = self.sessions.get_session(session_id).await? else {
            return Ok(());
        };

        if session.player2_id.as_deref() != Some(user_id) {
            return Err(GameFlowError::NotAuthorizedToDecline);
        }

        if !self.sessions.delete_session(&session).await? {
            return Ok(());
        }
        tracing::info!("Game {} declined by user {}", session.session_id, user_id);

        self.registry.notify_user(
            &session.player1_id,
            &ServerMessage::from(ServerEvent::GameDeclined {
                session_id: session.session_id.clone(),
            }),
        );
        Ok(())
    }

    /// Caller-initiated withdrawal. Without an explicit id, resolves the
    /// caller's own open session; nothing to cancel is a silent no-op.
    pub async fn cancel_game(
        &self,
        _connection_id: ConnectionId,
        user_id: &str,
        session_id: Option<&str>,
    ) -> Result<(), GameFlowError> {
        let session = match session_id {
            Some(session_id) => self.sessions.get_session(session_id).await?,
            None => self.sessions.open_session_for_user(user_id).await?,
        };
        let Some(session) = session else {
            return Ok(());
        };

        if !self.sessions.delete_session(&session).await? {
            return Ok(());
        }
        tracing::info!("Game {} cancelled by user {}", session.session_id, user_id);

        self.notify_both_players(
            &session,
            ServerEvent::GameCancelled {
                session_id: session.session_id.clone(),
                when: None,
            },
        );
        Ok(())
    }

    pub async fn complete_game(
        &self,
        _connection_id: ConnectionId,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), GameFlowError> {
        let session = self
            .sessions
            .get_session(session_id)
            .await?
            .ok_or(GameFlowError::SessionNotFound)?;

        if !session.is_participant(user_id) {
            return Err(GameFlowError::NotAuthorizedToEnd);
        }

        self.sessions.complete_session(&session).await?;
        tracing::info!("Game {} completed by user {}", session.session_id, user_id);

        self.notify_both_players(
            &session,
            ServerEvent::GameCompleted {
                session_id: session.session_id.clone(),
            },
        );
        Ok(())
    }

    /// Record one answer and relay both running scores. `is_last` marks the
    /// caller's side finished through an atomic field update, so the two
    /// final submissions may arrive in either order. The session status is
    /// left alone; the deferred game-over job owns that transition.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit_answer(
        &self,
        _connection_id: ConnectionId,
        user_id: &str,
        session_id: &str,
        word_id: &str,
        sentence_id: &str,
        is_correct: bool,
        is_last: bool,
    ) -> Result<(), GameFlowError> {
        let session = self
            .sessions
            .get_session(session_id)
            .await?
            .ok_or(GameFlowError::SessionNotFound)?;

        self.sessions
            .record_answer(session_id, user_id, word_id, sentence_id, is_correct)
            .await?;

        let was_finished = session.is_finished();
        let session = match (is_last, session.slot_of(user_id)) {
            (true, Some(slot)) => {
                let updated = self.sessions.mark_player_finished(session_id, slot).await?;
                tracing::info!(
                    "User {} has finished the game session {}",
                    user_id,
                    session_id
                );
                updated
            }
            _ => session,
        };

        let (user1_score, user2_score) = self.sessions.correct_answer_counts(&session).await?;
        let is_finished = session.is_finished();

        self.notify_both_players(
            &session,
            ServerEvent::AnswerResult {
                session_id: session.session_id.clone(),
                user1_score,
                user2_score,
                is_finished,
            },
        );

        if is_finished && !was_finished {
            self.scheduler.schedule_game_over(&session).await?;
        }
        Ok(())
    }

    /// Hub-side delivery of the auto-decline job's event: the invitation
    /// expired and the session is already gone, so only player1 is told.
    pub async fn auto_decline_notify(&self, session_id: &str, player1_id: &str) {
        tracing::info!("Game {} auto declined", session_id);
        self.registry.notify_user(
            player1_id,
            &ServerMessage::from(ServerEvent::GameAutoDeclined {
                session_id: session_id.to_string(),
            }),
        );
    }

    /// Disconnect hook: an open session involving the user is deleted, not
    /// completed, and both players hear `game_cancelled` exactly once.
    pub async fn cleanup_after_disconnect(&self, user_id: &str) -> Result<(), GameFlowError> {
        let Some(session) = self.sessions.open_session_for_user(user_id).await? else {
            return Ok(());
        };

        if !self.sessions.delete_session(&session).await? {
            return Ok(());
        }
        tracing::info!(
            "Game session {} deleted due to user {} disconnection",
            session.session_id,
            user_id
        );

        self.notify_both_players(
            &session,
            ServerEvent::GameCancelled {
                session_id: session.session_id.clone(),
                when: Some("onClose".to_string()),
            },
        );
        Ok(())
    }

    fn notify_both_players(&self, session: &GameSession, event: ServerEvent) {
        let message = ServerMessage::from(event);
        self.registry.notify_user(&session.player1_id, &message);
        if let Some(player2_id) = session.player2_id.as_deref() {
            self.registry.notify_user(player2_id, &message);
        }
    }

    async fn public_profile(&self, user_id: &str) -> Result<Option<PublicUser>, GameFlowError> {
        match self.users.get_user_by_id(user_id).await {
            Ok(user) => Ok(Some(user.public_profile())),
            Err(UserServiceError::UserNotFound) => Ok(None),
            Err(e) => Err(GameFlowError::from(e)),
        }
    }
}
