use std::sync::Arc;

use crate::models::game_answer::GameAnswer;
use crate::models::game_session::{GameSession, PlayerSlot};
use crate::repositories::game_answer_repository::GameAnswerRepository;
use crate::repositories::game_session_repository::GameSessionRepository;
use crate::services::errors::game_session_service_errors::GameSessionServiceError;

/// Session lifecycle and scoring over the durable store. All state-machine
/// decisions live in the hub's coordinator; this layer only turns them into
/// guarded store mutations.
#[derive(Clone)]
pub struct GameSessionService {
    sessions: Arc<dyn GameSessionRepository + Send + Sync>,
    answers: Arc<dyn GameAnswerRepository + Send + Sync>,
}

impl GameSessionService {
    pub fn new(
        sessions: Arc<dyn GameSessionRepository + Send + Sync>,
        answers: Arc<dyn GameAnswerRepository + Send + Sync>,
    ) -> Self {
        GameSessionService { sessions, answers }
    }

    pub async fn create_session(
        &self,
        player1_id: &str,
        player2_id: &str,
    ) -> Result<GameSession, GameSessionServiceError> {
        let session = GameSession::new(player1_id, player2_id);
        self.sessions.create_game_session(&session).await?;
        Ok(session)
    }

    pub async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<GameSession>, GameSessionServiceError> {
        self.sessions
            .get_game_session(session_id)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn accept_session(
        &self,
        session_id: &str,
    ) -> Result<GameSession, GameSessionServiceError> {
        self.sessions
            .accept_game_session(session_id)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn complete_session(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionServiceError> {
        self.sessions
            .complete_game_session(session)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn delete_session(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionServiceError> {
        self.sessions
            .delete_game_session(session)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn delete_if_still_pending(
        &self,
        session: &GameSession,
    ) -> Result<bool, GameSessionServiceError> {
        self.sessions
            .delete_if_still_pending(session)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn open_session_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<GameSession>, GameSessionServiceError> {
        self.sessions
            .find_open_session_for_user(user_id)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<GameSession>, GameSessionServiceError> {
        self.sessions
            .list_sessions_for_user(user_id)
            .await
            .map_err(GameSessionServiceError::from)
    }

    pub async fn record_answer(
        &self,
        session_id: &str,
        user_id: &str,
        word_id: &str,
        word_sentence_id: &str,
        is_correct: bool,
    ) -> Result<GameAnswer, GameSessionServiceError> {
        let answer = GameAnswer::new(session_id, user_id, word_id, word_sentence_id, is_correct);
        self.answers.create_answer(&answer).await?;
        Ok(answer)
    }

    pub async fn mark_player_finished(
        &self,
        session_id: &str,
        slot: PlayerSlot,
    ) -> Result<GameSession, GameSessionServiceError> {
        self.sessions
            .mark_player_finished(session_id, slot)
            .await
            .map_err(GameSessionServiceError::from)
    }

    /// Both players' correct-answer counts, derived per call. A missing
    /// player2 scores zero.
    pub async fn correct_answer_counts(
        &self,
        session: &GameSession,
    ) -> Result<(i64, i64), GameSessionServiceError> {
        let player1_score = self
            .answers
            .count_correct_answers(&session.session_id, &session.player1_id)
            .await?;

        let player2_score = match session.player2_id.as_deref() {
            Some(player2_id) => {
                self.answers
                    .count_correct_answers(&session.session_id, player2_id)
                    .await?
            }
            None => 0,
        };

        Ok((player1_score, player2_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::errors::game_session_repository_errors::GameSessionRepositoryError;
    use crate::repositories::game_answer_repository::MockGameAnswerRepository;
    use crate::repositories::game_session_repository::MockGameSessionRepository;

    fn service(
        sessions: MockGameSessionRepository,
        answers: MockGameAnswerRepository,
    ) -> GameSessionService {
        GameSessionService::new(Arc::new(sessions), Arc::new(answers))
    }

    #[tokio::test]
    async fn test_create_session_surfaces_active_session_constraint() {
        let mut sessions = MockGameSessionRepository::new();
        sessions
            .expect_create_game_session()
            .returning(|_| Err(GameSessionRepositoryError::ActiveSessionExists));

        let result = service(sessions, MockGameAnswerRepository::new())
            .create_session("p1", "p2")
            .await;
        assert!(matches!(
            result,
            Err(GameSessionServiceError::ActiveSessionExists)
        ));
    }

    #[tokio::test]
    async fn test_create_session_returns_new_session() {
        let mut sessions = MockGameSessionRepository::new();
        sessions.expect_create_game_session().returning(|_| Ok(()));

        let session = service(sessions, MockGameAnswerRepository::new())
            .create_session("p1", "p2")
            .await
            .unwrap();
        assert_eq!(session.player1_id, "p1");
        assert_eq!(session.player2_id.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn test_record_answer_persists_submitted_fields() {
        let mut answers = MockGameAnswerRepository::new();
        answers
            .expect_create_answer()
            .withf(|answer| {
                answer.game_session_id == "s1"
                    && answer.user_id == "u1"
                    && answer.word_id == "w1"
                    && answer.word_sentence_id == "ws1"
                    && answer.is_correct
            })
            .returning(|_| Ok(()));

        let answer = service(MockGameSessionRepository::new(), answers)
            .record_answer("s1", "u1", "w1", "ws1", true)
            .await
            .unwrap();
        assert!(answer.is_correct);
    }

    #[tokio::test]
    async fn test_correct_answer_counts_for_both_players() {
        let mut answers = MockGameAnswerRepository::new();
        answers
            .expect_count_correct_answers()
            .returning(|_, user_id| if user_id == "p1" { Ok(3) } else { Ok(4) });

        let session = GameSession::new("p1", "p2");
        let counts = service(MockGameSessionRepository::new(), answers)
            .correct_answer_counts(&session)
            .await
            .unwrap();
        assert_eq!(counts, (3, 4));
    }

    #[tokio::test]
    async fn test_correct_answer_counts_without_player2() {
        let mut answers = MockGameAnswerRepository::new();
        answers
            .expect_count_correct_answers()
            .returning(|_, _| Ok(2));

        let mut session = GameSession::new("p1", "p2");
        session.player2_id = None;
        let counts = service(MockGameSessionRepository::new(), answers)
            .correct_answer_counts(&session)
            .await
            .unwrap();
        assert_eq!(counts, (2, 0));
    }
}
