use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

/// Which side of the session a user occupies. Used for the atomic
/// finished-flag updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSlot {
    Player1,
    Player2,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSession {
    pub session_id: String,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub status: SessionStatus,
    pub game_status: GameStatus,
    pub is_player1_finished: bool,
    pub is_player2_finished: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(player1_id: &str, player2_id: &str) -> Self {
        let now = Utc::now();
        GameSession {
            session_id: Uuid::new_v4().to_string(),
            player1_id: player1_id.to_string(),
            player2_id: Some(player2_id.to_string()),
            status: SessionStatus::Pending,
            game_status: GameStatus::Pending,
            is_player1_finished: false,
            is_player2_finished: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// A session still occupying both players: invited or in play.
    pub fn is_open(&self) -> bool {
        matches!(self.status, SessionStatus::Pending | SessionStatus::Active)
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.player1_id == user_id || self.player2_id.as_deref() == Some(user_id)
    }

    pub fn slot_of(&self, user_id: &str) -> Option<PlayerSlot> {
        if self.player1_id == user_id {
            Some(PlayerSlot::Player1)
        } else if self.player2_id.as_deref() == Some(user_id) {
            Some(PlayerSlot::Player2)
        } else {
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.is_player1_finished && self.is_player2_finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_pending() {
        let session = GameSession::new("p1", "p2");

        assert!(!session.session_id.is_empty());
        assert_eq!(session.player1_id, "p1");
        assert_eq!(session.player2_id.as_deref(), Some("p2"));
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.game_status, GameStatus::Pending);
        assert!(!session.is_player1_finished);
        assert!(!session.is_player2_finished);
    }

    #[test]
    fn test_session_id_uniqueness() {
        let a = GameSession::new("p1", "p2");
        let b = GameSession::new("p1", "p2");

        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_is_open() {
        let mut session = GameSession::new("p1", "p2");
        assert!(session.is_open());

        session.status = SessionStatus::Active;
        assert!(session.is_open());

        session.status = SessionStatus::Completed;
        assert!(!session.is_open());
    }

    #[test]
    fn test_participants_and_slots() {
        let session = GameSession::new("p1", "p2");

        assert!(session.is_participant("p1"));
        assert!(session.is_participant("p2"));
        assert!(!session.is_participant("p3"));

        assert_eq!(session.slot_of("p1"), Some(PlayerSlot::Player1));
        assert_eq!(session.slot_of("p2"), Some(PlayerSlot::Player2));
        assert_eq!(session.slot_of("p3"), None);
    }

    #[test]
    fn test_is_finished_requires_both_flags() {
        let mut session = GameSession::new("p1", "p2");
        assert!(!session.is_finished());

        session.is_player1_finished = true;
        assert!(!session.is_finished());

        session.is_player2_finished = true;
        assert!(session.is_finished());
    }

    #[test]
    fn test_status_serialization_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&GameStatus::Accepted).unwrap(),
            "\"accepted\""
        );

        let session = GameSession::new("p1", "p2");
        let serialized = serde_json::to_string(&session).unwrap();
        assert!(serialized.contains("\"status\":\"pending\""));
        assert!(serialized.contains("\"game_status\":\"pending\""));

        let roundtrip: GameSession = serde_json::from_str(&serialized).unwrap();
        assert_eq!(roundtrip, session);
    }
}
