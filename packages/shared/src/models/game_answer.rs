use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submitted quiz answer. Immutable once created; running scores are
/// derived from count queries, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameAnswer {
    pub answer_id: String,
    pub game_session_id: String,
    pub user_id: String,
    pub word_id: String,
    pub word_sentence_id: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

impl GameAnswer {
    pub fn new(
        game_session_id: &str,
        user_id: &str,
        word_id: &str,
        word_sentence_id: &str,
        is_correct: bool,
    ) -> Self {
        GameAnswer {
            answer_id: Uuid::new_v4().to_string(),
            game_session_id: game_session_id.to_string(),
            user_id: user_id.to_string(),
            word_id: word_id.to_string(),
            word_sentence_id: word_sentence_id.to_string(),
            is_correct,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_answer_fields() {
        let answer = GameAnswer::new("session-1", "user-1", "word-1", "sentence-1", true);

        assert!(!answer.answer_id.is_empty());
        assert_eq!(answer.game_session_id, "session-1");
        assert_eq!(answer.user_id, "user-1");
        assert_eq!(answer.word_id, "word-1");
        assert_eq!(answer.word_sentence_id, "sentence-1");
        assert!(answer.is_correct);
    }

    #[test]
    fn test_answer_id_uniqueness() {
        let a = GameAnswer::new("s", "u", "w", "ws", false);
        let b = GameAnswer::new("s", "u", "w", "ws", false);

        assert_ne!(a.answer_id, b.answer_id);
    }
}
