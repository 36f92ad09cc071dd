//! Wire shapes for the game socket. Inbound payloads are one of two mutually
//! exclusive kinds: `{"token": …}` authenticates the connection,
//! `{"action": …, …}` performs a game action. Outbound events carry a `type`
//! discriminator; advisory errors are a bare `{"error": …}` object sent only
//! to the originating connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::user::PublicUser;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GameAction {
    CreateGame {
        opponent_id: String,
    },
    AcceptGame {
        session_id: String,
    },
    DeclineGame {
        session_id: String,
    },
    /// Internal, loopback-originated: the auto-decline job reporting that it
    /// deleted a session that was never accepted.
    AutoDeclineGame {
        session_id: String,
        player1_id: String,
    },
    CancelPendingGames {
        #[serde(default)]
        session_id: Option<String>,
    },
    CompleteGame {
        session_id: String,
    },
    CorrectAnswer {
        session_id: String,
        word_id: String,
        sentence_id: String,
        #[serde(rename = "isLast")]
        is_last: bool,
    },
    InCorrectAnswer {
        session_id: String,
        word_id: String,
        sentence_id: String,
        #[serde(rename = "isLast")]
        is_last: bool,
    },
}

/// Result of shape-detecting one inbound text frame. Invalid JSON is the only
/// parse error; everything else degrades to a loggable variant.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    Auth { token: String },
    Action(GameAction),
    UnknownAction(String),
    Unrecognized,
}

impl IncomingMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;

        if let Some(token) = value.get("token").and_then(Value::as_str) {
            return Ok(IncomingMessage::Auth {
                token: token.to_string(),
            });
        }

        if let Some(action) = value.get("action").and_then(Value::as_str) {
            let action = action.to_string();
            return match serde_json::from_value::<GameAction>(value) {
                Ok(parsed) => Ok(IncomingMessage::Action(parsed)),
                Err(_) => Ok(IncomingMessage::UnknownAction(action)),
            };
        }

        Ok(IncomingMessage::Unrecognized)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    #[serde(rename = "status-update")]
    StatusUpdate { user: Option<PublicUser> },
    GameInvite {
        session_id: String,
        from_user: PublicUser,
    },
    GameWaiting {
        session_id: String,
        waiting: Option<PublicUser>,
    },
    GameAccepted {
        session_id: String,
    },
    GameDeclined {
        session_id: String,
    },
    GameCancelled {
        session_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        when: Option<String>,
    },
    GameAutoDeclined {
        session_id: String,
    },
    AnswerResult {
        session_id: String,
        #[serde(rename = "user1Score")]
        user1_score: i64,
        #[serde(rename = "user2Score")]
        user2_score: i64,
        #[serde(rename = "isFinished")]
        is_finished: bool,
    },
    GameCompleted {
        session_id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorReply {
    pub error: String,
}

/// Everything a connection can be sent: a typed event or a bare error reply.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ServerMessage {
    Event(ServerEvent),
    Error(ErrorReply),
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorReply {
            error: message.into(),
        })
    }
}

impl From<ServerEvent> for ServerMessage {
    fn from(event: ServerEvent) -> Self {
        ServerMessage::Event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_message() {
        let parsed = IncomingMessage::parse(r#"{"token": "abc123"}"#).unwrap();
        assert_eq!(
            parsed,
            IncomingMessage::Auth {
                token: "abc123".to_string()
            }
        );
    }

    #[test]
    fn test_parse_create_game() {
        let parsed =
            IncomingMessage::parse(r#"{"action": "create_game", "opponent_id": "u2"}"#).unwrap();
        assert_eq!(
            parsed,
            IncomingMessage::Action(GameAction::CreateGame {
                opponent_id: "u2".to_string()
            })
        );
    }

    #[test]
    fn test_parse_answer_actions() {
        let correct = IncomingMessage::parse(
            r#"{"action": "correct_answer", "session_id": "s1", "word_id": "w1", "sentence_id": "ws1", "isLast": true}"#,
        )
        .unwrap();
        assert_eq!(
            correct,
            IncomingMessage::Action(GameAction::CorrectAnswer {
                session_id: "s1".to_string(),
                word_id: "w1".to_string(),
                sentence_id: "ws1".to_string(),
                is_last: true,
            })
        );

        let incorrect = IncomingMessage::parse(
            r#"{"action": "in_correct_answer", "session_id": "s1", "word_id": "w1", "sentence_id": "ws1", "isLast": false}"#,
        )
        .unwrap();
        assert!(matches!(
            incorrect,
            IncomingMessage::Action(GameAction::InCorrectAnswer { is_last: false, .. })
        ));
    }

    #[test]
    fn test_parse_cancel_without_session_id() {
        let parsed = IncomingMessage::parse(r#"{"action": "cancel_pending_games"}"#).unwrap();
        assert_eq!(
            parsed,
            IncomingMessage::Action(GameAction::CancelPendingGames { session_id: None })
        );
    }

    #[test]
    fn test_parse_loopback_auto_decline_ignores_extra_fields() {
        let parsed = IncomingMessage::parse(
            r#"{"message": "Game session deleted", "action": "auto_decline_game", "session_id": "s1", "player1_id": "u1", "player2_id": "u2"}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            IncomingMessage::Action(GameAction::AutoDeclineGame {
                session_id: "s1".to_string(),
                player1_id: "u1".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_unknown_action() {
        let parsed = IncomingMessage::parse(r#"{"action": "game_over", "session_id": "s1"}"#).unwrap();
        assert_eq!(parsed, IncomingMessage::UnknownAction("game_over".to_string()));
    }

    #[test]
    fn test_parse_unrecognized_shape() {
        let parsed = IncomingMessage::parse(r#"{"hello": "world"}"#).unwrap();
        assert_eq!(parsed, IncomingMessage::Unrecognized);
    }

    #[test]
    fn test_parse_invalid_json_is_an_error() {
        assert!(IncomingMessage::parse("not json").is_err());
    }

    #[test]
    fn test_status_update_wire_shape() {
        let message = ServerMessage::from(ServerEvent::StatusUpdate { user: None });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "status-update");
        assert!(value["user"].is_null());
    }

    #[test]
    fn test_answer_result_wire_shape() {
        let message = ServerMessage::from(ServerEvent::AnswerResult {
            session_id: "s1".to_string(),
            user1_score: 3,
            user2_score: 4,
            is_finished: true,
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "answer_result");
        assert_eq!(value["user1Score"], 3);
        assert_eq!(value["user2Score"], 4);
        assert_eq!(value["isFinished"], true);
    }

    #[test]
    fn test_game_cancelled_omits_absent_when() {
        let plain = serde_json::to_value(ServerMessage::from(ServerEvent::GameCancelled {
            session_id: "s1".to_string(),
            when: None,
        }))
        .unwrap();
        assert!(plain.get("when").is_none());

        let on_close = serde_json::to_value(ServerMessage::from(ServerEvent::GameCancelled {
            session_id: "s1".to_string(),
            when: Some("onClose".to_string()),
        }))
        .unwrap();
        assert_eq!(on_close["when"], "onClose");
    }

    #[test]
    fn test_error_reply_is_bare_object() {
        let message = ServerMessage::error("You already have an active game");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["error"], "You already have an active game");
        assert!(value.get("type").is_none());
    }
}
