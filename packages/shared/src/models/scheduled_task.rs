use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game_session::GameSession;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    AutoDeclineGame,
    GameOver,
}

/// A unit of deferred work stored durably so it survives hub restarts.
/// The runner claims a task (conditional delete) before executing it, so a
/// co-resident poller and a standalone processor never both fire it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledTask {
    pub task_id: String,
    pub kind: TaskKind,
    pub session_id: String,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub fire_at: DateTime<Utc>,
}

impl ScheduledTask {
    pub fn auto_decline(session: &GameSession, delay: Duration) -> Self {
        Self::for_session(TaskKind::AutoDeclineGame, session, delay)
    }

    pub fn game_over(session: &GameSession, delay: Duration) -> Self {
        Self::for_session(TaskKind::GameOver, session, delay)
    }

    fn for_session(kind: TaskKind, session: &GameSession, delay: Duration) -> Self {
        ScheduledTask {
            task_id: Uuid::new_v4().to_string(),
            kind,
            session_id: session.session_id.clone(),
            player1_id: session.player1_id.clone(),
            player2_id: session.player2_id.clone(),
            fire_at: Utc::now() + delay,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.fire_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_decline_task_carries_session_fields() {
        let session = GameSession::new("p1", "p2");
        let task = ScheduledTask::auto_decline(&session, Duration::seconds(30));

        assert_eq!(task.kind, TaskKind::AutoDeclineGame);
        assert_eq!(task.session_id, session.session_id);
        assert_eq!(task.player1_id, "p1");
        assert_eq!(task.player2_id.as_deref(), Some("p2"));
    }

    #[test]
    fn test_is_due() {
        let session = GameSession::new("p1", "p2");
        let task = ScheduledTask::game_over(&session, Duration::seconds(30));

        let now = Utc::now();
        assert!(!task.is_due(now));
        assert!(task.is_due(now + Duration::seconds(31)));
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&TaskKind::AutoDeclineGame).unwrap(),
            "\"auto_decline_game\""
        );
        assert_eq!(
            serde_json::to_string(&TaskKind::GameOver).unwrap(),
            "\"game_over\""
        );
    }
}
