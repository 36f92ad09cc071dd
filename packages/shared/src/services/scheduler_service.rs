use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::models::game_session::GameSession;
use crate::models::scheduled_task::ScheduledTask;
use crate::repositories::scheduled_task_repository::ScheduledTaskRepository;
use crate::services::errors::scheduler_service_errors::SchedulerServiceError;

/// How long an invitation may sit unanswered before the auto-decline job
/// removes it.
pub const INVITE_TIMEOUT_SECONDS: i64 = 30;

/// Grace period between both players finishing and the game-over job forcing
/// the session to completed.
pub const GAME_OVER_DELAY_SECONDS: i64 = 30;

#[derive(Clone)]
pub struct SchedulerService {
    repository: Arc<dyn ScheduledTaskRepository + Send + Sync>,
}

impl SchedulerService {
    pub fn new(repository: Arc<dyn ScheduledTaskRepository + Send + Sync>) -> Self {
        SchedulerService { repository }
    }

    pub async fn schedule_auto_decline(
        &self,
        session: &GameSession,
    ) -> Result<ScheduledTask, SchedulerServiceError> {
        let task = ScheduledTask::auto_decline(session, Duration::seconds(INVITE_TIMEOUT_SECONDS));
        self.repository.put_task(&task).await?;
        Ok(task)
    }

    pub async fn schedule_game_over(
        &self,
        session: &GameSession,
    ) -> Result<ScheduledTask, SchedulerServiceError> {
        let task = ScheduledTask::game_over(session, Duration::seconds(GAME_OVER_DELAY_SECONDS));
        self.repository.put_task(&task).await?;
        Ok(task)
    }

    pub async fn due_tasks(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledTask>, SchedulerServiceError> {
        self.repository
            .due_tasks(now)
            .await
            .map_err(SchedulerServiceError::from)
    }

    /// `true` when this runner won the task; `false` when another poller
    /// already claimed it.
    pub async fn claim_task(&self, task_id: &str) -> Result<bool, SchedulerServiceError> {
        self.repository
            .claim_task(task_id)
            .await
            .map_err(SchedulerServiceError::from)
    }
}
