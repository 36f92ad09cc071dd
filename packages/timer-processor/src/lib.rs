//! Runner for the durable delayed tasks behind the game hub: the 30-second
//! invitation auto-decline and the deferred game-over transition. Tasks live
//! in the scheduled-task table, so they fire even if the process that created
//! them has restarted. The runner can share the hub's process (publishing
//! events over an in-process channel) or run standalone (publishing over a
//! loopback socket connection to the hub).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use shared::models::scheduled_task::{ScheduledTask, TaskKind};
use shared::services::errors::game_session_service_errors::GameSessionServiceError;
use shared::services::errors::scheduler_service_errors::SchedulerServiceError;
use shared::services::game_events::{GameEvent, GameEventPublishError, GameEventPublisher};
use shared::services::game_session_service::GameSessionService;
use shared::services::scheduler_service::SchedulerService;

pub mod publisher;

#[derive(Debug)]
pub enum TimerProcessorError {
    Service(String),
    Publish(String),
}

impl std::fmt::Display for TimerProcessorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerProcessorError::Service(msg) => write!(f, "Service error: {}", msg),
            TimerProcessorError::Publish(msg) => write!(f, "Publish error: {}", msg),
        }
    }
}

impl std::error::Error for TimerProcessorError {}

impl From<GameSessionServiceError> for TimerProcessorError {
    fn from(err: GameSessionServiceError) -> Self {
        TimerProcessorError::Service(err.to_string())
    }
}

impl From<SchedulerServiceError> for TimerProcessorError {
    fn from(err: SchedulerServiceError) -> Self {
        TimerProcessorError::Service(err.to_string())
    }
}

impl From<GameEventPublishError> for TimerProcessorError {
    fn from(err: GameEventPublishError) -> Self {
        TimerProcessorError::Publish(err.to_string())
    }
}

#[derive(Clone)]
pub struct TimerProcessor {
    sessions: GameSessionService,
    scheduler: SchedulerService,
    publisher: Arc<dyn GameEventPublisher>,
}

impl TimerProcessor {
    pub fn new(
        sessions: GameSessionService,
        scheduler: SchedulerService,
        publisher: Arc<dyn GameEventPublisher>,
    ) -> Self {
        TimerProcessor {
            sessions,
            scheduler,
            publisher,
        }
    }

    /// Claim and execute every task due at `now`. A task another runner
    /// claimed first is skipped; a task that fails to execute is logged and
    /// dropped (it was already claimed). Returns how many tasks ran.
    pub async fn run_due_tasks(&self, now: DateTime<Utc>) -> Result<usize, TimerProcessorError> {
        let due = self.scheduler.due_tasks(now).await?;
        let mut executed = 0;

        for task in due {
            if !self.scheduler.claim_task(&task.task_id).await? {
                continue;
            }
            match self.execute(&task).await {
                Ok(()) => executed += 1,
                Err(e) => {
                    tracing::error!("Task {} ({:?}) failed: {}", task.task_id, task.kind, e);
                }
            }
        }

        Ok(executed)
    }

    async fn execute(&self, task: &ScheduledTask) -> Result<(), TimerProcessorError> {
        match task.kind {
            TaskKind::AutoDeclineGame => self.auto_decline(task).await,
            TaskKind::GameOver => self.game_over(task).await,
        }
    }

    /// Fire-and-check: the timer is never cancelled when the invitation is
    /// answered early. The conditional delete simply finds the session no
    /// longer `(pending, pending)` and does nothing.
    async fn auto_decline(&self, task: &ScheduledTask) -> Result<(), TimerProcessorError> {
        let Some(session) = self.sessions.get_session(&task.session_id).await? else {
            return Ok(());
        };

        if !self.sessions.delete_if_still_pending(&session).await? {
            return Ok(());
        }

        tracing::info!(
            "Game session {} deleted: invitation expired",
            task.session_id
        );
        self.publisher
            .publish(GameEvent::AutoDeclined {
                session_id: task.session_id.clone(),
                player1_id: task.player1_id.clone(),
            })
            .await?;
        Ok(())
    }

    /// Idempotent: completing an already-completed session is a no-op.
    async fn game_over(&self, task: &ScheduledTask) -> Result<(), TimerProcessorError> {
        let Some(session) = self.sessions.get_session(&task.session_id).await? else {
            return Ok(());
        };

        if self.sessions.complete_session(&session).await? {
            tracing::info!("Game session {} marked completed", task.session_id);
        }
        Ok(())
    }
}

/// Periodic poll loop used when the runner shares the hub's process.
pub fn spawn_poll_loop(processor: TimerProcessor, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match processor.run_due_tasks(Utc::now()).await {
                Ok(0) => {}
                Ok(executed) => tracing::debug!("Executed {} delayed tasks", executed),
                Err(e) => tracing::error!("Delayed-task poll failed: {}", e),
            }
        }
    })
}
