use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use shared::repositories::game_answer_repository::DynamoDbGameAnswerRepository;
use shared::repositories::game_session_repository::DynamoDbGameSessionRepository;
use shared::repositories::scheduled_task_repository::DynamoDbScheduledTaskRepository;
use shared::services::game_session_service::GameSessionService;
use shared::services::scheduler_service::SchedulerService;
use timer_processor::publisher::LoopbackPublisher;
use timer_processor::TimerProcessor;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let session_repository = Arc::new(DynamoDbGameSessionRepository::new(client.clone()));
    let answer_repository = Arc::new(DynamoDbGameAnswerRepository::new(client.clone()));
    let task_repository = Arc::new(DynamoDbScheduledTaskRepository::new(client));

    let sessions = GameSessionService::new(session_repository, answer_repository);
    let scheduler = SchedulerService::new(task_repository);

    let hub_url =
        std::env::var("HUB_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:5610/ws".to_string());
    let publisher = Arc::new(LoopbackPublisher::new(hub_url));

    let processor = TimerProcessor::new(sessions, scheduler, publisher);
    tracing::info!("Timer processor started");

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        interval.tick().await;
        match processor.run_due_tasks(Utc::now()).await {
            Ok(0) => {}
            Ok(executed) => tracing::info!("Executed {} delayed tasks", executed),
            Err(e) => tracing::error!("Delayed-task poll failed: {}", e),
        }
    }
}
