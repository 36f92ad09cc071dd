use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::sync::mpsc;

use shared::repositories::access_token_repository::DynamoDbAccessTokenRepository;
use shared::repositories::game_answer_repository::DynamoDbGameAnswerRepository;
use shared::repositories::game_session_repository::DynamoDbGameSessionRepository;
use shared::repositories::scheduled_task_repository::DynamoDbScheduledTaskRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::auth_service::AuthService;
use shared::services::game_session_service::GameSessionService;
use shared::services::scheduler_service::SchedulerService;
use shared::services::user_service::UserService;
use timer_processor::TimerProcessor;

use coordinator::GameCoordinator;
use events::ChannelPublisher;
use presence::PresenceTracker;
use registry::ConnectionRegistry;
use state::AppState;

mod coordinator;
mod error;
mod events;
mod presence;
mod registry;
mod router;
mod state;

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let session_repository = Arc::new(DynamoDbGameSessionRepository::new(client.clone()));
    let answer_repository = Arc::new(DynamoDbGameAnswerRepository::new(client.clone()));
    let user_repository = Arc::new(DynamoDbUserRepository::new(client.clone()));
    let token_repository = Arc::new(DynamoDbAccessTokenRepository::new(client.clone()));
    let task_repository = Arc::new(DynamoDbScheduledTaskRepository::new(client));

    let sessions = GameSessionService::new(session_repository, answer_repository);
    let users = UserService::new(user_repository.clone());
    let auth = AuthService::new(token_repository, user_repository);
    let scheduler = SchedulerService::new(task_repository);

    let registry = Arc::new(ConnectionRegistry::new());
    let coordinator = Arc::new(GameCoordinator::new(
        registry.clone(),
        sessions.clone(),
        users.clone(),
        scheduler.clone(),
    ));
    let presence = Arc::new(PresenceTracker::new(registry.clone(), auth, users));

    // Delayed tasks are polled in-process by default; a standalone
    // timer-processor can take over the same table from another process.
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    events::spawn_event_loop(coordinator.clone(), event_rx);
    let processor = TimerProcessor::new(sessions, scheduler, Arc::new(ChannelPublisher::new(event_tx)));
    timer_processor::spawn_poll_loop(processor, POLL_INTERVAL);

    let state = Arc::new(AppState {
        registry,
        presence,
        coordinator,
    });

    let app = Router::new()
        .route("/ws", get(router::ws_handler))
        .with_state(state);

    let addr: SocketAddr = std::env::var("HUB_BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:5610".to_string())
        .parse()
        .expect("HUB_BIND_ADDR must be a valid socket address");
    tracing::info!("Game hub listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
