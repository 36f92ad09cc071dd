use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use shared::repositories::access_token_repository::DynamoDbAccessTokenRepository;
use shared::repositories::game_answer_repository::DynamoDbGameAnswerRepository;
use shared::repositories::game_session_repository::DynamoDbGameSessionRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::repositories::word_repository::DynamoDbWordRepository;
use shared::services::auth_service::AuthService;
use shared::services::game_session_service::GameSessionService;
use shared::services::user_service::UserService;
use shared::services::word_service::WordService;

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let session_repository = Arc::new(DynamoDbGameSessionRepository::new(client.clone()));
    let answer_repository = Arc::new(DynamoDbGameAnswerRepository::new(client.clone()));
    let user_repository = Arc::new(DynamoDbUserRepository::new(client.clone()));
    let token_repository = Arc::new(DynamoDbAccessTokenRepository::new(client.clone()));
    let word_repository = Arc::new(DynamoDbWordRepository::new(client));

    let app_state = state::AppState {
        auth_service: AuthService::new(token_repository, user_repository.clone()),
        user_service: UserService::new(user_repository),
        game_session_service: GameSessionService::new(session_repository, answer_repository),
        word_service: WordService::new(word_repository),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::games::routes())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = std::env::var("API_BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .expect("API_BIND_ADDR must be a valid socket address");
    tracing::info!("Read-model API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
