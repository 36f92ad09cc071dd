use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::services::errors::{
    auth_service_errors::AuthServiceError,
    game_session_service_errors::GameSessionServiceError, user_service_errors::UserServiceError,
    word_service_errors::WordServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    AuthService(AuthServiceError),
    UserService(UserServiceError),
    GameSessionService(GameSessionServiceError),
    WordService(WordServiceError),
    /// 404 with the message clients key on.
    SessionNotFound,
    Unauthorized,
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        match error {
            AuthServiceError::InvalidToken => ApiError::Unauthorized,
            other => ApiError::AuthService(other),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        ApiError::UserService(error)
    }
}

impl From<GameSessionServiceError> for ApiError {
    fn from(error: GameSessionServiceError) -> Self {
        ApiError::GameSessionService(error)
    }
}

impl From<WordServiceError> for ApiError {
    fn from(error: WordServiceError) -> Self {
        ApiError::WordService(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "No active game session found"})),
            )
                .into_response(),
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::UserService(UserServiceError::UserNotFound) => {
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::UserService(UserServiceError::ValidationError(message)) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            ApiError::AuthService(e) => internal_error(e.to_string()),
            ApiError::UserService(e) => internal_error(e.to_string()),
            ApiError::GameSessionService(e) => internal_error(e.to_string()),
            ApiError::WordService(e) => internal_error(e.to_string()),
        }
    }
}

fn internal_error(message: String) -> Response {
    tracing::error!("API request failed: {}", message);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
