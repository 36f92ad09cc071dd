use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::models::game_session::{GameSession, GameStatus, SessionStatus};
use shared::models::user::PublicUser;
use shared::models::word::Word;
use shared::services::errors::user_service_errors::UserServiceError;

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};

const PER_PAGE: usize = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/games/active", get(get_active_session))
        .route("/api/games/history", get(get_game_history))
        .route("/api/games", get(get_user_games))
        .route("/api/game/:session_id", get(get_game_result))
}

#[derive(Debug, Deserialize)]
pub struct ActiveSessionQuery {
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ActiveSessionResponse {
    id: String,
    status: SessionStatus,
    game_status: GameStatus,
    player1: Option<PublicUser>,
    player2: Option<PublicUser>,
    #[serde(rename = "currentUser")]
    current_user: PublicUser,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    words: Vec<Word>,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    game_id: String,
    created_at: DateTime<Utc>,
    status: SessionStatus,
    game_status: GameStatus,
    player1: Option<PublicUser>,
    player2: Option<PublicUser>,
    player1_score: i64,
    player2_score: i64,
}

#[derive(Debug, Serialize)]
struct PaginatedGames {
    current_page: usize,
    data: Vec<GameSummary>,
    per_page: usize,
    total: usize,
    last_page: usize,
}

#[derive(Debug, Serialize)]
struct PlayerResult {
    #[serde(flatten)]
    user: PublicUser,
    #[serde(rename = "isWinner")]
    is_winner: bool,
}

#[derive(Debug, Serialize)]
struct GameResultResponse {
    id: String,
    status: SessionStatus,
    game_status: GameStatus,
    player1: Option<PlayerResult>,
    player2: Option<PlayerResult>,
    #[serde(rename = "currentUser")]
    current_user: PublicUser,
    player1_correct_answers: i64,
    player2_correct_answers: i64,
}

/// The session a client should resume, together with its quiz word batch.
async fn get_active_session(
    State(state): State<AppState>,
    authenticated: AuthenticatedUser,
    Query(query): Query<ActiveSessionQuery>,
) -> Result<Json<ActiveSessionResponse>, ApiError> {
    let session_id = query.session_id.ok_or(ApiError::SessionNotFound)?;
    let session = state
        .game_session_service
        .get_session(&session_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    let words = state.word_service.quiz_batch().await?;

    Ok(Json(ActiveSessionResponse {
        id: session.session_id.clone(),
        status: session.status,
        game_status: session.game_status,
        player1: public_profile(&state, &session.player1_id).await?,
        player2: optional_profile(&state, session.player2_id.as_deref()).await?,
        current_user: authenticated.user.public_profile(),
        created_at: session.created_at,
        updated_at: session.updated_at,
        words,
    }))
}

async fn get_game_history(
    State(state): State<AppState>,
    authenticated: AuthenticatedUser,
) -> Result<Json<Vec<GameSummary>>, ApiError> {
    let sessions = state
        .game_session_service
        .sessions_for_user(&authenticated.user.id)
        .await?;

    let mut history = Vec::new();
    for session in sessions
        .into_iter()
        .filter(|s| s.status == SessionStatus::Completed)
    {
        history.push(summarize(&state, &session).await?);
    }
    Ok(Json(history))
}

async fn get_user_games(
    State(state): State<AppState>,
    authenticated: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedGames>, ApiError> {
    let sessions = state
        .game_session_service
        .sessions_for_user(&authenticated.user.id)
        .await?;

    let total = sessions.len();
    let current_page = query.page.unwrap_or(1).max(1);

    let mut data = Vec::new();
    for session in sessions
        .into_iter()
        .skip((current_page - 1) * PER_PAGE)
        .take(PER_PAGE)
    {
        data.push(summarize(&state, &session).await?);
    }

    Ok(Json(PaginatedGames {
        current_page,
        data,
        per_page: PER_PAGE,
        total,
        last_page: last_page(total),
    }))
}

async fn get_game_result(
    State(state): State<AppState>,
    authenticated: AuthenticatedUser,
    Path(session_id): Path<String>,
) -> Result<Json<GameResultResponse>, ApiError> {
    let session = state
        .game_session_service
        .get_session(&session_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    let (player1_score, player2_score) = state
        .game_session_service
        .correct_answer_counts(&session)
        .await?;

    let player1 = public_profile(&state, &session.player1_id)
        .await?
        .map(|user| PlayerResult {
            user,
            is_winner: player1_score > player2_score,
        });
    let player2 = optional_profile(&state, session.player2_id.as_deref())
        .await?
        .map(|user| PlayerResult {
            user,
            is_winner: player2_score > player1_score,
        });

    Ok(Json(GameResultResponse {
        id: session.session_id.clone(),
        status: session.status,
        game_status: session.game_status,
        player1,
        player2,
        current_user: authenticated.user.public_profile(),
        player1_correct_answers: player1_score,
        player2_correct_answers: player2_score,
    }))
}

async fn summarize(state: &AppState, session: &GameSession) -> Result<GameSummary, ApiError> {
    let (player1_score, player2_score) = state
        .game_session_service
        .correct_answer_counts(session)
        .await?;

    Ok(GameSummary {
        game_id: session.session_id.clone(),
        created_at: session.created_at,
        status: session.status,
        game_status: session.game_status,
        player1: public_profile(state, &session.player1_id).await?,
        player2: optional_profile(state, session.player2_id.as_deref()).await?,
        player1_score,
        player2_score,
    })
}

async fn public_profile(state: &AppState, user_id: &str) -> Result<Option<PublicUser>, ApiError> {
    match state.user_service.get_user_by_id(user_id).await {
        Ok(user) => Ok(Some(user.public_profile())),
        Err(UserServiceError::UserNotFound) => Ok(None),
        Err(e) => Err(ApiError::from(e)),
    }
}

async fn optional_profile(
    state: &AppState,
    user_id: Option<&str>,
) -> Result<Option<PublicUser>, ApiError> {
    match user_id {
        Some(user_id) => public_profile(state, user_id).await,
        None => Ok(None),
    }
}

fn last_page(total: usize) -> usize {
    total.div_ceil(PER_PAGE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::user::User;

    #[test]
    fn test_last_page_rounds_up_and_never_drops_below_one() {
        assert_eq!(last_page(0), 1);
        assert_eq!(last_page(1), 1);
        assert_eq!(last_page(20), 1);
        assert_eq!(last_page(21), 2);
        assert_eq!(last_page(40), 2);
        assert_eq!(last_page(41), 3);
    }

    #[test]
    fn test_game_result_wire_shape() {
        let user = User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "secret".to_string(),
        );
        let session = GameSession::new(&user.id, "p2");

        let response = GameResultResponse {
            id: session.session_id.clone(),
            status: session.status,
            game_status: session.game_status,
            player1: Some(PlayerResult {
                user: user.public_profile(),
                is_winner: true,
            }),
            player2: None,
            current_user: user.public_profile(),
            player1_correct_answers: 3,
            player2_correct_answers: 1,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["player1"]["isWinner"], true);
        assert_eq!(value["player1"]["id"], user.id);
        assert!(value["player1"].get("password").is_none());
        assert_eq!(value["currentUser"]["id"], user.id);
        assert_eq!(value["player1_correct_answers"], 3);
        assert_eq!(value["status"], "pending");
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let envelope = PaginatedGames {
            current_page: 1,
            data: Vec::new(),
            per_page: PER_PAGE,
            total: 0,
            last_page: 1,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["current_page"], 1);
        assert_eq!(value["per_page"], 20);
        assert_eq!(value["last_page"], 1);
        assert!(value["data"].as_array().unwrap().is_empty());
    }
}
