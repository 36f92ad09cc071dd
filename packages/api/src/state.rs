use shared::services::auth_service::AuthService;
use shared::services::game_session_service::GameSessionService;
use shared::services::user_service::UserService;
use shared::services::word_service::WordService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub game_session_service: GameSessionService,
    pub word_service: WordService,
}
