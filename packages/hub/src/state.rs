use std::sync::Arc;

use crate::coordinator::GameCoordinator;
use crate::presence::PresenceTracker;
use crate::registry::ConnectionRegistry;

pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub presence: Arc<PresenceTracker>,
    pub coordinator: Arc<GameCoordinator>,
}
