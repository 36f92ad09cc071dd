use std::sync::Arc;

use shared::protocol::{ServerEvent, ServerMessage};
use shared::services::auth_service::AuthService;
use shared::services::user_service::UserService;

use crate::registry::{ConnectionId, ConnectionRegistry};

/// Reflects socket authentication and disconnection as durable online/offline
/// status, and announces every change to all live connections. This is a
/// global presence feed, not a per-room one.
pub struct PresenceTracker {
    registry: Arc<ConnectionRegistry>,
    auth: AuthService,
    users: UserService,
}

impl PresenceTracker {
    pub fn new(registry: Arc<ConnectionRegistry>, auth: AuthService, users: UserService) -> Self {
        PresenceTracker {
            registry,
            auth,
            users,
        }
    }

    /// Token auth fails silently: an invalid or unresolvable token leaves the
    /// connection unbound and sends nothing back.
    pub async fn on_authenticated(&self, connection_id: ConnectionId, token: &str) {
        let user = match self.auth.resolve_token(token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::info!("Token authentication failed: {}", e);
                return;
            }
        };

        self.registry.bind(&connection_id, &user.id);

        match self.users.set_online_status(&user.id, true).await {
            Ok(updated) => {
                tracing::info!("User {} is online", updated.id);
                self.registry
                    .broadcast(&ServerMessage::from(ServerEvent::StatusUpdate {
                        user: Some(updated.public_profile()),
                    }));
            }
            Err(e) => {
                tracing::error!("Failed to mark user {} online: {}", user.id, e);
            }
        }
    }

    /// Unregisters the connection. When it was bound, flips the durable flag,
    /// broadcasts the change, and hands the user id back so the caller can run
    /// game-session cleanup.
    pub async fn on_disconnected(&self, connection_id: ConnectionId) -> Option<String> {
        let user_id = self.registry.unregister(&connection_id)?;

        match self.users.set_online_status(&user_id, false).await {
            Ok(updated) => {
                tracing::info!("User {} is offline", updated.id);
                self.registry
                    .broadcast(&ServerMessage::from(ServerEvent::StatusUpdate {
                        user: Some(updated.public_profile()),
                    }));
            }
            Err(e) => {
                tracing::error!("Failed to mark user {} offline: {}", user_id, e);
            }
        }

        Some(user_id)
    }
}
