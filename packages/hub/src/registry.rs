use dashmap::DashMap;
use shared::protocol::ServerMessage;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type ConnectionId = Uuid;
pub type Tx = mpsc::UnboundedSender<ServerMessage>;

struct ConnectionEntry {
    tx: Tx,
    user_id: Option<String>,
}

/// The live-connection table. One entry per open socket; a connection gains a
/// user binding only after token authentication. Process-local: presence is
/// ephemeral and rebuilt from reconnects after a restart.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry {
            connections: DashMap::new(),
        }
    }

    pub fn register(&self, connection_id: ConnectionId, tx: Tx) {
        self.connections
            .insert(connection_id, ConnectionEntry { tx, user_id: None });
    }

    /// Idempotent. Returns the user the connection was bound to, if any.
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<String> {
        self.connections
            .remove(connection_id)
            .and_then(|(_, entry)| entry.user_id)
    }

    /// Attach an authenticated identity. Re-binding overwrites silently; the
    /// last bind wins.
    pub fn bind(&self, connection_id: &ConnectionId, user_id: &str) {
        if let Some(mut entry) = self.connections.get_mut(connection_id) {
            entry.user_id = Some(user_id.to_string());
        }
    }

    pub fn bound_user(&self, connection_id: &ConnectionId) -> Option<String> {
        self.connections
            .get(connection_id)
            .and_then(|entry| entry.user_id.clone())
    }

    pub fn send_to(&self, connection_id: &ConnectionId, message: ServerMessage) {
        if let Some(entry) = self.connections.get(connection_id) {
            let _ = entry.tx.send(message);
        }
    }

    /// Deliver to every live connection bound to the user. A user with
    /// several devices or tabs hears the message on all of them.
    pub fn notify_user(&self, user_id: &str, message: &ServerMessage) {
        for entry in self.connections.iter() {
            if entry.user_id.as_deref() == Some(user_id) {
                let _ = entry.tx.send(message.clone());
            }
        }
    }

    pub fn broadcast(&self, message: &ServerMessage) {
        for entry in self.connections.iter() {
            let _ = entry.tx.send(message.clone());
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::ServerEvent;

    fn event(session_id: &str) -> ServerMessage {
        ServerMessage::from(ServerEvent::GameAccepted {
            session_id: session_id.to_string(),
        })
    }

    #[test]
    fn test_register_and_unregister() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Uuid::new_v4();

        registry.register(conn, tx);
        assert_eq!(registry.connection_count(), 1);

        assert_eq!(registry.unregister(&conn), None);
        assert_eq!(registry.connection_count(), 0);

        // Removing an already-absent connection is a no-op.
        assert_eq!(registry.unregister(&conn), None);
    }

    #[test]
    fn test_unregister_returns_bound_user() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Uuid::new_v4();

        registry.register(conn, tx);
        registry.bind(&conn, "user-1");
        assert_eq!(registry.unregister(&conn), Some("user-1".to_string()));
    }

    #[test]
    fn test_rebind_overwrites_silently() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = Uuid::new_v4();

        registry.register(conn, tx);
        registry.bind(&conn, "user-1");
        registry.bind(&conn, "user-2");
        assert_eq!(registry.bound_user(&conn), Some("user-2".to_string()));

        registry.notify_user("user-1", &event("s1"));
        assert!(rx.try_recv().is_err());

        registry.notify_user("user-2", &event("s1"));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_notify_user_reaches_every_device() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        let phone = Uuid::new_v4();
        let laptop = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        registry.register(phone, tx1);
        registry.register(laptop, tx2);
        registry.register(stranger, tx3);
        registry.bind(&phone, "user-1");
        registry.bind(&laptop, "user-1");
        registry.bind(&stranger, "user-2");

        registry.notify_user("user-1", &event("s1"));
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
        assert!(rx3.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_ignores_binding() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let bound = Uuid::new_v4();
        let unbound = Uuid::new_v4();

        registry.register(bound, tx1);
        registry.register(unbound, tx2);
        registry.bind(&bound, "user-1");

        registry.broadcast(&event("s1"));
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
