use async_trait::async_trait;

/// Events a delayed-task runner reports back to the live hub. The channel is
/// explicit so the runner can live in the hub process (mpsc impl) or in a
/// separate one (socket loopback impl) without the jobs knowing which.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An unanswered invitation was removed; player1 should hear
    /// `game_auto_declined`.
    AutoDeclined {
        session_id: String,
        player1_id: String,
    },
}

#[derive(Debug)]
pub enum GameEventPublishError {
    Delivery(String),
}

impl std::fmt::Display for GameEventPublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEventPublishError::Delivery(msg) => write!(f, "Event delivery failed: {}", msg),
        }
    }
}

impl std::error::Error for GameEventPublishError {}

#[async_trait]
pub trait GameEventPublisher: Send + Sync {
    async fn publish(&self, event: GameEvent) -> Result<(), GameEventPublishError>;
}
