use async_trait::async_trait;
use futures::SinkExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use shared::services::game_events::{GameEvent, GameEventPublishError, GameEventPublisher};

/// Publishes events to a hub running in another process by connecting to its
/// own socket endpoint and sending the internal action, the same way any
/// client would.
pub struct LoopbackPublisher {
    hub_url: String,
}

impl LoopbackPublisher {
    pub fn new(hub_url: String) -> Self {
        LoopbackPublisher { hub_url }
    }
}

#[async_trait]
impl GameEventPublisher for LoopbackPublisher {
    async fn publish(&self, event: GameEvent) -> Result<(), GameEventPublishError> {
        let (mut stream, _) = connect_async(self.hub_url.as_str())
            .await
            .map_err(|e| GameEventPublishError::Delivery(e.to_string()))?;

        let payload = match &event {
            GameEvent::AutoDeclined {
                session_id,
                player1_id,
            } => serde_json::json!({
                "message": "Game session deleted",
                "action": "auto_decline_game",
                "session_id": session_id,
                "player1_id": player1_id,
            }),
        };

        stream
            .send(Message::Text(payload.to_string()))
            .await
            .map_err(|e| GameEventPublishError::Delivery(e.to_string()))?;
        let _ = stream.close(None).await;

        tracing::info!("Published {:?} to hub at {}", event, self.hub_url);
        Ok(())
    }
}
