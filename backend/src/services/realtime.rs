//! Realtime alert delivery hub.
//!
//! Fan-out of created alerts to connected WebSocket viewers over a broadcast
//! channel. Delivery is fire-and-forget: the alert row in the database is the
//! source of truth, and a publish with no listeners (or a lagging listener)
//! never affects alert creation.

use serde_json::json;
use shared::Alert;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AlertBroadcaster {
    tx: broadcast::Sender<String>,
}

impl AlertBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a newly created alert to all connected viewers.
    pub fn publish(&self, alert: &Alert) {
        let event = json!({
            "event": "new-alert",
            "data": alert,
        });
        // Err means no subscribers are connected right now; that is fine.
        let _ = self.tx.send(event.to_string());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{AlertPriority, AlertType};

    fn sample_alert() -> Alert {
        Alert {
            id: uuid::Uuid::new_v4(),
            alert_type: AlertType::StockOut,
            title: "Stock Out Alert".to_string(),
            message: "Beans are out of stock".to_string(),
            action: Some("Reorder immediately".to_string()),
            product_id: Some(uuid::Uuid::new_v4()),
            priority: AlertPriority::Critical,
            is_read: false,
            is_resolved: false,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_reaches_subscribers() {
        let hub = AlertBroadcaster::new(8);
        let mut rx = hub.subscribe();

        hub.publish(&sample_alert());

        let raw = rx.recv().await.expect("event delivered");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["event"], "new-alert");
        assert_eq!(value["data"]["type"], "STOCK_OUT");
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let hub = AlertBroadcaster::new(8);
        // Must not panic or error.
        hub.publish(&sample_alert());
    }
}
