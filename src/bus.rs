use tokio::sync::broadcast;
use tracing::debug;

use crate::models::EventId;

const DEFAULT_CAPACITY: usize = 16;

/// Notices a component publishes so other views can reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    EventsChanged { event_id: EventId },
}

/// Publish/subscribe channel scoped to one dashboard tree.
#[derive(Debug, Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl RefreshBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the notice.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!(?event, "No subscribers for dashboard event");
                0
            }
        }
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
