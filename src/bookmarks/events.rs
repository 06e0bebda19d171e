//! Change notifications for list views.
//!
//! Every structural change of the store is announced once, after the store is
//! consistent again: observers never see rows and boundary cursors disagree.

use tokio::sync::broadcast;

use super::types::Role;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// The whole list was rebuilt; views must re-read everything.
    Reset,
    /// Rows `first..=last` were inserted.
    RowsInserted { first: usize, last: usize },
    /// Rows `first..=last` were removed.
    RowsRemoved { first: usize, last: usize },
    /// The row at `from` now lives at `to`.
    RowMoved { from: usize, to: usize },
    /// Some fields of one row changed.
    DataChanged { row: usize, roles: Vec<Role> },
    /// A temporary entry was inserted at `row`, views may want to scroll to it.
    TemporaryAdded { row: usize },
}

/// Fans model events out to any number of subscribers.
#[derive(Clone)]
pub struct ModelBroadcaster {
    sender: broadcast::Sender<ModelEvent>,
}

impl ModelBroadcaster {
    /// Create a new broadcaster with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send an event to all subscribers
    pub fn send(&self, event: ModelEvent) {
        match self.sender.send(event) {
            Ok(count) => {
                tracing::trace!("[model] event sent to {count} subscribers");
            }
            Err(_) => {
                // No receivers, this is fine
            }
        }
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.sender.subscribe()
    }
}

impl Default for ModelBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Drain everything currently queued on a receiver.
///
/// Lagged receivers skip what they missed and continue.
pub fn drain(receiver: &mut broadcast::Receiver<ModelEvent>) -> Vec<ModelEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!("[model] receiver lagged, skipped {skipped} events");
            }
            Err(_) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_subscribers_is_fine() {
        let broadcaster = ModelBroadcaster::new(4);
        broadcaster.send(ModelEvent::Reset);
    }

    #[test]
    fn test_drain_returns_events_in_order() {
        let broadcaster = ModelBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(ModelEvent::Reset);
        broadcaster.send(ModelEvent::RowsInserted { first: 2, last: 2 });

        assert_eq!(
            drain(&mut rx),
            vec![
                ModelEvent::Reset,
                ModelEvent::RowsInserted { first: 2, last: 2 }
            ]
        );
        assert!(drain(&mut rx).is_empty());
    }
}
