//! Subscriber Registry
//!
//! Two concurrent maps: connection → (sender, topics) and topic → connection
//! ids. Membership changes hold the connection entry while touching `topics`;
//! lock order is always `connections` then `topics`.

use std::collections::HashSet;

use dashmap::DashMap;
use shared::message::{RealtimeEvent, Topic};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Default per-connection outbound buffer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
struct Subscriber {
    tx: mpsc::Sender<RealtimeEvent>,
    topics: HashSet<Topic>,
}

/// Receiving side of a registered connection
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: Uuid,
    pub rx: mpsc::Receiver<RealtimeEvent>,
}

#[derive(Debug)]
pub struct SubscriberRegistry {
    connections: DashMap<Uuid, Subscriber>,
    topics: DashMap<Topic, HashSet<Uuid>>,
    capacity: usize,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl SubscriberRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: DashMap::new(),
            topics: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Register a connection; it joins [`Topic::Global`] immediately
    pub fn connect(&self) -> ConnectionHandle {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.capacity);
        self.connections.insert(
            id,
            Subscriber {
                tx,
                topics: HashSet::new(),
            },
        );
        self.join(id, Topic::Global);
        tracing::debug!(conn_id = %id, "Realtime connection registered");
        ConnectionHandle { id, rx }
    }

    /// Subscribe; joining twice is a no-op. Returns false for unknown connections.
    pub fn join(&self, conn_id: Uuid, topic: Topic) -> bool {
        let Some(mut subscriber) = self.connections.get_mut(&conn_id) else {
            return false;
        };
        if !subscriber.topics.insert(topic) {
            return true;
        }
        // 仍持有连接条目：disconnect 只能在此之后移除，不会遗留成员
        self.topics.entry(topic).or_default().insert(conn_id);
        drop(subscriber);
        tracing::debug!(conn_id = %conn_id, topic = %topic, "Joined topic");
        true
    }

    /// Unsubscribe; leaving a topic never joined is a no-op
    pub fn leave(&self, conn_id: Uuid, topic: Topic) {
        let Some(mut subscriber) = self.connections.get_mut(&conn_id) else {
            return;
        };
        if subscriber.topics.remove(&topic) {
            self.remove_member(topic, conn_id);
            drop(subscriber);
            tracing::debug!(conn_id = %conn_id, topic = %topic, "Left topic");
        }
    }

    /// Drop a connection and every subscription it holds
    pub fn disconnect(&self, conn_id: Uuid) {
        let Some((_, subscriber)) = self.connections.remove(&conn_id) else {
            return;
        };
        for topic in subscriber.topics {
            self.remove_member(topic, conn_id);
        }
        tracing::debug!(conn_id = %conn_id, "Realtime connection removed");
    }

    /// Deliver once to every connection subscribed to any of `topics`
    ///
    /// Returns the number of connections the event was queued for.
    pub fn publish(&self, topics: &[Topic], event: &RealtimeEvent) -> usize {
        let mut targets = HashSet::new();
        for topic in topics {
            if let Some(members) = self.topics.get(topic) {
                targets.extend(members.iter().copied());
            }
        }

        let mut delivered = 0;
        let mut closed = Vec::new();
        for conn_id in targets {
            let Some(subscriber) = self.connections.get(&conn_id) else {
                continue;
            };
            match subscriber.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(conn_id = %conn_id, event = event.name(), "Outbound buffer full, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(conn_id),
            }
        }

        for conn_id in closed {
            self.disconnect(conn_id);
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections subscribed to a topic
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map(|m| m.len()).unwrap_or(0)
    }

    pub fn topics_of(&self, conn_id: Uuid) -> HashSet<Topic> {
        self.connections
            .get(&conn_id)
            .map(|s| s.topics.clone())
            .unwrap_or_default()
    }

    fn remove_member(&self, topic: Topic, conn_id: Uuid) {
        if let Some(mut members) = self.topics.get_mut(&topic) {
            members.remove(&conn_id);
        }
        self.topics.remove_if(&topic, |_, members| members.is_empty());
    }
}
