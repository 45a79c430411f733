//! Core event bus for the Bay Navigator safety subsystem.
//!
//! The bus provides a typed event enum, sequential identifiers, and support
//! for replaying recent events when subscribers reconnect (e.g. a UI shell
//! that re-attaches after a route change). Internally it uses
//! `tokio::broadcast` with a bounded buffer; when the channel overflows, the
//! oldest events are dropped, matching the desired backpressure behaviour.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};

/// Identifier assigned to each event emitted by the subsystem.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
const DEFAULT_REPLAY_CAPACITY: usize = 256;

/// Typed safety events surfaced across the subsystem.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SafetyEvent {
    SettingsChanged {
        setting: String,
    },
    IncognitoSessionStarted,
    IncognitoSessionEnded,
    HistoryCleared {
        scope: HistoryScope,
    },
    QuickExitExecuted {
        destination: String,
    },
    NetworkStatusChanged {
        level: PrivacyLevel,
        connection_type: String,
    },
    DisguiseChanged {
        icon_id: Option<String>,
    },
}

impl SafetyEvent {
    /// Machine-friendly discriminator for log and UI consumers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SafetyEvent::SettingsChanged { .. } => "settings_changed",
            SafetyEvent::IncognitoSessionStarted => "incognito_session_started",
            SafetyEvent::IncognitoSessionEnded => "incognito_session_ended",
            SafetyEvent::HistoryCleared { .. } => "history_cleared",
            SafetyEvent::QuickExitExecuted { .. } => "quick_exit_executed",
            SafetyEvent::NetworkStatusChanged { .. } => "network_status_changed",
            SafetyEvent::DisguiseChanged { .. } => "disguise_changed",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct EventEnvelope {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub event: SafetyEvent,
}

/// Which history storage a clear operation touched.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    /// Only the in-memory session lists.
    Session,
    /// Only the persisted lists.
    Persisted,
    /// Session and persisted lists together.
    All,
}

/// Privacy classification of the active network transport.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    /// Traffic is shielded from the local network (VPN).
    Good,
    /// Carrier-visible but not locally inspectable (mobile data).
    Moderate,
    /// Potentially visible to the network owner (WiFi).
    Caution,
    /// No transport available.
    Offline,
    /// Transport could not be determined.
    Unknown,
}

impl PrivacyLevel {
    /// Render the level as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Caution => "caution",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }

    /// Stable ordinal used by the telemetry gauge (0 = good .. 4 = unknown).
    #[must_use]
    pub const fn ordinal(self) -> i64 {
        match self {
            Self::Good => 0,
            Self::Moderate => 1,
            Self::Caution => 2,
            Self::Offline => 3,
            Self::Unknown => 4,
        }
    }
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    buffer: Arc<Mutex<VecDeque<EventEnvelope>>>,
    next_id: Arc<std::sync::atomic::AtomicU64>,
    replay_capacity: usize,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// The broadcast channel uses the same capacity as the in-memory replay
    /// buffer, ensuring dropped events impact both structures consistently.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            next_id: Arc::new(std::sync::atomic::AtomicU64::new(1)),
            replay_capacity: capacity,
        }
    }

    /// Construct a bus with the default in-memory buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Publish a new event to the bus, assigning it a sequential identifier.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    pub fn publish(&self, event: SafetyEvent) -> EventId {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };

        {
            let mut buffer = self.buffer.lock().expect("event buffer mutex poisoned");
            if buffer.len() == self.replay_capacity {
                buffer.pop_front();
            }
            buffer.push_back(envelope.clone());
        }

        let _ = self.sender.send(envelope);
        id
    }

    /// Subscribe to the bus, replaying any buffered events newer than `since_id`.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    #[must_use]
    pub fn subscribe(&self, since_id: Option<EventId>) -> EventStream {
        let mut backlog = VecDeque::new();
        if let Some(since) = since_id {
            let buffer = self.buffer.lock().expect("event buffer mutex poisoned");
            for item in buffer.iter() {
                if item.id > since {
                    backlog.push_back(item.clone());
                }
            }
        }

        let receiver = self.sender.subscribe();
        EventStream { backlog, receiver }
    }

    /// Returns the last assigned identifier, if any events have been published.
    ///
    /// # Panics
    ///
    /// Panics if the replay buffer mutex has been poisoned.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        let buffer = self.buffer.lock().expect("event buffer mutex poisoned");
        buffer.back().map(|event| event.id)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper that yields events either from the replay backlog or from
/// the live broadcast channel.
pub struct EventStream {
    backlog: VecDeque<EventEnvelope>,
    receiver: Receiver<EventEnvelope>,
}

impl EventStream {
    /// Receive the next event, respecting the replay backlog first.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }

        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(setting: &str) -> SafetyEvent {
        SafetyEvent::SettingsChanged {
            setting: setting.to_string(),
        }
    }

    #[tokio::test]
    async fn sequential_ids_and_replay() {
        let bus = EventBus::with_capacity(16);

        let mut last_id = 0;
        for i in 0..5 {
            last_id = bus.publish(sample_event(&format!("setting-{i}")));
        }
        assert_eq!(last_id, 5);

        let mut stream = bus.subscribe(Some(2));
        let mut received = Vec::new();
        for _ in 0..3 {
            if let Some(event) = stream.next().await {
                received.push(event);
            }
        }

        assert_eq!(received.len(), 3);
        assert_eq!(received.first().unwrap().id, 3);
        assert_eq!(received.last().unwrap().id, 5);
    }

    #[tokio::test]
    async fn replay_ring_drops_oldest() {
        let bus = EventBus::with_capacity(4);
        for i in 0..8 {
            let _ = bus.publish(sample_event(&format!("setting-{i}")));
        }

        let mut stream = bus.subscribe(Some(0));
        let first = stream.next().await.expect("expected replayed event");
        assert_eq!(first.id, 5, "only the newest four events are retained");
        assert_eq!(bus.last_event_id(), Some(8));
    }

    #[tokio::test]
    async fn live_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut stream = bus.subscribe(None);

        let _ = bus.publish(SafetyEvent::QuickExitExecuted {
            destination: "https://www.google.com".to_string(),
        });

        let event = stream.next().await.expect("expected live event");
        assert_eq!(event.event.kind(), "quick_exit_executed");
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(SafetyEvent::IncognitoSessionStarted.kind(), "incognito_session_started");
        assert_eq!(
            SafetyEvent::HistoryCleared {
                scope: HistoryScope::All
            }
            .kind(),
            "history_cleared"
        );
        assert_eq!(
            SafetyEvent::NetworkStatusChanged {
                level: PrivacyLevel::Caution,
                connection_type: "WiFi".to_string(),
            }
            .kind(),
            "network_status_changed"
        );
    }

    #[test]
    fn privacy_level_ordinals_are_distinct() {
        let levels = [
            PrivacyLevel::Good,
            PrivacyLevel::Moderate,
            PrivacyLevel::Caution,
            PrivacyLevel::Offline,
            PrivacyLevel::Unknown,
        ];
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.ordinal(), i as i64);
            assert!(!level.as_str().is_empty());
        }
    }
}
