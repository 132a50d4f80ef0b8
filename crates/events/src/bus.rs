//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ServiceEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ServiceEvent
// ---------------------------------------------------------------------------

/// What changed.
///
/// Observers treat every variant as "re-read the service state"; no variant
/// describes which entries changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceEventKind {
    /// The photo feed was appended to or cleared.
    ImagesListChanged,

    /// A new avatar URL was loaded for the current user.
    ProfileImageChanged { avatar_url: String },
}

/// A change notification published by one of the session services.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEvent {
    pub kind: ServiceEventKind,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ServiceEvent {
    pub fn new(kind: ServiceEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn images_list_changed() -> Self {
        Self::new(ServiceEventKind::ImagesListChanged)
    }

    pub fn profile_image_changed(avatar_url: impl Into<String>) -> Self {
        Self::new(ServiceEventKind::ProfileImageChanged {
            avatar_url: avatar_url.into(),
        })
    }

    /// Stable notification name, e.g. for log lines.
    pub fn name(&self) -> &'static str {
        match self.kind {
            ServiceEventKind::ImagesListChanged => "ImagesListServiceDidChange",
            ServiceEventKind::ProfileImageChanged { .. } => "ProfileImageProviderDidChange",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of observers can
/// independently receive every published [`ServiceEvent`]. Delivery order
/// across subscribers is unspecified.
///
/// # Usage
///
/// ```rust
/// use imagefeed_events::bus::{EventBus, ServiceEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ServiceEvent::images_list_changed());
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ServiceEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ServiceEvent) {
        tracing::debug!(event = event.name(), "Publishing event");
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
