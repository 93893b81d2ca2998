//! Change notifications for facet and view state
//!
//! Every state store publishes onto a shared [`EventBus`] after a mutation
//! that actually changed something. Facet events always carry the *full*
//! selection of the facet that changed, never a delta, so a subscriber that
//! only sees the latest event still knows the complete state.
//!
//! # Architecture
//!
//! ```text
//! FacetStore ──┐
//!              ├──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! Browser ─────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(1024);
//! let mut rx = bus.subscribe();
//!
//! bus.publish(BrowserEvent::View(ViewEvent::PageChanged { page: 2 }));
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("Received: {:?}", envelope.event);
//! }
//! ```

use crate::core::facet::{FacetSelection, PriceRange};
use crate::core::sort::SortSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by the facet state store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "facet", rename_all = "snake_case")]
pub enum FacetEvent {
    /// The category selection changed
    Categories { selected: BTreeSet<String> },
    /// The store selection changed
    Stores { selected: BTreeSet<String> },
    /// The price range changed
    Price { range: PriceRange },
    /// The rating bucket selection changed
    Ratings { selected: BTreeSet<u8> },
    /// Every facet was reset at once
    Cleared { selection: FacetSelection },
}

/// Events emitted by the sort and page state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewEvent {
    /// A different sort option became active
    SortChanged { label: String, spec: SortSpec },
    /// The current page was changed by navigation
    PageChanged { page: usize },
    /// The page size changed
    PageSizeChanged { page_size: usize },
    /// The current page fell outside the result and was reset
    PageReset { from: usize, last_page: usize },
    /// Provider data was (re)loaded
    CatalogLoaded {
        products: usize,
        categories: usize,
        stores: usize,
    },
}

/// Top-level event wrapping facet and view events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowserEvent {
    Facet(FacetEvent),
    View(ViewEvent),
}

impl BrowserEvent {
    pub fn event_kind(&self) -> &str {
        match self {
            BrowserEvent::Facet(_) => "facet",
            BrowserEvent::View(_) => "view",
        }
    }

    /// Name of the facet this event relates to, if any
    pub fn facet_name(&self) -> Option<&str> {
        match self {
            BrowserEvent::Facet(e) => Some(match e {
                FacetEvent::Categories { .. } => "categories",
                FacetEvent::Stores { .. } => "stores",
                FacetEvent::Price { .. } => "price",
                FacetEvent::Ratings { .. } => "ratings",
                FacetEvent::Cleared { .. } => "all",
            }),
            BrowserEvent::View(_) => None,
        }
    }
}

impl From<FacetEvent> for BrowserEvent {
    fn from(event: FacetEvent) -> Self {
        BrowserEvent::Facet(event)
    }
}

impl From<ViewEvent> for BrowserEvent {
    fn from(event: ViewEvent) -> Self {
        BrowserEvent::View(event)
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: BrowserEvent,
}

impl EventEnvelope {
    pub fn new(event: BrowserEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; every clone publishes to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Returns the number of receivers that will see the event.
    pub fn publish(&self, event: impl Into<BrowserEvent>) -> usize {
        let envelope = EventEnvelope::new(event.into());
        // send() only errors when nobody is subscribed
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_event_serialization() {
        let event = BrowserEvent::Facet(FacetEvent::Ratings {
            selected: BTreeSet::from([4, 5]),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "facet");
        assert_eq!(json["facet"], "ratings");
        assert_eq!(json["selected"], serde_json::json!([4, 5]));
    }

    #[test]
    fn test_view_event_serialization() {
        let event = BrowserEvent::View(ViewEvent::PageReset {
            from: 3,
            last_page: 1,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "view");
        assert_eq!(json["action"], "page_reset");
        assert_eq!(json["from"], 3);
    }

    #[test]
    fn test_facet_name() {
        let event: BrowserEvent = FacetEvent::Stores {
            selected: BTreeSet::new(),
        }
        .into();
        assert_eq!(event.facet_name(), Some("stores"));
        assert_eq!(event.event_kind(), "facet");

        let event: BrowserEvent = ViewEvent::PageChanged { page: 1 }.into();
        assert_eq!(event.facet_name(), None);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(ViewEvent::PageChanged { page: 2 }), 0);
    }

    #[tokio::test]
    async fn test_publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(ViewEvent::PageSizeChanged { page_size: 12 }), 1);

        let envelope = rx.recv().await.unwrap();
        assert_eq!(
            envelope.event,
            BrowserEvent::View(ViewEvent::PageSizeChanged { page_size: 12 })
        );
    }

    #[tokio::test]
    async fn test_clones_share_channel() {
        let bus = EventBus::new(16);
        let clone = bus.clone();
        let mut rx = bus.subscribe();

        clone.publish(ViewEvent::PageChanged { page: 4 });

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event.event_kind(), "view");
        assert_eq!(bus.receiver_count(), 1);
    }
}
