//! # Client Event Publishing
//!
//! After a client is created (or an existing one updated) the HTTP layer tells an
//! [`EventPublisher`]. Publishing is fire-and-forget: the publisher only has to
//! hand the event off, and nothing it or its downstream [`EventSink`] does can
//! fail or delay the request that triggered it.
//!
//! [`ChannelEventPublisher`] is the production publisher. It pushes events onto an
//! unbounded channel that a spawned task drains into the sink, so a slow sink only
//! grows the queue. [`EventLog`] is an in-memory sink standing in for a message
//! bus; it is passed in explicitly, so every publisher has its own log.
//!
//! ```text
//! handler ──notify_created──▶ channel ──drain task──▶ EventSink
//!    │                                                  (EventLog)
//!    └── responds immediately
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::Client;

///////////////////////////////////////////// ClientEvent /////////////////////////////////////////////

/// The kind of change a [`ClientEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientEventKind {
    /// A new client was stored.
    Created,
    /// An existing client's details were overwritten.
    Updated,
}

impl Display for ClientEventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ClientEventKind::Created => write!(f, "created"),
            ClientEventKind::Updated => write!(f, "updated"),
        }
    }
}

/// A change to a client record, as delivered to an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEvent {
    /// What happened.
    pub kind: ClientEventKind,
    /// The client as it was submitted.
    pub client: Client,
    /// When the event was raised.
    pub occurred_at: DateTime<Utc>,
}

impl ClientEvent {
    /// Creates an event stamped with the current time.
    pub fn new(kind: ClientEventKind, client: Client) -> Self {
        Self {
            kind,
            client,
            occurred_at: Utc::now(),
        }
    }
}

/////////////////////////////////////////////// Traits /////////////////////////////////////////////////

/// Notification capability handed to the HTTP layer.
///
/// Both methods must return promptly and must never panic on delivery problems.
pub trait EventPublisher: Send + Sync {
    /// Announces that `client` was created.
    fn notify_created(&self, client: &Client);

    /// Announces that `client` was updated.
    fn notify_updated(&self, client: &Client);
}

/// Downstream consumer of client events.
pub trait EventSink: Send + Sync {
    /// Accepts one event.
    fn record(&self, event: ClientEvent);
}

//////////////////////////////////////// ChannelEventPublisher /////////////////////////////////////////

/// Publisher that decouples callers from the sink with an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelEventPublisher {
    sender: UnboundedSender<ClientEvent>,
}

impl ChannelEventPublisher {
    /// Starts a drain task forwarding events to `sink`.
    ///
    /// Must be called from within a tokio runtime. The task ends once every clone
    /// of the returned publisher has been dropped and the queue is empty.
    pub fn spawn(sink: Arc<dyn EventSink>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = unbounded_channel();
        let handle = tokio::spawn(drain(receiver, sink));
        (Self { sender }, handle)
    }

    fn publish(&self, kind: ClientEventKind, client: &Client) {
        if let Err(e) = self.sender.send(ClientEvent::new(kind, client.clone())) {
            tracing::warn!(
                client_id = %e.0.client.id,
                kind = %e.0.kind,
                "event sink unavailable; dropping client event"
            );
        }
    }
}

impl EventPublisher for ChannelEventPublisher {
    fn notify_created(&self, client: &Client) {
        self.publish(ClientEventKind::Created, client);
    }

    fn notify_updated(&self, client: &Client) {
        self.publish(ClientEventKind::Updated, client);
    }
}

async fn drain(mut receiver: UnboundedReceiver<ClientEvent>, sink: Arc<dyn EventSink>) {
    while let Some(event) = receiver.recv().await {
        tracing::info!(client_id = %event.client.id, kind = %event.kind, "client event published");
        sink.record(event);
        tracing::debug!(pending = receiver.len(), "events in queue");
    }
    tracing::debug!("client event channel closed");
}

/////////////////////////////////////////// NoopEventPublisher /////////////////////////////////////////

/// Publisher that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventPublisher;

impl EventPublisher for NoopEventPublisher {
    fn notify_created(&self, _client: &Client) {}

    fn notify_updated(&self, _client: &Client) {}
}

/////////////////////////////////////////////// EventLog ///////////////////////////////////////////////

/// In-memory sink that keeps every event it receives, oldest first.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ClientEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn record(&self, event: ClientEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
