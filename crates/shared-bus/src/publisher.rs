//! # Event Publisher
//!
//! Defines the publishing side of the event log.

use crate::events::{EventFilter, LoggedEvent, SuretyEvent};
use crate::subscriber::Subscription;
use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_RETENTION};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Trait for publishing events to the log.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Append an event to the log.
    ///
    /// # Returns
    ///
    /// The sequence number assigned to the event.
    async fn publish(&self, event: SuretyEvent) -> u64;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// Where a new subscription starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Replay every retained event, then continue live.
    Earliest,
    /// Replay retained events with a sequence strictly greater than this.
    After(u64),
    /// Only events published after the subscription is created.
    Latest,
}

/// Retained tail of the log plus the next sequence to hand out.
struct EventLog {
    retained: VecDeque<LoggedEvent>,
    next_sequence: u64,
    retention: usize,
}

impl EventLog {
    fn append(&mut self, event: SuretyEvent) -> LoggedEvent {
        let logged = LoggedEvent {
            sequence: self.next_sequence,
            event,
        };
        self.next_sequence += 1;
        self.retained.push_back(logged.clone());
        while self.retained.len() > self.retention {
            self.retained.pop_front();
        }
        logged
    }
}

/// In-memory implementation of the event log.
///
/// Uses `tokio::sync::broadcast` for live fan-out and a bounded `VecDeque`
/// for replay. Appending and subscribing both take the log lock, so a
/// subscriber that replays from the retained tail and then switches to the
/// live channel never sees a gap or a duplicate.
pub struct InMemoryEventBus {
    /// Broadcast sender for live events.
    sender: broadcast::Sender<LoggedEvent>,

    /// Retained events for replay.
    log: Mutex<EventLog>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity and retention.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CHANNEL_CAPACITY, DEFAULT_RETENTION)
    }

    /// Create a new in-memory event bus with specified limits.
    #[must_use]
    pub fn with_limits(capacity: usize, retention: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            log: Mutex::new(EventLog {
                retained: VecDeque::new(),
                next_sequence: 0,
                retention,
            }),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.subscribe_from(filter, StartPosition::Latest)
    }

    /// Subscribe starting at a log position.
    ///
    /// Matching retained events at or after `start` are delivered first, in
    /// log order, followed by live events.
    #[must_use]
    pub fn subscribe_from(&self, filter: EventFilter, start: StartPosition) -> Subscription {
        let log = self.log.lock();
        let receiver = self.sender.subscribe();
        let backlog: VecDeque<LoggedEvent> = match start {
            StartPosition::Latest => VecDeque::new(),
            StartPosition::Earliest => log
                .retained
                .iter()
                .filter(|e| filter.matches(&e.event))
                .cloned()
                .collect(),
            StartPosition::After(sequence) => log
                .retained
                .iter()
                .filter(|e| e.sequence > sequence && filter.matches(&e.event))
                .cloned()
                .collect(),
        };
        drop(log);

        debug!(
            topics = ?filter.topics,
            start = ?start,
            replay = backlog.len(),
            "New subscription created"
        );

        Subscription::new(receiver, backlog, filter)
    }

    /// Retained events matching a filter, oldest first.
    #[must_use]
    pub fn past_events(&self, filter: &EventFilter) -> Vec<LoggedEvent> {
        self.log
            .lock()
            .retained
            .iter()
            .filter(|e| filter.matches(&e.event))
            .cloned()
            .collect()
    }

    /// Sequence of the most recently published event.
    #[must_use]
    pub fn latest_sequence(&self) -> Option<u64> {
        self.log.lock().next_sequence.checked_sub(1)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: SuretyEvent) -> u64 {
        let topic = event.topic();
        let name = event.name();

        self.events_published.fetch_add(1, Ordering::Relaxed);

        let mut log = self.log.lock();
        let logged = log.append(event);
        let sequence = logged.sequence;

        // Sent under the log lock so replay and live delivery stay gap-free.
        let receivers = self.sender.send(logged).unwrap_or(0);
        drop(log);

        debug!(
            topic = ?topic,
            event = name,
            sequence,
            receivers,
            "Event published"
        );
        sequence
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
