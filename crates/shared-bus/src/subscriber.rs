//! # Event Subscriber
//!
//! Defines the subscription side of the event log.

use crate::events::{EventFilter, LoggedEvent};
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event log was dropped.
    #[error("Event log closed")]
    Closed,

    /// The subscriber fell behind the live channel and events were skipped.
    ///
    /// The subscription keeps working from the oldest event still buffered,
    /// but the caller should resubscribe from a known position to recover
    /// what it missed.
    #[error("Subscriber lagged, {missed} events missed")]
    Lagged {
        /// Number of events the channel dropped for this subscriber.
        missed: u64,
    },
}

/// A subscription handle for receiving events.
///
/// Replayed events (if any) are drained first, then live ones. Dropping it
/// releases its broadcast receiver.
pub struct Subscription {
    /// Live receiver.
    receiver: broadcast::Receiver<LoggedEvent>,

    /// Replay queue captured at subscribe time.
    backlog: VecDeque<LoggedEvent>,

    /// Highest sequence delivered so far.
    last_delivered: Option<u64>,

    /// Filter for this subscription.
    filter: EventFilter,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<LoggedEvent>,
        backlog: VecDeque<LoggedEvent>,
        filter: EventFilter,
    ) -> Self {
        Self {
            receiver,
            backlog,
            last_delivered: None,
            filter,
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// # Errors
    ///
    /// - `SubscriptionError::Closed` once the log is dropped and drained
    /// - `SubscriptionError::Lagged` when live events were skipped
    pub async fn recv(&mut self) -> Result<LoggedEvent, SubscriptionError> {
        if let Some(event) = self.backlog.pop_front() {
            return Ok(self.deliver(event));
        }

        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return Err(SubscriptionError::Closed),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, topics = ?self.filter.topics, "Subscriber lagged");
                    return Err(SubscriptionError::Lagged { missed });
                }
            };

            if self.accepts(&event) {
                return Ok(self.deliver(event));
            }
        }
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - No event available (would block)
    ///
    /// # Errors
    ///
    /// Same as [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Result<Option<LoggedEvent>, SubscriptionError> {
        if let Some(event) = self.backlog.pop_front() {
            return Ok(Some(self.deliver(event)));
        }

        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    return Err(SubscriptionError::Lagged { missed })
                }
            };

            if self.accepts(&event) {
                return Ok(Some(self.deliver(event)));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Events still queued for replay.
    #[must_use]
    pub fn pending_replay(&self) -> usize {
        self.backlog.len()
    }

    // Live events already covered by the replay are skipped.
    fn accepts(&self, event: &LoggedEvent) -> bool {
        let fresh = self.last_delivered.map_or(true, |last| event.sequence > last);
        fresh && self.filter.matches(&event.event)
    }

    fn deliver(&mut self, event: LoggedEvent) -> LoggedEvent {
        self.last_delivered = Some(event.sequence);
        event
    }
}
