//! # Shared Bus - Event Log for Surety Components
//!
//! The ledger substrate's event-log primitive. Components raise events as
//! part of a committed transaction; off-ledger participants (oracle agents,
//! clients) subscribe to them.
//!
//! ## Log Semantics
//!
//! - Every published event receives a strictly increasing sequence number,
//!   assigned in commit order.
//! - The last `retention` events are kept, so a subscriber may start from the
//!   earliest retained position (`fromBlock: 0` in ledger terms) and then
//!   continue live without gaps or duplicates.
//! - Delivery is push-based and unbounded in time; a subscriber that falls
//!   more than the channel capacity behind is told how many events it missed
//!   and is expected to resubscribe.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ SuretyLedger │                    │ OracleAgent  │
//! │  (commit)    │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Log   │          │
//!                  │  (retained)  │ ─────────┘
//!                  └──────────────┘  subscribe_from(Earliest)
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LoggedEvent, SuretyEvent};
pub use publisher::{EventPublisher, InMemoryEventBus, StartPosition};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before it is reported as lagged.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Events retained for replay to late subscribers.
pub const DEFAULT_RETENTION: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }

    #[test]
    fn test_retention_exceeds_channel_capacity() {
        assert!(DEFAULT_RETENTION >= DEFAULT_CHANNEL_CAPACITY);
    }
}
