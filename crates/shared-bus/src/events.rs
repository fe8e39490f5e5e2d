//! # Surety Events
//!
//! Defines every event a committed ledger transaction can raise.

use serde::{Deserialize, Serialize};
use shared_types::{Amount, FlightKey, Identity, StatusCode};

/// All events that can be published to the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuretyEvent {
    // =========================================================================
    // COMPONENT 2: AIRLINE REGISTRY
    // =========================================================================
    /// An airline completed admission.
    AirlineRegistered {
        /// The admitted airline.
        airline: Identity,
    },

    /// An airline deposited its funding and may now operate.
    AirlineFunded {
        /// The funded airline.
        airline: Identity,
        /// Deposited value.
        amount: Amount,
    },

    // =========================================================================
    // COMPONENT 3: FLIGHT REGISTRY
    // =========================================================================
    /// A flight was added to the catalog.
    FlightRegistered {
        /// The new flight.
        flight: FlightKey,
    },

    // =========================================================================
    // COMPONENT 4: ORACLE CONSENSUS
    // =========================================================================
    /// An oracle joined the roster.
    OracleRegistered {
        /// The oracle identity.
        oracle: Identity,
        /// Indexes it will answer for.
        indexes: [u8; 3],
    },

    /// A status round was opened; oracles holding `index` should attest.
    OracleRequest {
        /// Shard index selected for this request.
        index: u8,
        /// Operating airline.
        airline: Identity,
        /// Flight designator.
        designator: String,
        /// Scheduled departure.
        timestamp: u64,
    },

    /// An attestation was accepted into a round's tally.
    OracleReport {
        /// Round index.
        index: u8,
        /// Operating airline.
        airline: Identity,
        /// Flight designator.
        designator: String,
        /// Scheduled departure.
        timestamp: u64,
        /// Attested status.
        status: StatusCode,
        /// Attesting oracle.
        oracle: Identity,
    },

    /// A round reached consensus and the flight status was resolved.
    FlightStatusInfo {
        /// Operating airline.
        airline: Identity,
        /// Flight designator.
        designator: String,
        /// Scheduled departure.
        timestamp: u64,
        /// Resolved status.
        status: StatusCode,
    },

    // =========================================================================
    // COMPONENT 5: INSURANCE LEDGER
    // =========================================================================
    /// A passenger bought a policy.
    InsurancePurchased {
        /// Insured passenger.
        passenger: Identity,
        /// Insured flight.
        flight: FlightKey,
        /// Escrowed premium.
        premium: Amount,
    },

    /// A policy paid out.
    InsurancePaid {
        /// Insured passenger.
        passenger: Identity,
        /// Insured flight.
        flight: FlightKey,
        /// Amount credited to the passenger.
        amount: Amount,
    },
}

impl SuretyEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::AirlineRegistered { .. } | Self::AirlineFunded { .. } => EventTopic::Admission,
            Self::FlightRegistered { .. } => EventTopic::Flights,
            Self::OracleRegistered { .. } => EventTopic::Oracles,
            Self::OracleRequest { .. } => EventTopic::Requests,
            Self::OracleReport { .. } | Self::FlightStatusInfo { .. } => EventTopic::Consensus,
            Self::InsurancePurchased { .. } | Self::InsurancePaid { .. } => EventTopic::Insurance,
        }
    }

    /// Get the originating component number.
    #[must_use]
    pub fn source_component(&self) -> u8 {
        match self {
            Self::AirlineRegistered { .. } | Self::AirlineFunded { .. } => 2,
            Self::FlightRegistered { .. } => 3,
            Self::OracleRegistered { .. }
            | Self::OracleRequest { .. }
            | Self::OracleReport { .. }
            | Self::FlightStatusInfo { .. } => 4,
            Self::InsurancePurchased { .. } | Self::InsurancePaid { .. } => 5,
        }
    }

    /// Short event name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AirlineRegistered { .. } => "AirlineRegistered",
            Self::AirlineFunded { .. } => "AirlineFunded",
            Self::FlightRegistered { .. } => "FlightRegistered",
            Self::OracleRegistered { .. } => "OracleRegistered",
            Self::OracleRequest { .. } => "OracleRequest",
            Self::OracleReport { .. } => "OracleReport",
            Self::FlightStatusInfo { .. } => "FlightStatusInfo",
            Self::InsurancePurchased { .. } => "InsurancePurchased",
            Self::InsurancePaid { .. } => "InsurancePaid",
        }
    }

    /// Flight the event refers to, when it names one.
    #[must_use]
    pub fn flight_key(&self) -> Option<FlightKey> {
        match self {
            Self::OracleRequest {
                airline,
                designator,
                timestamp,
                ..
            }
            | Self::OracleReport {
                airline,
                designator,
                timestamp,
                ..
            }
            | Self::FlightStatusInfo {
                airline,
                designator,
                timestamp,
                ..
            } => Some(FlightKey::new(*airline, designator.clone(), *timestamp)),
            Self::FlightRegistered { flight }
            | Self::InsurancePurchased { flight, .. }
            | Self::InsurancePaid { flight, .. } => Some(flight.clone()),
            Self::AirlineRegistered { .. }
            | Self::AirlineFunded { .. }
            | Self::OracleRegistered { .. } => None,
        }
    }
}

/// An event together with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Position in the log, strictly increasing in commit order.
    pub sequence: u64,
    /// The event itself.
    pub event: SuretyEvent,
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Airline admission and funding.
    Admission,
    /// Flight catalog.
    Flights,
    /// Oracle roster.
    Oracles,
    /// Status requests addressed to index holders.
    Requests,
    /// Attestations and resolutions.
    Consensus,
    /// Policies and payouts.
    Insurance,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source components to include. Empty means all sources.
    pub source_components: Vec<u8>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_components: Vec::new(),
        }
    }

    /// Create a filter for events from specific components.
    #[must_use]
    pub fn from_components(components: Vec<u8>) -> Self {
        Self {
            topics: Vec::new(),
            source_components: components,
        }
    }

    /// Only status requests, which is what oracle agents listen to.
    #[must_use]
    pub fn oracle_requests() -> Self {
        Self::topics(vec![EventTopic::Requests])
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SuretyEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_components.is_empty()
            || self.source_components.contains(&event.source_component());

        topic_match && source_match
    }
}
