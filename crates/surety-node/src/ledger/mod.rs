//! # Surety Ledger
//!
//! The serialized substrate every surety call runs on, and the application
//! facade exposing the external operations.
//!
//! ## Transaction Model
//!
//! ```text
//! call ──► lock ──► check phase (read only)
//!                        │
//!        Err ◄───────────┤ (nothing touched, no events)
//!                        ▼
//!                   apply phase (infallible)
//!                        │
//!                   publish events (still locked)
//! ```
//!
//! Every operation runs all of its fallible checks before its first write,
//! and each component call it applies afterwards either fails without effect
//! or succeeds. One `tokio::sync::Mutex` covers all state, so transactions
//! have a strict total order and events reach the log in commit order.

mod accounts;
mod error;
mod state;

pub use accounts::Accounts;
pub use error::{LedgerError, LedgerResult};
pub use state::LedgerState;

use crate::container::ProtocolConfig;
use fs_01_account_authority::{AuthorityError, AuthorizedCaller};
use fs_02_airline_registry::Admission;
use fs_03_flight_registry::FlightError;
use fs_04_oracle_consensus::{Attestation, EntropySource, RoundKey};
use shared_bus::{
    EventFilter, EventPublisher, InMemoryEventBus, LoggedEvent, StartPosition, Subscription,
    SuretyEvent,
};
use shared_types::{Amount, FlightKey, Identity, PolicyKey, StatusCode, ORACLE_INDEX_COUNT};
use tokio::sync::Mutex;
use tracing::{debug, warn};

struct Inner {
    state: LedgerState,
    entropy: Box<dyn EntropySource>,
}

/// The flight surety ledger.
pub struct SuretyLedger {
    app: Identity,
    inner: Mutex<Inner>,
    bus: InMemoryEventBus,
}

impl SuretyLedger {
    /// Create an empty ledger owned by `owner`.
    ///
    /// `app` is the identity the facade presents to the authority; it must be
    /// authorized with [`SuretyLedger::authorize_app`] before any registry
    /// mutation succeeds.
    pub fn new(
        owner: Identity,
        app: Identity,
        protocol: &ProtocolConfig,
        bus: InMemoryEventBus,
        entropy: Box<dyn EntropySource>,
    ) -> Self {
        Self {
            app,
            inner: Mutex::new(Inner {
                state: LedgerState::new(owner, protocol),
                entropy,
            }),
            bus,
        }
    }

    /// Identity the facade acts as.
    #[must_use]
    pub fn app(&self) -> Identity {
        self.app
    }

    /// Run `operation` as one transaction.
    ///
    /// `f` must return every error before its first write to `state`.
    async fn transact<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(
            &mut LedgerState,
            &mut dyn EntropySource,
        ) -> LedgerResult<(T, Vec<SuretyEvent>)>,
    ) -> LedgerResult<T> {
        let mut inner = self.inner.lock().await;
        let Inner { state, entropy } = &mut *inner;

        let (value, events) = match f(state, entropy.as_mut()) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(operation, kind = %e.kind(), error = %e, "Call rejected");
                return Err(e);
            }
        };

        for event in events {
            let sequence = self.bus.publish(event.clone()).await;
            log_event(&LoggedEvent { sequence, event });
        }
        Ok(value)
    }

    /// Read committed state.
    async fn query<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> T {
        let inner = self.inner.lock().await;
        f(&inner.state)
    }

    fn gate(&self, state: &LedgerState) -> LedgerResult<AuthorizedCaller> {
        Ok(state.authority.capability(self.app)?)
    }

    // =========================================================================
    // AUTHORITY
    // =========================================================================

    /// Allow `identity` to drive the registries. Owner only.
    ///
    /// # Errors
    ///
    /// `NotOwner` for any other caller.
    pub async fn authorize_app(&self, caller: Identity, identity: Identity) -> LedgerResult<bool> {
        self.transact("authorize_app", |state, _| {
            Ok((state.authority.authorize(caller, identity)?, Vec::new()))
        })
        .await
    }

    /// Withdraw a previous authorization. Owner only.
    ///
    /// # Errors
    ///
    /// `NotOwner` for any other caller.
    pub async fn revoke_app(&self, caller: Identity, identity: Identity) -> LedgerResult<bool> {
        self.transact("revoke_app", |state, _| {
            Ok((state.authority.revoke(caller, identity)?, Vec::new()))
        })
        .await
    }

    /// Pause or resume every gated mutation. Owner only.
    ///
    /// # Errors
    ///
    /// `NotOwner` for any other caller.
    pub async fn set_operational(&self, caller: Identity, operational: bool) -> LedgerResult<()> {
        self.transact("set_operational", |state, _| {
            state.authority.set_operational(caller, operational)?;
            Ok(((), Vec::new()))
        })
        .await
    }

    /// Whether `identity` is authorized.
    pub async fn is_authorized_app(&self, identity: Identity) -> bool {
        self.query(|state| state.authority.is_authorized(&identity)).await
    }

    /// Whether gated mutations are accepted.
    pub async fn is_operational(&self) -> bool {
        self.query(|state| state.authority.is_operational()).await
    }

    // =========================================================================
    // AIRLINES
    // =========================================================================

    /// Admit the first airline. Owner only, once.
    ///
    /// # Errors
    ///
    /// `NotOwner`, `AlreadyBootstrapped`, or any gate failure.
    pub async fn bootstrap_airline(&self, caller: Identity, airline: Identity) -> LedgerResult<()> {
        self.transact("bootstrap_airline", |state, _| {
            if !state.authority.is_owner(&caller) {
                return Err(AuthorityError::NotOwner(caller).into());
            }
            let gate = self.gate(state)?;
            state.airlines.bootstrap(&gate, airline)?;
            Ok(((), vec![SuretyEvent::AirlineRegistered { airline }]))
        })
        .await
    }

    /// Nominate or vote for `candidate`. The caller must be a funded airline.
    ///
    /// # Errors
    ///
    /// See [`fs_02_airline_registry::AirlineRegistry::register`].
    pub async fn register_airline(
        &self,
        caller: Identity,
        candidate: Identity,
    ) -> LedgerResult<Admission> {
        self.transact("register_airline", |state, _| {
            let gate = self.gate(state)?;
            let admission = state.airlines.register(&gate, candidate, caller)?;
            let events = match admission {
                Admission::Admitted => vec![SuretyEvent::AirlineRegistered { airline: candidate }],
                Admission::Pending { .. } | Admission::AlreadyMember => Vec::new(),
            };
            Ok((admission, events))
        })
        .await
    }

    /// Deposit the caller's funding. Returns `false` if it was already funded,
    /// in which case no value moves.
    ///
    /// # Errors
    ///
    /// `NotRegistered`, `InsufficientFunding`, `InsufficientBalance`.
    pub async fn fund_airline(&self, caller: Identity, value: Amount) -> LedgerResult<bool> {
        self.transact("fund_airline", |state, _| {
            let gate = self.gate(state)?;
            if !state.airlines.check_funding(caller, value)? {
                return Ok((false, Vec::new()));
            }
            state.accounts.ensure(caller, value)?;

            state.airlines.fund(&gate, caller, value)?;
            state.accounts.debit(caller, value)?;
            state.insurance.deposit_funding(&gate, caller, value);
            Ok((
                true,
                vec![SuretyEvent::AirlineFunded {
                    airline: caller,
                    amount: value,
                }],
            ))
        })
        .await
    }

    /// Registered or Funded.
    pub async fn is_airline_registered(&self, airline: Identity) -> bool {
        self.query(|state| state.airlines.is_registered(&airline)).await
    }

    /// Funded.
    pub async fn is_airline_funded(&self, airline: Identity) -> bool {
        self.query(|state| state.airlines.is_funded(&airline)).await
    }

    // =========================================================================
    // FLIGHTS
    // =========================================================================

    /// Add a flight operated by the caller.
    ///
    /// # Errors
    ///
    /// `AirlineNotFunded` unless the caller is a funded airline;
    /// `AlreadyRegistered` for a duplicate key.
    pub async fn register_flight(
        &self,
        caller: Identity,
        designator: impl Into<String>,
        timestamp: u64,
    ) -> LedgerResult<FlightKey> {
        let flight = FlightKey::new(caller, designator, timestamp);
        self.transact("register_flight", |state, _| {
            let gate = self.gate(state)?;
            if !state.airlines.is_funded(&caller) {
                return Err(LedgerError::AirlineNotFunded(caller));
            }
            state.flights.register_flight(&gate, flight.clone())?;
            Ok((
                flight.clone(),
                vec![SuretyEvent::FlightRegistered { flight }],
            ))
        })
        .await
    }

    /// Whether the flight is in the catalog.
    pub async fn is_flight_registered(
        &self,
        airline: Identity,
        designator: &str,
        timestamp: u64,
    ) -> bool {
        let flight = FlightKey::new(airline, designator, timestamp);
        self.query(|state| state.flights.is_flight_registered(&flight)).await
    }

    /// Resolved status of a flight, `Unknown` until consensus.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unregistered flight.
    pub async fn get_flight_status_code(
        &self,
        airline: Identity,
        designator: &str,
        timestamp: u64,
    ) -> LedgerResult<StatusCode> {
        let flight = FlightKey::new(airline, designator, timestamp);
        self.query(|state| state.flights.status_code(&flight).map_err(LedgerError::from)).await
    }

    // =========================================================================
    // ORACLES
    // =========================================================================

    /// Join the oracle roster, paying `value` as the registration fee.
    ///
    /// # Errors
    ///
    /// `InsufficientFee`, `AlreadyRegistered`, `InsufficientBalance`.
    pub async fn register_oracle(
        &self,
        caller: Identity,
        value: Amount,
    ) -> LedgerResult<[u8; ORACLE_INDEX_COUNT]> {
        let app = self.app;
        self.transact("register_oracle", |state, entropy| {
            let gate = self.gate(state)?;
            state.consensus.check_registration(caller, value)?;
            state.accounts.ensure(caller, value)?;

            let indexes = state
                .consensus
                .register_oracle(&gate, caller, value, entropy)?;
            state.accounts.debit(caller, value)?;
            state.accounts.credit(app, value);
            Ok((
                indexes,
                vec![SuretyEvent::OracleRegistered {
                    oracle: caller,
                    indexes,
                }],
            ))
        })
        .await
    }

    /// Indexes assigned to the caller.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if the caller is not an oracle.
    pub async fn get_my_indexes(&self, caller: Identity) -> LedgerResult<[u8; ORACLE_INDEX_COUNT]> {
        self.query(|state| {
            state
                .consensus
                .get_my_indexes(&caller)
                .map_err(LedgerError::from)
        })
        .await
    }

    /// Whether `oracle` is on the roster.
    pub async fn is_oracle_registered(&self, oracle: Identity) -> bool {
        self.query(|state| state.consensus.is_oracle_registered(&oracle)).await
    }

    /// Open a status round and emit an `OracleRequest` for it.
    ///
    /// Allowed for funded airlines and the authority owner. A round that
    /// already exists under the drawn index is reused, and the request is
    /// re-emitted so late oracles see it.
    ///
    /// # Errors
    ///
    /// `RequesterNotAllowed`, or `NotFound` for an unregistered flight.
    pub async fn fetch_flight_status(
        &self,
        caller: Identity,
        airline: Identity,
        designator: &str,
        timestamp: u64,
    ) -> LedgerResult<RoundKey> {
        let flight = FlightKey::new(airline, designator, timestamp);
        self.transact("fetch_flight_status", |state, entropy| {
            let gate = self.gate(state)?;
            if !state.airlines.is_funded(&caller) && !state.authority.is_owner(&caller) {
                return Err(LedgerError::RequesterNotAllowed(caller));
            }
            if !state.flights.is_flight_registered(&flight) {
                return Err(FlightError::NotFound(flight.clone()).into());
            }
            let key = state
                .consensus
                .request_status(&gate, flight.clone(), caller, entropy);
            let event = SuretyEvent::OracleRequest {
                index: key.index,
                airline: flight.airline,
                designator: flight.designator.clone(),
                timestamp: flight.timestamp,
            };
            Ok((key, vec![event]))
        })
        .await
    }

    /// Count an oracle attestation; finalizing the round records the flight
    /// status.
    ///
    /// A round that closes after the flight was resolved by another round
    /// returns [`Attestation::Superseded`] and leaves the status alone.
    ///
    /// # Errors
    ///
    /// See [`fs_04_oracle_consensus::ConsensusEngine::submit_response`].
    pub async fn submit_oracle_response(
        &self,
        caller: Identity,
        index: u8,
        airline: Identity,
        designator: &str,
        timestamp: u64,
        status: StatusCode,
    ) -> LedgerResult<Attestation> {
        let flight = FlightKey::new(airline, designator, timestamp);
        self.transact("submit_oracle_response", |state, _| {
            let gate = self.gate(state)?;
            if !state.flights.is_flight_registered(&flight) {
                return Err(FlightError::NotFound(flight.clone()).into());
            }
            let outcome = state
                .consensus
                .submit_response(&gate, index, flight.clone(), status, caller)?;

            let mut events = vec![SuretyEvent::OracleReport {
                index,
                airline,
                designator: flight.designator.clone(),
                timestamp,
                status,
                oracle: caller,
            }];
            if let Attestation::Finalized(resolved) = outcome {
                if state.flights.record_status(&gate, &flight, resolved)? {
                    events.push(SuretyEvent::FlightStatusInfo {
                        airline,
                        designator: flight.designator.clone(),
                        timestamp,
                        status: resolved,
                    });
                }
            }
            Ok((outcome, events))
        })
        .await
    }

    // =========================================================================
    // INSURANCE
    // =========================================================================

    /// Buy a policy on a registered flight, paying `value` as the premium.
    ///
    /// # Errors
    ///
    /// `NotFound`, `ZeroPremium`, `PremiumAboveCap`, `AlreadyInsured`,
    /// `InsufficientBalance`.
    pub async fn buy_insurance(
        &self,
        caller: Identity,
        airline: Identity,
        designator: &str,
        timestamp: u64,
        value: Amount,
    ) -> LedgerResult<()> {
        let flight = FlightKey::new(airline, designator, timestamp);
        self.transact("buy_insurance", |state, _| {
            let gate = self.gate(state)?;
            if !state.flights.is_flight_registered(&flight) {
                return Err(FlightError::NotFound(flight.clone()).into());
            }
            state
                .insurance
                .check_purchase(&PolicyKey::new(caller, flight.clone()), value)?;
            state.accounts.ensure(caller, value)?;

            state
                .insurance
                .buy_insurance(&gate, caller, flight.clone(), value)?;
            state.accounts.debit(caller, value)?;
            Ok((
                (),
                vec![SuretyEvent::InsurancePurchased {
                    passenger: caller,
                    flight,
                    premium: value,
                }],
            ))
        })
        .await
    }

    /// Whether `passenger` holds a policy on the flight.
    pub async fn is_insurance_registered(
        &self,
        passenger: Identity,
        airline: Identity,
        designator: &str,
        timestamp: u64,
    ) -> bool {
        let key = PolicyKey::new(passenger, FlightKey::new(airline, designator, timestamp));
        self.query(|state| state.insurance.is_insurance_registered(&key)).await
    }

    /// Pay out the caller's policy if the flight resolved to an airline fault.
    ///
    /// Returns the amount credited to the caller.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PolicyNotFound`, `AlreadyClaimed`, `NotPayable`,
    /// `PoolExhausted`.
    pub async fn payout(
        &self,
        caller: Identity,
        airline: Identity,
        designator: &str,
        timestamp: u64,
    ) -> LedgerResult<Amount> {
        let flight = FlightKey::new(airline, designator, timestamp);
        self.transact("payout", |state, _| {
            let gate = self.gate(state)?;
            let status = state.flights.status_code(&flight)?;
            let amount = state
                .insurance
                .payout(&gate, caller, flight.clone(), status)?;
            state.accounts.credit(caller, amount);
            Ok((
                amount,
                vec![SuretyEvent::InsurancePaid {
                    passenger: caller,
                    flight,
                    amount,
                }],
            ))
        })
        .await
    }

    /// Value held for payouts.
    pub async fn pool_balance(&self) -> Amount {
        self.query(|state| state.insurance.pool_balance()).await
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// Credit an external account. Used for genesis balances and test faucets.
    pub async fn deposit(&self, account: Identity, amount: Amount) -> Amount {
        let mut inner = self.inner.lock().await;
        let balance = inner.state.accounts.credit(account, amount);
        debug!(account = %account.short(), amount, balance, "Deposit");
        balance
    }

    /// Balance of an external account.
    pub async fn balance_of(&self, account: Identity) -> Amount {
        self.query(|state| state.accounts.balance_of(&account)).await
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Subscribe to committed events.
    pub fn subscribe(&self, filter: EventFilter, start: StartPosition) -> Subscription {
        self.bus.subscribe_from(filter, start)
    }

    /// Retained events matching `filter`, oldest first.
    #[must_use]
    pub fn past_events(&self, filter: &EventFilter) -> Vec<LoggedEvent> {
        self.bus.past_events(filter)
    }

    /// Events committed so far.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.bus.events_published()
    }
}

fn log_event(logged: &LoggedEvent) {
    match serde_json::to_string(logged) {
        Ok(json) => debug!("EVENT_FLOW_JSON {}", json),
        Err(e) => warn!(sequence = logged.sequence, error = %e, "Event not serializable"),
    }
}
