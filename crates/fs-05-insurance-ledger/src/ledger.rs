//! # Insurance Ledger

use crate::domain::{InsuranceConfig, InsuranceError, InsuranceResult, Policy};
use fs_01_account_authority::AuthorizedCaller;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, FlightKey, Identity, PolicyKey, StatusCode};
use std::collections::HashMap;
use tracing::info;

/// Policies and the value backing them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsuranceLedger {
    policies: HashMap<PolicyKey, Policy>,
    /// Total value available for payouts.
    pool: Amount,
    /// Premiums of unclaimed policies.
    escrowed: Amount,
    config: InsuranceConfig,
}

impl InsuranceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new(config: InsuranceConfig) -> Self {
        Self {
            policies: HashMap::new(),
            pool: 0,
            escrowed: 0,
            config,
        }
    }

    /// Open a policy for `passenger` on `flight`, escrowing `premium`.
    ///
    /// # Errors
    ///
    /// - `ZeroPremium` / `PremiumAboveCap` outside `(0, cap]`
    /// - `AlreadyInsured` if the passenger already holds a policy here
    pub fn buy_insurance(
        &mut self,
        gate: &AuthorizedCaller,
        passenger: Identity,
        flight: FlightKey,
        premium: Amount,
    ) -> InsuranceResult<()> {
        let key = PolicyKey::new(passenger, flight.clone());
        self.check_purchase(&key, premium)?;

        info!(policy = %key, premium, via = %gate.identity().short(), "Insurance purchased");
        self.policies.insert(
            key,
            Policy {
                passenger,
                flight,
                premium,
                claimed: false,
            },
        );
        self.pool = self.pool.saturating_add(premium);
        self.escrowed = self.escrowed.saturating_add(premium);
        Ok(())
    }

    /// Validate a purchase without opening the policy.
    ///
    /// # Errors
    ///
    /// Same as [`InsuranceLedger::buy_insurance`].
    pub fn check_purchase(&self, key: &PolicyKey, premium: Amount) -> InsuranceResult<()> {
        if premium == 0 {
            return Err(InsuranceError::ZeroPremium);
        }
        if premium > self.config.premium_cap {
            return Err(InsuranceError::PremiumAboveCap {
                premium,
                cap: self.config.premium_cap,
            });
        }
        if self.policies.contains_key(key) {
            return Err(InsuranceError::AlreadyInsured(key.clone()));
        }
        Ok(())
    }

    /// Pay out a policy given the flight's resolved status.
    ///
    /// Returns the amount owed to the passenger.
    ///
    /// # Errors
    ///
    /// - `PolicyNotFound`
    /// - `AlreadyClaimed`
    /// - `NotPayable` unless `status` is `LateAirline`
    /// - `PoolExhausted` if the pool cannot cover the payout
    pub fn payout(
        &mut self,
        gate: &AuthorizedCaller,
        passenger: Identity,
        flight: FlightKey,
        status: StatusCode,
    ) -> InsuranceResult<Amount> {
        let key = PolicyKey::new(passenger, flight);
        let policy = self
            .policies
            .get_mut(&key)
            .ok_or_else(|| InsuranceError::PolicyNotFound(key.clone()))?;

        if policy.claimed {
            return Err(InsuranceError::AlreadyClaimed(key));
        }
        if !status.is_airline_fault() {
            return Err(InsuranceError::NotPayable { key, status });
        }

        let amount = self.config.payout_for(policy.premium);
        if amount > self.pool {
            return Err(InsuranceError::PoolExhausted {
                required: amount,
                available: self.pool,
            });
        }

        policy.claimed = true;
        self.pool -= amount;
        self.escrowed = self.escrowed.saturating_sub(policy.premium);
        info!(policy = %key, amount, via = %gate.identity().short(), "Insurance paid");
        Ok(amount)
    }

    /// Add airline funding to the payout pool.
    pub fn deposit_funding(&mut self, gate: &AuthorizedCaller, airline: Identity, amount: Amount) {
        self.pool = self.pool.saturating_add(amount);
        info!(
            airline = %airline,
            amount,
            pool = self.pool,
            via = %gate.identity().short(),
            "Funding added to pool"
        );
    }

    /// Value available for payouts.
    #[must_use]
    pub fn pool_balance(&self) -> Amount {
        self.pool
    }

    /// Premiums held for unclaimed policies.
    #[must_use]
    pub fn escrowed(&self) -> Amount {
        self.escrowed
    }

    /// Whether the passenger holds a policy on the flight.
    #[must_use]
    pub fn is_insurance_registered(&self, key: &PolicyKey) -> bool {
        self.policies.contains_key(key)
    }

    /// Policy record, if any.
    #[must_use]
    pub fn policy(&self, key: &PolicyKey) -> Option<&Policy> {
        self.policies.get(key)
    }

    /// Number of policies ever sold.
    #[must_use]
    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    /// Insurance parameters in force.
    #[must_use]
    pub fn config(&self) -> &InsuranceConfig {
        &self.config
    }
}
