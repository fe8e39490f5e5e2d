//! Policy entity and insurance parameters.

use serde::{Deserialize, Serialize};
use shared_types::{
    Amount, FlightKey, Identity, PolicyKey, PAYOUT_MULTIPLIER_DENOMINATOR,
    PAYOUT_MULTIPLIER_NUMERATOR, PREMIUM_CAP,
};

/// An insurance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Insured passenger.
    pub passenger: Identity,
    /// Insured flight.
    pub flight: FlightKey,
    /// Premium paid; at most the cap.
    pub premium: Amount,
    /// Flips to `true` exactly once.
    pub claimed: bool,
}

impl Policy {
    /// Key of this policy.
    #[must_use]
    pub fn key(&self) -> PolicyKey {
        PolicyKey::new(self.passenger, self.flight.clone())
    }
}

/// Insurance parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceConfig {
    /// Largest premium per policy.
    pub premium_cap: Amount,
    /// Payout multiplier numerator.
    pub payout_numerator: Amount,
    /// Payout multiplier denominator.
    pub payout_denominator: Amount,
}

impl InsuranceConfig {
    /// Payout owed on `premium`, rounded down.
    #[must_use]
    pub fn payout_for(&self, premium: Amount) -> Amount {
        if self.payout_denominator == 0 {
            return 0;
        }
        premium.saturating_mul(self.payout_numerator) / self.payout_denominator
    }
}

impl Default for InsuranceConfig {
    fn default() -> Self {
        Self {
            premium_cap: PREMIUM_CAP,
            payout_numerator: PAYOUT_MULTIPLIER_NUMERATOR,
            payout_denominator: PAYOUT_MULTIPLIER_DENOMINATOR,
        }
    }
}
