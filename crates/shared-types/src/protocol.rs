//! # Protocol Constants
//!
//! Default parameters of the admission, consensus and insurance rules.
//! Components take these through their config structs so tests can tighten
//! them, but the deployed values are the ones below.

use crate::entities::{ether, Amount, ETHER};

/// Registered airlines admitted without voting while below this count.
pub const ADMISSION_THRESHOLD: usize = 4;

/// Minimum value an airline must deposit to become Funded.
pub const FUNDING_MINIMUM: Amount = ether(10);

/// Fee an oracle pays to join the roster.
pub const REGISTRATION_FEE: Amount = ETHER;

/// Matching attestations required to finalize a round.
pub const MIN_RESPONSES: usize = 3;

/// Indexes are drawn from `[0, INDEX_RANGE)`.
pub const INDEX_RANGE: u8 = 10;

/// Indexes assigned to each oracle at registration.
pub const ORACLE_INDEX_COUNT: usize = 3;

/// Largest premium a passenger may pay for one policy.
pub const PREMIUM_CAP: Amount = ETHER;

/// Payout multiplier numerator (payout = premium × 3 / 2).
pub const PAYOUT_MULTIPLIER_NUMERATOR: Amount = 3;

/// Payout multiplier denominator.
pub const PAYOUT_MULTIPLIER_DENOMINATOR: Amount = 2;

/// Payout owed for a premium: `premium × 1.5`, rounded down.
#[must_use]
pub const fn payout_for(premium: Amount) -> Amount {
    premium.saturating_mul(PAYOUT_MULTIPLIER_NUMERATOR) / PAYOUT_MULTIPLIER_DENOMINATOR
}

/// Distinct votes a pending candidate needs: `ceil(registered / 2)`.
#[must_use]
pub const fn required_votes(registered_count: usize) -> usize {
    registered_count.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_is_one_and_a_half() {
        assert_eq!(payout_for(ETHER), ETHER + ETHER / 2);
        assert_eq!(payout_for(ETHER / 2), 3 * ETHER / 4);
        assert_eq!(payout_for(0), 0);
    }

    #[test]
    fn test_required_votes_rounds_up() {
        assert_eq!(required_votes(4), 2);
        assert_eq!(required_votes(5), 3);
        assert_eq!(required_votes(6), 3);
        assert_eq!(required_votes(1), 1);
    }
}
