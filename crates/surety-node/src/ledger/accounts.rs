//! Account balance book.
//!
//! Stands in for the value-transfer capability of the host ledger: calls that
//! carry value debit the sender, payouts credit the passenger.

use super::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{Amount, Identity};
use std::collections::HashMap;

/// Balances of external accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Accounts {
    balances: HashMap<Identity, Amount>,
}

impl Accounts {
    /// Empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance, zero for unknown accounts.
    #[must_use]
    pub fn balance_of(&self, account: &Identity) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Add `amount` and return the new balance.
    pub fn credit(&mut self, account: Identity, amount: Amount) -> Amount {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
        *balance
    }

    /// Remove `amount`.
    ///
    /// # Errors
    ///
    /// `InsufficientBalance` when the account holds less than `amount`.
    pub fn debit(&mut self, account: Identity, amount: Amount) -> LedgerResult<Amount> {
        let remaining = self.ensure(account, amount)?;
        self.balances.insert(account, remaining);
        Ok(remaining)
    }

    /// Check that `amount` could be debited and return what would remain.
    ///
    /// # Errors
    ///
    /// `InsufficientBalance` when the account holds less than `amount`.
    pub fn ensure(&self, account: Identity, amount: Amount) -> LedgerResult<Amount> {
        let balance = self.balance_of(&account);
        balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account,
                balance,
                required: amount,
            })
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.balances
            .values()
            .fold(0, |sum, balance| sum.saturating_add(*balance))
    }
}
