//! # Account Authority
//!
//! Owner-managed allow list plus an operational switch.

use super::errors::{AuthorityError, AuthorityResult};
use serde::{Deserialize, Serialize};
use shared_types::Identity;
use std::collections::HashSet;
use tracing::{debug, info};

/// Proof that an identity passed the authority gate.
///
/// Cannot be constructed outside this crate, so holding a reference to one
/// is the precondition for every registry mutation.
#[derive(Debug, PartialEq, Eq)]
pub struct AuthorizedCaller {
    identity: Identity,
}

impl AuthorizedCaller {
    /// The identity the gate admitted.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }
}

/// The permission gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountAuthority {
    owner: Identity,
    authorized: HashSet<Identity>,
    operational: bool,
}

impl AccountAuthority {
    /// Create an authority owned by `owner`. Starts operational with an
    /// empty allow list.
    #[must_use]
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            authorized: HashSet::new(),
            operational: true,
        }
    }

    /// The owning identity.
    #[must_use]
    pub fn owner(&self) -> Identity {
        self.owner
    }

    /// True when `identity` is the owner.
    #[must_use]
    pub fn is_owner(&self, identity: &Identity) -> bool {
        self.owner == *identity
    }

    /// Allow `identity` to mutate registry state.
    ///
    /// Returns `true` if the allow list changed.
    ///
    /// # Errors
    ///
    /// `NotOwner` unless `caller` is the owner.
    pub fn authorize(&mut self, caller: Identity, identity: Identity) -> AuthorityResult<bool> {
        self.ensure_owner(caller)?;
        let changed = self.authorized.insert(identity);
        if changed {
            info!(identity = %identity, "Identity authorized");
        }
        Ok(changed)
    }

    /// Withdraw a previous authorization.
    ///
    /// Returns `true` if the allow list changed.
    ///
    /// # Errors
    ///
    /// `NotOwner` unless `caller` is the owner.
    pub fn revoke(&mut self, caller: Identity, identity: Identity) -> AuthorityResult<bool> {
        self.ensure_owner(caller)?;
        let changed = self.authorized.remove(&identity);
        if changed {
            info!(identity = %identity, "Identity authorization revoked");
        }
        Ok(changed)
    }

    /// Whether `identity` is on the allow list.
    #[must_use]
    pub fn is_authorized(&self, identity: &Identity) -> bool {
        self.authorized.contains(identity)
    }

    /// Pause or resume all mutations.
    ///
    /// # Errors
    ///
    /// `NotOwner` unless `caller` is the owner.
    pub fn set_operational(&mut self, caller: Identity, operational: bool) -> AuthorityResult<()> {
        self.ensure_owner(caller)?;
        if self.operational != operational {
            info!(operational, "Operational status changed");
        }
        self.operational = operational;
        Ok(())
    }

    /// Whether mutations are currently allowed.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Issue the capability token for `identity`.
    ///
    /// # Errors
    ///
    /// - `NotOperational` while paused
    /// - `Unauthorized` if `identity` is not on the allow list
    pub fn capability(&self, identity: Identity) -> AuthorityResult<AuthorizedCaller> {
        if !self.operational {
            return Err(AuthorityError::NotOperational);
        }
        if !self.is_authorized(&identity) {
            debug!(identity = %identity, "Capability refused");
            return Err(AuthorityError::Unauthorized(identity));
        }
        Ok(AuthorizedCaller { identity })
    }

    fn ensure_owner(&self, caller: Identity) -> AuthorityResult<()> {
        if self.is_owner(&caller) {
            Ok(())
        } else {
            Err(AuthorityError::NotOwner(caller))
        }
    }
}
