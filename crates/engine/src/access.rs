//! Caller identity and role gates.
//!
//! Identity always comes from a [`CallContext`] built by the transport layer
//! after authentication. Principals that appear as plain arguments (a claimant,
//! a lookup key) only say *to whom* or *about whom*; they never say *who may*.

use crate::error::{LedgerError, LedgerResult};
use pool_ledger_domain::value_objects::Principal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Authenticated caller of a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    caller: Principal,
}

impl CallContext {
    /// Wraps an identity the transport has already authenticated.
    #[must_use]
    pub fn authenticated(caller: Principal) -> Self {
        Self { caller }
    }

    /// The caller.
    #[must_use]
    pub fn caller(&self) -> &Principal {
        &self.caller
    }
}

/// Privileged roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Pool administration.
    Owner,
    /// Cover issuance service.
    CoverService,
    /// Governance service settling approved claims.
    Governance,
}

impl Role {
    /// Converts role to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::CoverService => "cover_service",
            Self::Governance => "governance",
        }
    }
}

/// Role assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Pool administrator.
    pub owner: Principal,
    /// Cover service identity, if wired.
    pub cover_service: Option<Principal>,
    /// Governance service identity, if wired.
    pub governance: Option<Principal>,
}

impl AccessConfig {
    /// Config with only an owner.
    #[must_use]
    pub fn with_owner(owner: Principal) -> Self {
        Self {
            owner,
            cover_service: None,
            governance: None,
        }
    }

    fn holder(&self, role: Role) -> Option<&Principal> {
        match role {
            Role::Owner => Some(&self.owner),
            Role::CoverService => self.cover_service.as_ref(),
            Role::Governance => self.governance.as_ref(),
        }
    }
}

/// Enforces role gates on mutating operations.
#[derive(Debug)]
pub struct AccessControl {
    config: RwLock<AccessConfig>,
}

impl AccessControl {
    /// Creates the gate from initial assignments.
    #[must_use]
    pub fn new(config: AccessConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Checks whether `principal` holds `role`.
    pub async fn has_role(&self, principal: &Principal, role: Role) -> bool {
        self.config.read().await.holder(role) == Some(principal)
    }

    /// Fails with [`LedgerError::Unauthorized`] unless the caller holds `role`.
    pub async fn ensure(&self, call: &CallContext, role: Role) -> LedgerResult<()> {
        if self.has_role(call.caller(), role).await {
            Ok(())
        } else {
            warn!(caller = %call.caller(), role = role.as_str(), "Unauthorized call rejected");
            Err(LedgerError::Unauthorized)
        }
    }

    /// Current assignments.
    pub async fn config(&self) -> AccessConfig {
        self.config.read().await.clone()
    }

    /// Transfers ownership. Owner only.
    pub async fn set_owner(&self, call: &CallContext, new_owner: Principal) -> LedgerResult<()> {
        let mut config = self.config.write().await;
        if &config.owner != call.caller() {
            return Err(LedgerError::Unauthorized);
        }
        info!(old_owner = %config.owner, new_owner = %new_owner, "Ownership transferred");
        config.owner = new_owner;
        Ok(())
    }

    /// Rewires the collaborating services. Owner only.
    pub async fn set_collaborators(
        &self,
        call: &CallContext,
        cover_service: Option<Principal>,
        governance: Option<Principal>,
    ) -> LedgerResult<()> {
        let mut config = self.config.write().await;
        if &config.owner != call.caller() {
            return Err(LedgerError::Unauthorized);
        }
        config.cover_service = cover_service;
        config.governance = governance;
        info!(
            cover_service = ?config.cover_service,
            governance = ?config.governance,
            "Collaborators updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str) -> CallContext {
        CallContext::authenticated(Principal::from(id))
    }

    #[tokio::test]
    async fn test_roles_are_exact() {
        let access = AccessControl::new(AccessConfig {
            owner: Principal::from("owner"),
            cover_service: Some(Principal::from("cover")),
            governance: None,
        });

        assert!(access.ensure(&call("owner"), Role::Owner).await.is_ok());
        assert!(access.ensure(&call("cover"), Role::CoverService).await.is_ok());
        assert_eq!(
            access.ensure(&call("owner"), Role::CoverService).await,
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            access.ensure(&call("owner"), Role::Governance).await,
            Err(LedgerError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_set_owner() {
        let access = AccessControl::new(AccessConfig::with_owner(Principal::from("owner")));

        assert_eq!(
            access.set_owner(&call("mallory"), Principal::from("mallory")).await,
            Err(LedgerError::Unauthorized)
        );
        access
            .set_owner(&call("owner"), Principal::from("next"))
            .await
            .unwrap();
        assert!(access.has_role(&Principal::from("next"), Role::Owner).await);
        assert!(!access.has_role(&Principal::from("owner"), Role::Owner).await);
    }

    #[tokio::test]
    async fn test_set_collaborators() {
        let access = AccessControl::new(AccessConfig::with_owner(Principal::from("owner")));
        access
            .set_collaborators(
                &call("owner"),
                Some(Principal::from("cover")),
                Some(Principal::from("gov")),
            )
            .await
            .unwrap();
        assert!(access.has_role(&Principal::from("gov"), Role::Governance).await);
        assert_eq!(
            access.set_collaborators(&call("gov"), None, None).await,
            Err(LedgerError::Unauthorized)
        );
    }
}
