use std::collections::BTreeMap;

use branchgate_core::{BranchId, UserIdentity};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Role held by a user in each branch.
///
/// A map by construction, so a user holds at most one role per branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRoles(BTreeMap<BranchId, Role>);

impl BranchRoles {
    /// Creates an empty assignment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a role in a branch, returning the role it replaced.
    pub fn assign(&mut self, branch_id: BranchId, role: Role) -> Option<Role> {
        self.0.insert(branch_id, role)
    }

    /// Removes the role held in a branch.
    pub fn revoke(&mut self, branch_id: BranchId) -> Option<Role> {
        self.0.remove(&branch_id)
    }

    /// Returns the role held in a branch.
    #[must_use]
    pub fn role_in(&self, branch_id: BranchId) -> Option<Role> {
        self.0.get(&branch_id).copied()
    }

    /// Returns whether the user holds any role in the branch.
    #[must_use]
    pub fn contains_branch(&self, branch_id: BranchId) -> bool {
        self.0.contains_key(&branch_id)
    }

    /// Iterates over assignments ordered by branch id.
    pub fn iter(&self) -> impl Iterator<Item = (BranchId, Role)> + '_ {
        self.0.iter().map(|(branch_id, role)| (*branch_id, *role))
    }
}

impl FromIterator<(BranchId, Role)> for BranchRoles {
    fn from_iter<T: IntoIterator<Item = (BranchId, Role)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity under which policy answers may be shared.
///
/// Policy answers depend on the effective role only, so two actors with the
/// same key always receive the same answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorKey(Option<Role>);

impl ActorKey {
    /// Returns the effective role behind the key.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.0
    }
}

/// Requesting party as seen by the policy engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actor {
    role: Option<Role>,
    branch: Option<BranchId>,
}

impl Actor {
    /// Actor with no role; every query for it is denied.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Actor holding `role` in `branch`.
    #[must_use]
    pub fn new(role: Option<Role>, branch: Option<BranchId>) -> Self {
        Self { role, branch }
    }

    /// Actor holding `role` without branch context.
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            branch: None,
        }
    }

    /// Resolves the actor for a session identity.
    ///
    /// Missing identity, no active branch, or no role in the active branch
    /// all yield an actor without a role.
    #[must_use]
    pub fn resolve(identity: Option<&UserIdentity>, roles: &BranchRoles) -> Self {
        let Some(branch) = identity.and_then(UserIdentity::active_branch) else {
            return Self::anonymous();
        };

        Self {
            role: roles.role_in(branch),
            branch: Some(branch),
        }
    }

    /// Returns the effective role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Returns the branch the role applies to.
    #[must_use]
    pub fn branch(&self) -> Option<BranchId> {
        self.branch
    }

    /// Returns whether the actor holds no role.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.role.is_none()
    }

    /// Returns the memoization identity of this actor.
    #[must_use]
    pub fn key(&self) -> ActorKey {
        ActorKey(self.role)
    }
}
