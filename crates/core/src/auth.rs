use serde::{Deserialize, Serialize};

use crate::BranchId;

/// User information kept in the authenticated session.
///
/// The identity only records which branch the user is working in. Role
/// assignment per branch is owned by the auth collaborator and resolved into an
/// actor by the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    active_branch: Option<BranchId>,
}

impl UserIdentity {
    /// Creates a user identity with an optional active branch.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        active_branch: Option<BranchId>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            active_branch,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the branch the user is currently working in.
    #[must_use]
    pub fn active_branch(&self) -> Option<BranchId> {
        self.active_branch
    }

    /// Returns a copy of the identity with a different active branch.
    #[must_use]
    pub fn with_active_branch(mut self, branch_id: BranchId) -> Self {
        self.active_branch = Some(branch_id);
        self
    }
}
