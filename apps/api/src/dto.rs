use branchgate_application::CapabilitySnapshot;
use branchgate_core::{BranchId, UserIdentity};
use branchgate_domain::{Actor, Role};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API health response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub policy_version: u32,
}

/// What the session actor may do and see on one resource.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/capability-response.ts"
)]
pub struct CapabilityResponse {
    pub resource: String,
    pub actions: Vec<String>,
    pub tabs: Vec<String>,
    pub sections: Vec<String>,
    pub buttons: Vec<String>,
    pub default_tab: Option<String>,
}

impl From<CapabilitySnapshot> for CapabilityResponse {
    fn from(value: CapabilitySnapshot) -> Self {
        Self {
            resource: value.resource,
            actions: value
                .actions
                .into_iter()
                .map(|action| action.as_str().to_owned())
                .collect(),
            tabs: value.tabs,
            sections: value.sections,
            buttons: value.buttons,
            default_tab: value.default_tab,
        }
    }
}

/// Session actor as seen by the client.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/actor-response.ts"
)]
pub struct ActorResponse {
    pub authenticated: bool,
    pub subject: Option<String>,
    pub display_name: Option<String>,
    pub branch_id: Option<String>,
    pub role: Option<String>,
}

impl ActorResponse {
    pub fn from_session(identity: Option<&UserIdentity>, actor: Actor) -> Self {
        Self {
            authenticated: identity.is_some(),
            subject: identity.map(|identity| identity.subject().to_owned()),
            display_name: identity.map(|identity| identity.display_name().to_owned()),
            branch_id: actor.branch().map(|branch_id| branch_id.to_string()),
            role: actor.role().map(|role| role.as_str().to_owned()),
        }
    }
}

/// Incoming payload for switching the active branch.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/switch-branch-request.ts"
)]
pub struct SwitchBranchRequest {
    pub branch_id: String,
}

/// One branch-role assignment in a development session.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/branch-role-request.ts"
)]
pub struct BranchRoleRequest {
    pub branch_id: String,
    pub role: String,
}

/// Incoming payload for seeding a development session.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dev-session-request.ts"
)]
pub struct DevSessionRequest {
    pub subject: String,
    pub display_name: Option<String>,
    pub active_branch_id: Option<String>,
    pub branch_roles: Vec<BranchRoleRequest>,
}

impl BranchRoleRequest {
    pub fn parse(&self) -> branchgate_core::AppResult<(BranchId, Role)> {
        Ok((self.branch_id.parse()?, self.role.parse()?))
    }
}
