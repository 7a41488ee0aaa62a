use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use branchgate_application::{PolicyEvaluator, PolicySource};
use branchgate_core::{BranchId, UserIdentity};
use branchgate_domain::{BranchRoles, Role};
use branchgate_infrastructure::StaticPolicySource;
use tower_sessions::{MemoryStore, Session};

use crate::dto::CapabilityResponse;
use crate::session::{store_branch_roles, store_identity};
use crate::state::AppState;

use super::{CapabilitiesQuery, list_capabilities_handler, resource_capabilities_handler};

fn test_state() -> AppState {
    let config = match StaticPolicySource::embedded().load() {
        Ok(config) => config,
        Err(error) => panic!("embedded policy failed to load: {error}"),
    };

    AppState {
        policy: PolicyEvaluator::new(Arc::new(config)),
        dev_session_enabled: false,
    }
}

fn empty_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

async fn session_with_role(role: Role) -> Session {
    let session = empty_session();
    let branch_id = BranchId::new();
    let identity = UserIdentity::new("casey", "Casey", Some(branch_id));
    let roles = BranchRoles::from_iter([(branch_id, role)]);

    assert!(store_identity(&session, &identity).await.is_ok());
    assert!(store_branch_roles(&session, &roles).await.is_ok());
    session
}

async fn resource_snapshot(
    session: Session,
    resource: &str,
    preferred_tab: Option<&str>,
) -> CapabilityResponse {
    let result = resource_capabilities_handler(
        State(test_state()),
        session,
        Path(resource.to_owned()),
        Query(CapabilitiesQuery {
            preferred_tab: preferred_tab.map(ToOwned::to_owned),
        }),
    )
    .await;

    match result {
        Ok(Json(snapshot)) => snapshot,
        Err(error) => panic!("capabilities handler failed: {error:?}"),
    }
}

#[tokio::test]
async fn admin_sees_users_tabs_and_edit_but_not_delete() {
    let session = session_with_role(Role::Admin).await;
    let snapshot = resource_snapshot(session, "users", Some("roles")).await;

    assert!(snapshot.actions.iter().any(|action| action == "edit"));
    assert!(!snapshot.actions.iter().any(|action| action == "delete"));
    assert_eq!(snapshot.tabs, vec!["overview", "roles", "audit"]);
    assert_eq!(snapshot.default_tab.as_deref(), Some("roles"));
}

#[tokio::test]
async fn missing_session_yields_all_deny_snapshot() {
    let snapshot = resource_snapshot(empty_session(), "users", Some("overview")).await;

    assert!(snapshot.actions.is_empty());
    assert!(snapshot.tabs.is_empty());
    assert!(snapshot.sections.is_empty());
    assert!(snapshot.buttons.is_empty());
    assert_eq!(snapshot.default_tab, None);
}

#[tokio::test]
async fn unknown_resource_is_an_all_deny_snapshot() {
    let session = session_with_role(Role::InstituteAdmin).await;
    let snapshot = resource_snapshot(session, "library", None).await;

    assert_eq!(snapshot.resource, "library");
    assert!(snapshot.actions.is_empty());
    assert!(snapshot.tabs.is_empty());
}

#[tokio::test]
async fn hidden_preferred_tab_falls_back_to_first_visible() {
    let session = session_with_role(Role::Accountant).await;
    let snapshot = resource_snapshot(session, "payroll", Some("salary-structures")).await;

    assert!(!snapshot.tabs.iter().any(|tab| tab == "salary-structures"));
    assert_eq!(snapshot.default_tab.as_deref(), Some("runs"));
}

#[tokio::test]
async fn list_covers_every_configured_resource_in_order() {
    let state = test_state();
    let expected: Vec<String> = state.policy.config().resources().to_vec();
    let session = session_with_role(Role::Receptionist).await;

    let result = list_capabilities_handler(State(state), session).await;
    let Ok(Json(snapshots)) = result else {
        panic!("list handler failed");
    };

    let resources: Vec<String> = snapshots
        .into_iter()
        .map(|snapshot| snapshot.resource)
        .collect();
    assert_eq!(resources, expected);
}
