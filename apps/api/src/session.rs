use branchgate_core::{AppError, UserIdentity};
use branchgate_domain::{Actor, BranchRoles};
use tower_sessions::Session;

/// Session key holding the authenticated [`UserIdentity`].
pub const SESSION_USER_KEY: &str = "user_identity";
/// Session key holding the user's role in each branch.
pub const SESSION_BRANCH_ROLES_KEY: &str = "branch_roles";

pub async fn load_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

pub async fn load_branch_roles(session: &Session) -> Result<BranchRoles, AppError> {
    session
        .get::<BranchRoles>(SESSION_BRANCH_ROLES_KEY)
        .await
        .map(Option::unwrap_or_default)
        .map_err(|error| AppError::Internal(format!("failed to read session branch roles: {error}")))
}

/// Resolves the acting role for the current request.
///
/// A missing identity resolves to the anonymous actor, which every policy
/// query denies.
pub async fn session_actor(session: &Session) -> Result<Actor, AppError> {
    let identity = load_identity(session).await?;
    let roles = load_branch_roles(session).await?;
    Ok(Actor::resolve(identity.as_ref(), &roles))
}

pub async fn store_identity(session: &Session, identity: &UserIdentity) -> Result<(), AppError> {
    session
        .insert(SESSION_USER_KEY, identity)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session identity: {error}")))
}

pub async fn store_branch_roles(session: &Session, roles: &BranchRoles) -> Result<(), AppError> {
    session
        .insert(SESSION_BRANCH_ROLES_KEY, roles)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session branch roles: {error}"))
        })
}
