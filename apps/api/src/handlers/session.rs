use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use branchgate_core::{AppError, BranchId, NonEmptyString, UserIdentity};
use branchgate_domain::{Actor, BranchRoles};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{ActorResponse, DevSessionRequest, SwitchBranchRequest};
use crate::error::ApiResult;
use crate::session::{load_branch_roles, load_identity, store_branch_roles, store_identity};
use crate::state::AppState;

pub async fn current_actor_handler(session: Session) -> ApiResult<Json<ActorResponse>> {
    let identity = load_identity(&session).await?;
    let roles = load_branch_roles(&session).await?;
    let actor = Actor::resolve(identity.as_ref(), &roles);

    Ok(Json(ActorResponse::from_session(identity.as_ref(), actor)))
}

pub async fn switch_branch_handler(
    session: Session,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<SwitchBranchRequest>,
) -> ApiResult<Json<ActorResponse>> {
    let branch_id: BranchId = payload.branch_id.parse()?;
    let roles = load_branch_roles(&session).await?;
    if !roles.contains_branch(branch_id) {
        return Err(AppError::Forbidden(format!(
            "subject '{}' holds no role in branch '{branch_id}'",
            identity.subject()
        ))
        .into());
    }

    let identity = identity.with_active_branch(branch_id);
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;
    store_identity(&session, &identity).await?;

    let actor = Actor::resolve(Some(&identity), &roles);
    info!(
        subject = identity.subject(),
        branch_id = %branch_id,
        role = actor.role().map(|role| role.as_str()).unwrap_or("none"),
        "active branch switched"
    );

    Ok(Json(ActorResponse::from_session(Some(&identity), actor)))
}

pub async fn dev_session_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DevSessionRequest>,
) -> ApiResult<Json<ActorResponse>> {
    if !state.dev_session_enabled {
        return Err(AppError::NotFound("dev sessions are disabled".to_owned()).into());
    }

    let subject = NonEmptyString::new(payload.subject)?;
    let roles = payload
        .branch_roles
        .iter()
        .map(|assignment| assignment.parse())
        .collect::<Result<BranchRoles, AppError>>()?;
    let active_branch = payload
        .active_branch_id
        .as_deref()
        .map(str::parse::<BranchId>)
        .transpose()?;
    if let Some(branch_id) = active_branch
        && !roles.contains_branch(branch_id)
    {
        return Err(AppError::Validation(format!(
            "active branch '{branch_id}' has no role assignment"
        ))
        .into());
    }

    let display_name = payload
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| subject.as_str().to_owned());
    let identity = UserIdentity::new(subject.as_str(), display_name, active_branch);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;
    store_identity(&session, &identity).await?;
    store_branch_roles(&session, &roles).await?;

    let actor = Actor::resolve(Some(&identity), &roles);
    info!(subject = identity.subject(), "dev session seeded");

    Ok(Json(ActorResponse::from_session(Some(&identity), actor)))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}
