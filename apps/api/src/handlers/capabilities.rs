use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::dto::CapabilityResponse;
use crate::error::ApiResult;
use crate::session::session_actor;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CapabilitiesQuery {
    pub preferred_tab: Option<String>,
}

pub async fn list_capabilities_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<CapabilityResponse>>> {
    let actor = session_actor(&session).await?;
    let capabilities = state
        .policy
        .capabilities_for_all(&actor)
        .into_iter()
        .map(CapabilityResponse::from)
        .collect();

    Ok(Json(capabilities))
}

pub async fn resource_capabilities_handler(
    State(state): State<AppState>,
    session: Session,
    Path(resource): Path<String>,
    Query(query): Query<CapabilitiesQuery>,
) -> ApiResult<Json<CapabilityResponse>> {
    let actor = session_actor(&session).await?;
    let snapshot =
        state
            .policy
            .capabilities(&actor, resource.as_str(), query.preferred_tab.as_deref());

    Ok(Json(CapabilityResponse::from(snapshot)))
}

#[cfg(test)]
mod tests;
