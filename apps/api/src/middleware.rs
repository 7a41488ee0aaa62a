use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use branchgate_core::AppError;
use tower_sessions::Session;

use crate::error::ApiResult;
use crate::session::load_identity;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = load_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
