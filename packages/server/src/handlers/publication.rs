use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::services::places;
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Publications",
    operation_id = "deletePublication",
    summary = "Delete a publication",
    description = "Records citing the publication are kept and lose the reference.",
    params(("id" = i32, Path, description = "Publication ID")),
    responses(
        (status = 204, description = "Publication deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Publication not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user = %auth_user.username))]
pub async fn delete_publication(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    places::delete_publication(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
