use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::record;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::record::*;
use crate::services::catalogue::record_responses;
use crate::services::publication::attach_publication;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Records",
    operation_id = "listRecords",
    summary = "List records with pagination and filters",
    description = "Returns records ordered by source. `area` and `region` match the record's place grouping exactly; `search` is a case-insensitive substring of the source.",
    params(RecordListQuery),
    responses(
        (status = 200, description = "List of records", body = RecordListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<RecordListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = record::Entity::find();
    if let Some(area) = query.area.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        select = select.filter(record::Column::Area.eq(area));
    }
    if let Some(region) = query.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        select = select.filter(record::Column::Region.eq(region));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(record::Column::Source)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let models = select
        .order_by_asc(record::Column::Source)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;
    let data = record_responses(&state.db, models).await?;

    Ok(Json(RecordListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Records",
    operation_id = "getRecord",
    summary = "Get a record by ID",
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record details", body = RecordResponse),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecordResponse>, AppError> {
    let model = record::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;

    record_responses(&state.db, vec![model])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(format!("record {id} lost while loading")))
}

#[utoipa::path(
    post,
    path = "/publish",
    tag = "Records",
    operation_id = "publishRecords",
    summary = "Attach a publication to records",
    description = "Every selected record's source must start with the publication identifier. The remainder of the source becomes the record's location in the publication. A single mismatch rejects the whole batch and no record is modified.",
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Records updated", body = PublishResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user = %auth_user.username, publication = %payload.publication))]
pub async fn publish_records(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let updated = attach_publication(&state.db, &payload.publication, &payload.record_ids).await?;
    let data = record_responses(&state.db, updated).await?;

    Ok(Json(PublishResponse {
        updated: data.len(),
        data,
    }))
}
