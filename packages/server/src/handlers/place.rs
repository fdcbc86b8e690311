use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use sea_orm::{EntityTrait, QueryOrder};
use tracing::instrument;

use crate::entity::place;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::place::*;
use crate::services::catalogue::place_responses;
use crate::services::places::{self, GroupingChange};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Places",
    operation_id = "listPlaces",
    summary = "List all places",
    responses(
        (status = 200, description = "Places ordered by name", body = PlaceListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_places(State(state): State<AppState>) -> Result<Json<PlaceListResponse>, AppError> {
    let models = place::Entity::find()
        .order_by_asc(place::Column::Name)
        .order_by_asc(place::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(PlaceListResponse {
        data: place_responses(&state.db, models).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/fetch-coordinates",
    tag = "Places",
    operation_id = "fetchPlaceCoordinates",
    summary = "Fetch coordinates from Pleiades",
    description = "Re-resolves the coordinates of the selected places from their stored Pleiades id. Places without an id, or whose Pleiades entry has no point, are left unchanged. The first call may download and index the gazetteer dump.",
    request_body = FetchCoordinatesRequest,
    responses(
        (status = 200, description = "Updated places", body = FetchCoordinatesResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Gazetteer unavailable (GAZETTEER_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user = %auth_user.username))]
pub async fn fetch_coordinates(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<FetchCoordinatesRequest>,
) -> Result<Json<FetchCoordinatesResponse>, AppError> {
    let updated = {
        let mut gazetteer = state.gazetteer.lock().await;
        places::fetch_coordinates(&state.db, &mut *gazetteer, &payload.place_ids).await?
    };
    let data = place_responses(&state.db, updated).await?;

    Ok(Json(FetchCoordinatesResponse {
        updated: data.len(),
        data,
    }))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Places",
    operation_id = "updatePlace",
    summary = "Change a place's area and region",
    description = "Absent fields are left unchanged; `null` or a blank name clears them. The cached area and region of every record of the place are refreshed.",
    params(("id" = i32, Path, description = "Place ID")),
    request_body = UpdatePlaceRequest,
    responses(
        (status = 200, description = "Place updated", body = PlaceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Place not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user = %auth_user.username))]
pub async fn update_place(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePlaceRequest>,
) -> Result<Json<PlaceResponse>, AppError> {
    let change = GroupingChange {
        area: payload.area,
        region: payload.region,
    };
    let updated = places::update_grouping(&state.db, id, change).await?;

    place_responses(&state.db, vec![updated])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(format!("place {id} lost while loading")))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Places",
    operation_id = "deletePlace",
    summary = "Delete a place",
    description = "Records of the place are kept; they lose their place and cached area and region.",
    params(("id" = i32, Path, description = "Place ID")),
    responses(
        (status = 204, description = "Place deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Place not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user = %auth_user.username))]
pub async fn delete_place(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    places::delete_place(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
