use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::models::geojson::FeatureCollection;
use crate::services::catalogue::feature_collection;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/geojson.json",
    tag = "GeoJSON",
    operation_id = "downloadGeojson",
    summary = "Places with records as GeoJSON",
    description = "One feature per place that has at least one record. Geometry is `[longitude, latitude]`, or `null` for places without coordinates.",
    responses(
        (status = 200, description = "GeoJSON FeatureCollection", body = FeatureCollection),
    ),
)]
#[instrument(skip(state))]
pub async fn download_geojson(
    State(state): State<AppState>,
) -> Result<Json<FeatureCollection>, AppError> {
    Ok(Json(feature_collection(&state.db).await?))
}
