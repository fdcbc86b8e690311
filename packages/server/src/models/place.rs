use serde::{Deserialize, Serialize};

use super::shared::{PointGeometry, double_option};
use crate::entity::place;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PlaceResponse {
    pub id: i32,
    #[schema(example = "Venusia")]
    pub name: String,
    pub area: Option<String>,
    pub region: Option<String>,
    pub coordinates: Option<PointGeometry>,
    pub pleiades_id: Option<i64>,
}

impl PlaceResponse {
    pub fn new(model: place::Model, area: Option<String>, region: Option<String>) -> Self {
        Self {
            coordinates: model.point().map(PointGeometry::from),
            id: model.id,
            name: model.name,
            area,
            region,
            pleiades_id: model.pleiades_id,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PlaceListResponse {
    pub data: Vec<PlaceResponse>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FetchCoordinatesRequest {
    pub place_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FetchCoordinatesResponse {
    pub updated: usize,
    pub data: Vec<PlaceResponse>,
}

/// PATCH body for a place's grouping. Absent fields are left unchanged,
/// `null` clears them.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdatePlaceRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub area: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub region: Option<Option<String>>,
}
