use serde::{Deserialize, Serialize};

pub use super::shared::{Pagination, PointGeometry, escape_like};

/// A record with its linked names resolved.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RecordResponse {
    pub id: i32,
    #[schema(example = "CIJ I 611")]
    pub source: String,
    pub languages: Vec<String>,
    pub scripts: Vec<String>,
    pub place_name: Option<String>,
    pub area: Option<String>,
    pub region: Option<String>,
    /// Point of the record's place, if known.
    pub coordinates: Option<PointGeometry>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub period: String,
    pub estimated_centuries: Vec<String>,
    pub mentioned_placenames: String,
    pub inscriptions_count: i32,
    pub religious_profession: String,
    /// Comma-separated codes: female, male, female-child, male-child, child.
    #[schema(example = "male,female")]
    pub sex_dedicator: String,
    pub sex_deceased: String,
    pub symbol: String,
    pub comments: String,
    pub inscription: String,
    pub transcription: String,
    pub publication: Option<String>,
    pub location_in_publication: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecordListResponse {
    pub data: Vec<RecordResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RecordListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
    /// Exact area name.
    pub area: Option<String>,
    /// Exact province/region name.
    pub region: Option<String>,
    /// Case-insensitive substring of the source.
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct PublishRequest {
    /// Publication identifier every selected source starts with.
    #[schema(example = "CIJ I")]
    pub publication: String,
    pub record_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PublishResponse {
    pub updated: usize,
    pub data: Vec<RecordResponse>,
}
