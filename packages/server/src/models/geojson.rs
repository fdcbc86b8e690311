use serde::Serialize;

use super::shared::PointGeometry;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    #[schema(example = "FeatureCollection")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

/// One place with at least one record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Feature {
    #[serde(rename = "type")]
    #[schema(example = "Feature")]
    pub kind: &'static str,
    /// `null` for places without coordinates.
    pub geometry: Option<PointGeometry>,
    pub properties: FeatureProperties,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FeatureProperties {
    pub placename: String,
    #[serde(rename = "Province_region")]
    pub province_region: String,
    pub area: String,
    /// Sum over the place's records.
    #[serde(rename = "inscriptions-count")]
    pub inscriptions_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pleiades: Option<i64>,
    pub records: Vec<FeatureRecord>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FeatureRecord {
    pub source: String,
    pub languages: Vec<String>,
    pub scripts: Vec<String>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub period: String,
    #[serde(rename = "inscriptions-count")]
    pub inscriptions_count: i32,
}
