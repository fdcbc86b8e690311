use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::GazetteerError;
use crate::geo::Point;

/// The slice of a gazetteer place that is kept in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    /// `[longitude, latitude]`, or `None` when the upstream place has no point.
    #[serde(rename = "reprPoint")]
    pub repr_point: Option<[f64; 2]>,
}

impl GazetteerEntry {
    pub fn point(&self) -> Option<Point> {
        self.repr_point.map(Point::from_lon_lat)
    }
}

/// In-memory gazetteer index keyed by place id.
pub type GazetteerIndex = HashMap<i64, GazetteerEntry>;

/// Point lookup service for external gazetteer ids.
#[async_trait]
pub trait Gazetteer: Send + Sync {
    /// Load the index now unless it is already in memory.
    async fn populate(&mut self) -> Result<(), GazetteerError>;

    /// Look up a place, populating the index on first use.
    ///
    /// Returns `Ok(None)` for unknown ids.
    async fn fetch(&mut self, id: i64) -> Result<Option<GazetteerEntry>, GazetteerError>;

    /// Drop the in-memory index. The on-disk cache is left alone.
    fn reset(&mut self);

    /// Whether the in-memory index is currently loaded.
    fn is_populated(&self) -> bool;
}
