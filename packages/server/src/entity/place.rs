use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::Point;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "place")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub area_id: Option<i32>,
    #[sea_orm(belongs_to, from = "area_id", to = "id", on_delete = "SetNull")]
    pub area: HasOne<super::area::Entity>,

    pub region_id: Option<i32>,
    #[sea_orm(belongs_to, from = "region_id", to = "id", on_delete = "SetNull")]
    pub region: HasOne<super::region::Entity>,

    /// Decimal degrees; set together with `latitude` or not at all.
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,

    /// Pleiades place id, when the dataset supplies one.
    pub pleiades_id: Option<i64>,

    #[sea_orm(has_many)]
    pub records: HasMany<super::record::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn point(&self) -> Option<Point> {
        match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(Point::new(longitude, latitude)),
            _ => None,
        }
    }
}
