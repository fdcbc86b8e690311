use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named geographic grouping of places.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "area")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(has_many)]
    pub places: HasMany<super::place::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
