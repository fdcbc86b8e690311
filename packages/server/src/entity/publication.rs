use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A publication records are cited from, e.g. "CIJ I".
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publication")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub identifier: String,

    #[sea_orm(has_many)]
    pub records: HasMany<super::record::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
