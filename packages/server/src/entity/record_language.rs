use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record_language")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub record_id: i32,
    #[sea_orm(primary_key)]
    pub language_id: i32,
    #[sea_orm(belongs_to, from = "record_id", to = "id", on_delete = "Cascade")]
    pub record: Option<super::record::Entity>,
    #[sea_orm(belongs_to, from = "language_id", to = "id", on_delete = "Cascade")]
    pub language: Option<super::language::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
