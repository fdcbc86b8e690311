use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Identifier of the row in the source dataset.
    #[sea_orm(unique)]
    pub source: String,

    pub place_id: Option<i32>,
    #[sea_orm(belongs_to, from = "place_id", to = "id", on_delete = "SetNull")]
    pub place: HasOne<super::place::Entity>,

    /// Copies of the place's area and region names, refreshed on every save.
    pub area: String,
    pub region: String,

    pub category1_id: Option<i32>,
    #[sea_orm(belongs_to, from = "category1_id", to = "id", on_delete = "SetNull")]
    pub category1: HasOne<super::primary_category::Entity>,

    pub category2_id: Option<i32>,
    #[sea_orm(belongs_to, from = "category2_id", to = "id", on_delete = "SetNull")]
    pub category2: HasOne<super::secondary_category::Entity>,

    #[sea_orm(has_many, via = "record_language")]
    pub languages: HasMany<super::language::Entity>,
    #[sea_orm(has_many, via = "record_script")]
    pub scripts: HasMany<super::script::Entity>,
    #[sea_orm(has_many, via = "record_century")]
    pub estimated_centuries: HasMany<super::century::Entity>,

    pub period: String,
    #[sea_orm(default_value = 0)]
    pub inscriptions_count: i32,
    pub mentioned_placenames: String,
    pub religious_profession: String,
    /// Comma-separated codes: female, male, female-child, male-child, child.
    pub sex_dedicator: String,
    pub sex_deceased: String,
    pub symbol: String,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
    #[sea_orm(column_type = "Text")]
    pub inscription: String,
    #[sea_orm(column_type = "Text")]
    pub transcription: String,

    pub publication_id: Option<i32>,
    #[sea_orm(belongs_to, from = "publication_id", to = "id", on_delete = "SetNull")]
    pub publication: HasOne<super::publication::Entity>,
    pub location_in_publication: String,
}

impl ActiveModelBehavior for ActiveModel {}
