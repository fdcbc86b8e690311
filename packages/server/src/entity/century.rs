use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Estimated century of a record. Names are signed integers ("-1" is the
/// first century BCE) or the literal "unknown".
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "century")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    /// Derived from `name`; `None` for "unknown" and for unparseable names.
    pub century_number: Option<i32>,

    #[sea_orm(has_many, via = "record_century")]
    pub records: HasMany<super::record::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

/// Numeric value of a century name, if it has one.
pub fn century_number(name: &str) -> Option<i32> {
    name.trim().parse().ok()
}
