//! Get-or-create for the controlled vocabularies.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::entity::{
    area, century, language, primary_category, publication, region, script, secondary_category,
};

/// An entity identified by a unique name column.
pub trait Vocabulary: EntityTrait {
    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
    fn new_model(name: &str) -> Self::ActiveModel;
    fn model_id(model: &Self::Model) -> i32;
    fn model_name(model: &Self::Model) -> &str;
}

macro_rules! vocabulary {
    ($module:ident, $column:ident, $field:ident) => {
        impl Vocabulary for $module::Entity {
            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn name_column() -> Self::Column {
                $module::Column::$column
            }

            fn new_model(name: &str) -> Self::ActiveModel {
                $module::ActiveModel {
                    $field: Set(name.to_owned()),
                    ..Default::default()
                }
            }

            fn model_id(model: &Self::Model) -> i32 {
                model.id
            }

            fn model_name(model: &Self::Model) -> &str {
                &model.$field
            }
        }
    };
}

vocabulary!(area, Name, name);
vocabulary!(region, Name, name);
vocabulary!(primary_category, Name, name);
vocabulary!(secondary_category, Name, name);
vocabulary!(language, Name, name);
vocabulary!(script, Name, name);
vocabulary!(publication, Identifier, identifier);

impl Vocabulary for century::Entity {
    fn id_column() -> Self::Column {
        century::Column::Id
    }

    fn name_column() -> Self::Column {
        century::Column::Name
    }

    fn new_model(name: &str) -> Self::ActiveModel {
        century::ActiveModel {
            name: Set(name.to_owned()),
            century_number: Set(century::century_number(name)),
            ..Default::default()
        }
    }

    fn model_id(model: &Self::Model) -> i32 {
        model.id
    }

    fn model_name(model: &Self::Model) -> &str {
        &model.name
    }
}

/// How a free-text cell splits into vocabulary names.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceRule {
    pub delimiter: Option<char>,
    pub transform: Option<fn(&str) -> String>,
}

impl ChoiceRule {
    /// The whole cell is one name.
    pub const SINGLE: Self = Self {
        delimiter: None,
        transform: None,
    };
    /// `|`-separated names.
    pub const MULTI: Self = Self {
        delimiter: Some('|'),
        transform: None,
    };
    /// `|`-separated century names; `3-` is written for `-3`.
    pub const CENTURIES: Self = Self {
        delimiter: Some('|'),
        transform: Some(normalize_century),
    };

    /// Non-empty, trimmed and transformed tokens in cell order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let parts: Vec<&str> = match self.delimiter {
            Some(delimiter) => text.split(delimiter).collect(),
            None => vec![text],
        };
        parts
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match self.transform {
                Some(transform) => transform(part),
                None => part.to_owned(),
            })
            .collect()
    }
}

/// Move a trailing minus sign to the front: `"3-"` becomes `"-3"`.
pub fn normalize_century(token: &str) -> String {
    match token.strip_suffix('-') {
        Some(number) => format!("-{}", number.trim()),
        None => token.to_owned(),
    }
}

/// Return the entity with `name`, creating it if needed.
///
/// Concurrent creation of the same name is absorbed by the unique constraint.
pub async fn get_or_create<E, C>(db: &C, name: &str) -> Result<E::Model, DbErr>
where
    E: Vocabulary,
    C: ConnectionTrait,
{
    let result = E::insert(E::new_model(name))
        .on_conflict(OnConflict::column(E::name_column()).do_nothing().to_owned())
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    E::find()
        .filter(E::name_column().eq(name))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("vocabulary entry `{name}`")))
}

/// Resolve every token of `text` under `rule`, in order.
pub async fn resolve<E, C>(db: &C, text: &str, rule: ChoiceRule) -> Result<Vec<E::Model>, DbErr>
where
    E: Vocabulary,
    C: ConnectionTrait,
{
    let mut models = Vec::new();
    for token in rule.tokens(text) {
        models.push(get_or_create::<E, C>(db, &token).await?);
    }
    Ok(models)
}

/// Resolve a single-valued cell; blank cells resolve to `None`.
pub async fn resolve_one<E, C>(db: &C, text: &str) -> Result<Option<E::Model>, DbErr>
where
    E: Vocabulary,
    C: ConnectionTrait,
{
    Ok(resolve::<E, C>(db, text, ChoiceRule::SINGLE)
        .await?
        .into_iter()
        .next())
}
