use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
};
use tracing::{info, warn};

use super::Resolved;
use super::choice::{ChoiceRule, Vocabulary, resolve, resolve_one};
use super::error::ImportError;
use super::sheet::{SheetRow, columns};
use crate::entity::{
    century, language, place, primary_category, record, script, secondary_category,
};
use crate::services::records::{save_record, set_centuries, set_languages, set_scripts};

/// Codes stored for the sex/age columns, keyed by their spreadsheet label.
const SEX_CODES: [(&str, &str); 5] = [
    ("female", "female"),
    ("male", "male"),
    ("child (female)", "female-child"),
    ("child (male)", "male-child"),
    ("child", "child"),
];

const SEX_RULE: ChoiceRule = ChoiceRule {
    delimiter: Some('|'),
    transform: Some(sex_code),
};

fn sex_code(label: &str) -> String {
    let lowered = label.to_lowercase();
    SEX_CODES
        .iter()
        .find(|(known, _)| *known == lowered)
        .map(|(_, code)| (*code).to_owned())
        .unwrap_or_else(|| label.to_owned())
}

/// Normalize a `|`-separated sex/age cell into comma-joined codes.
pub fn normalize_sex(text: &str) -> String {
    SEX_RULE.tokens(text).join(",")
}

fn inscriptions_count(row: &SheetRow) -> i32 {
    let cell = row.get(columns::INSCRIPTIONS_COUNT);
    if cell.is_empty() {
        return 0;
    }
    cell.parse().unwrap_or_else(|_| {
        warn!(source = row.get(columns::SOURCE), value = cell, "Invalid inscriptions count");
        0
    })
}

/// Insert or update the record of a data row.
///
/// Scalar fields are overwritten from the row. Categories, languages,
/// scripts and centuries are only replaced when their cell is non-blank.
/// Rows without a source are skipped.
pub async fn create_record<C: ConnectionTrait>(
    db: &C,
    row: &SheetRow,
    place: Option<&place::Model>,
) -> Result<Option<Resolved<record::Model>>, ImportError> {
    let source = row.get(columns::SOURCE);
    if source.is_empty() {
        info!(id = row.get(columns::ID), "Skipping row without source");
        return Ok(None);
    }

    let existing = record::Entity::find()
        .filter(record::Column::Source.eq(source))
        .one(db)
        .await?;
    let created = existing.is_none();
    let mut model = match existing {
        Some(existing) => existing.into_active_model(),
        None => record::ActiveModel {
            source: Set(source.to_owned()),
            ..Default::default()
        },
    };

    let text = |column: &str| Set(row.get(column).to_owned());
    model.period = text(columns::PERIOD);
    model.mentioned_placenames = text(columns::MENTIONED_PLACENAMES);
    model.religious_profession = text(columns::RELIGIOUS_PROFESSION);
    model.symbol = text(columns::SYMBOL);
    model.comments = text(columns::COMMENTS);
    model.inscription = text(columns::INSCRIPTION);
    model.transcription = text(columns::TRANSCRIPTION);
    model.inscriptions_count = Set(inscriptions_count(row));
    model.sex_dedicator = Set(normalize_sex(row.get(columns::SEX_DEDICATOR)));
    model.sex_deceased = Set(normalize_sex(row.get(columns::SEX_DECEASED)));
    if created {
        model.location_in_publication = Set(String::new());
    }

    if let Some(category) =
        resolve_one::<primary_category::Entity, C>(db, row.get(columns::CATEGORY1)).await?
    {
        model.category1_id = Set(Some(category.id));
    }
    if let Some(category) =
        resolve_one::<secondary_category::Entity, C>(db, row.get(columns::CATEGORY2)).await?
    {
        model.category2_id = Set(Some(category.id));
    }

    model.place_id = Set(place.map(|p| p.id));
    let saved = save_record(db, model).await?;

    if let Some(ids) =
        linked_ids::<language::Entity, C>(db, row, columns::LANGUAGE, ChoiceRule::MULTI).await?
    {
        set_languages(db, saved.id, &ids).await?;
    }
    if let Some(ids) =
        linked_ids::<script::Entity, C>(db, row, columns::SCRIPT, ChoiceRule::MULTI).await?
    {
        set_scripts(db, saved.id, &ids).await?;
    }
    if let Some(ids) =
        linked_ids::<century::Entity, C>(db, row, columns::CENTURIES, ChoiceRule::CENTURIES)
            .await?
    {
        set_centuries(db, saved.id, &ids).await?;
    }

    Ok(Some(Resolved {
        model: saved,
        created,
    }))
}

/// Ids for a multi-valued cell, or `None` when the cell is blank.
async fn linked_ids<E, C>(
    db: &C,
    row: &SheetRow,
    column: &str,
    rule: ChoiceRule,
) -> Result<Option<Vec<i32>>, ImportError>
where
    E: Vocabulary,
    C: ConnectionTrait,
{
    let cell = row.get(column);
    if cell.is_empty() {
        return Ok(None);
    }
    let models = resolve::<E, C>(db, cell, rule).await?;
    Ok(Some(models.iter().map(E::model_id).collect()))
}
