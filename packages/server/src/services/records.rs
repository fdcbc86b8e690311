//! Record persistence shared by the importer and the admin actions.

use std::collections::BTreeSet;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::entity::{area, place, record, record_century, record_language, record_script, region};

/// Area and region names of a place, empty when unset.
pub async fn grouping_names<C: ConnectionTrait>(
    db: &C,
    place_id: Option<i32>,
) -> Result<(String, String), DbErr> {
    let Some(place_id) = place_id else {
        return Ok(Default::default());
    };
    let Some(place) = place::Entity::find_by_id(place_id).one(db).await? else {
        return Ok(Default::default());
    };

    let area = match place.area_id {
        Some(id) => area::Entity::find_by_id(id).one(db).await?.map(|a| a.name),
        None => None,
    };
    let region = match place.region_id {
        Some(id) => region::Entity::find_by_id(id).one(db).await?.map(|r| r.name),
        None => None,
    };
    Ok((area.unwrap_or_default(), region.unwrap_or_default()))
}

/// Insert or update a record, recomputing its cached area and region names
/// from its place.
pub async fn save_record<C: ConnectionTrait>(
    db: &C,
    mut model: record::ActiveModel,
) -> Result<record::Model, DbErr> {
    let place_id = match &model.place_id {
        ActiveValue::Set(id) | ActiveValue::Unchanged(id) => *id,
        ActiveValue::NotSet => None,
    };
    let (area, region) = grouping_names(db, place_id).await?;
    model.area = ActiveValue::Set(area);
    model.region = ActiveValue::Set(region);

    if model.id.is_not_set() {
        model.insert(db).await
    } else {
        model.update(db).await
    }
}

/// Recompute the cached names on every record of a place.
pub async fn refresh_place_records<C: ConnectionTrait>(
    db: &C,
    place_id: i32,
) -> Result<u64, DbErr> {
    let (area, region) = grouping_names(db, Some(place_id)).await?;
    let result = record::Entity::update_many()
        .col_expr(record::Column::Area, Expr::value(area))
        .col_expr(record::Column::Region, Expr::value(region))
        .filter(record::Column::PlaceId.eq(place_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_languages<C: ConnectionTrait>(
    db: &C,
    record_id: i32,
    language_ids: &[i32],
) -> Result<(), DbErr> {
    record_language::Entity::delete_many()
        .filter(record_language::Column::RecordId.eq(record_id))
        .exec(db)
        .await?;
    for language_id in unique(language_ids) {
        record_language::Entity::insert(record_language::ActiveModel {
            record_id: ActiveValue::Set(record_id),
            language_id: ActiveValue::Set(language_id),
        })
        .exec_without_returning(db)
        .await?;
    }
    Ok(())
}

pub async fn set_scripts<C: ConnectionTrait>(
    db: &C,
    record_id: i32,
    script_ids: &[i32],
) -> Result<(), DbErr> {
    record_script::Entity::delete_many()
        .filter(record_script::Column::RecordId.eq(record_id))
        .exec(db)
        .await?;
    for script_id in unique(script_ids) {
        record_script::Entity::insert(record_script::ActiveModel {
            record_id: ActiveValue::Set(record_id),
            script_id: ActiveValue::Set(script_id),
        })
        .exec_without_returning(db)
        .await?;
    }
    Ok(())
}

pub async fn set_centuries<C: ConnectionTrait>(
    db: &C,
    record_id: i32,
    century_ids: &[i32],
) -> Result<(), DbErr> {
    record_century::Entity::delete_many()
        .filter(record_century::Column::RecordId.eq(record_id))
        .exec(db)
        .await?;
    for century_id in unique(century_ids) {
        record_century::Entity::insert(record_century::ActiveModel {
            record_id: ActiveValue::Set(record_id),
            century_id: ActiveValue::Set(century_id),
        })
        .exec_without_returning(db)
        .await?;
    }
    Ok(())
}

fn unique(ids: &[i32]) -> BTreeSet<i32> {
    ids.iter().copied().collect()
}
