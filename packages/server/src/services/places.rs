//! Admin actions on places and the vocabularies records point at.

use common::Gazetteer;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use tracing::{info, warn};

use super::records::refresh_place_records;
use crate::entity::{
    area, place, primary_category, publication, record, region, secondary_category,
};
use crate::error::AppError;
use crate::importer::choice::get_or_create;
use crate::importer::place::find_place;

/// Re-resolve the coordinates of places from their stored Pleiades id.
///
/// Places without an id, or whose id has no point, keep their coordinates.
/// Returns the places that were updated.
pub async fn fetch_coordinates(
    db: &DatabaseConnection,
    gazetteer: &mut dyn Gazetteer,
    place_ids: &[i32],
) -> Result<Vec<place::Model>, AppError> {
    let places = place::Entity::find()
        .filter(place::Column::Id.is_in(place_ids.to_vec()))
        .all(db)
        .await?;

    let mut updated = Vec::new();
    for existing in places {
        let Some(pleiades_id) = existing.pleiades_id else {
            warn!(place = %existing.name, "Place has no Pleiades id");
            continue;
        };
        let Some(point) = gazetteer
            .fetch(pleiades_id)
            .await?
            .and_then(|entry| entry.point())
        else {
            continue;
        };

        let mut model = existing.into_active_model();
        model.longitude = Set(Some(point.longitude));
        model.latitude = Set(Some(point.latitude));
        updated.push(model.update(db).await?);
    }

    info!(requested = place_ids.len(), updated = updated.len(), "Fetched coordinates");
    Ok(updated)
}

/// New area and region of a place. `None` leaves a field alone,
/// `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct GroupingChange {
    pub area: Option<Option<String>>,
    pub region: Option<Option<String>>,
}

/// Change a place's area and region and refresh its records' cached names.
pub async fn update_grouping(
    db: &DatabaseConnection,
    place_id: i32,
    change: GroupingChange,
) -> Result<place::Model, AppError> {
    let txn = db.begin().await?;

    let existing = place::Entity::find_by_id(place_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Place not found".into()))?;
    let mut model = existing.clone().into_active_model();
    let mut area_id = existing.area_id;
    let mut region_id = existing.region_id;

    if let Some(area) = change.area {
        area_id = match non_blank(area) {
            Some(name) => Some(get_or_create::<area::Entity, _>(&txn, &name).await?.id),
            None => None,
        };
        model.area_id = Set(area_id);
    }
    if let Some(region) = change.region {
        region_id = match non_blank(region) {
            Some(name) => Some(get_or_create::<region::Entity, _>(&txn, &name).await?.id),
            None => None,
        };
        model.region_id = Set(region_id);
    }

    // A place is identified by its (name, area, region) triple.
    if let Some(other) = find_place(&existing.name, area_id, region_id)
        .filter(place::Column::Id.ne(existing.id))
        .one(&txn)
        .await?
    {
        return Err(AppError::Validation(format!(
            "Place {} already exists in this area and region (id {})",
            other.name, other.id
        )));
    }

    let updated = if model.is_changed() {
        model.update(&txn).await?
    } else {
        existing
    };
    let refreshed = refresh_place_records(&txn, updated.id).await?;
    txn.commit().await?;

    info!(place = %updated.name, records = refreshed, "Updated place grouping");
    Ok(updated)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Delete a place. Its records stay and lose their place and cached names.
pub async fn delete_place(db: &DatabaseConnection, place_id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    record::Entity::update_many()
        .col_expr(record::Column::PlaceId, Expr::value(Option::<i32>::None))
        .col_expr(record::Column::Area, Expr::value(String::new()))
        .col_expr(record::Column::Region, Expr::value(String::new()))
        .filter(record::Column::PlaceId.eq(place_id))
        .exec(&txn)
        .await?;
    let result = place::Entity::delete_by_id(place_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Place not found".into()));
    }
    txn.commit().await?;
    Ok(())
}

/// Delete a primary category, unsetting it on its records.
pub async fn delete_primary_category(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    unset_record_reference(&txn, record::Column::Category1Id, id).await?;
    let result = primary_category::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Category not found".into()));
    }
    txn.commit().await?;
    Ok(())
}

/// Delete a secondary category, unsetting it on its records.
pub async fn delete_secondary_category(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    unset_record_reference(&txn, record::Column::Category2Id, id).await?;
    let result = secondary_category::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Category not found".into()));
    }
    txn.commit().await?;
    Ok(())
}

/// Delete a publication, unsetting it on its records.
pub async fn delete_publication(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    unset_record_reference(&txn, record::Column::PublicationId, id).await?;
    let result = publication::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Publication not found".into()));
    }
    txn.commit().await?;
    Ok(())
}

async fn unset_record_reference<C: ConnectionTrait>(
    db: &C,
    column: record::Column,
    id: i32,
) -> Result<u64, DbErr> {
    let result = record::Entity::update_many()
        .col_expr(column, Expr::value(Option::<i32>::None))
        .filter(column.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
