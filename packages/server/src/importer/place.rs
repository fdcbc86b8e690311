use common::{Gazetteer, Point, to_decimal};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    Select,
};
use tracing::{debug, info, warn};

use super::Resolved;
use super::choice::resolve_one;
use super::error::ImportError;
use super::sheet::{LATITUDE_COLUMN, LONGITUDE_COLUMN, LocationSheet, SheetRow, columns};
use crate::entity::{area, place, region};

/// Resolve the place of a data row, creating it on first sight.
///
/// A place is identified by its (name, area, region) triple. An existing
/// place is returned as is: its coordinates are only resolved when it is
/// created. Rows without a placename have no place.
pub async fn create_place<C: ConnectionTrait>(
    db: &C,
    gazetteer: &mut dyn Gazetteer,
    row: &SheetRow,
    locations: Option<&LocationSheet>,
) -> Result<Option<Resolved<place::Model>>, ImportError> {
    let name = row.get(columns::PLACENAME);
    if name.is_empty() {
        debug!(source = row.get(columns::SOURCE), "Row has no placename");
        return Ok(None);
    }

    let area_id = resolve_one::<area::Entity, C>(db, row.get(columns::AREA))
        .await?
        .map(|a| a.id);
    let region_id = resolve_one::<region::Entity, C>(db, row.get(columns::REGION))
        .await?
        .map(|r| r.id);

    let existing = find_place(name, area_id, region_id).one(db).await?;
    if let Some(model) = existing {
        return Ok(Some(Resolved {
            model,
            created: false,
        }));
    }

    let pleiades_id = pleiades_id(row);
    let mut point = None;
    if let Some(id) = pleiades_id {
        point = gazetteer.fetch(id).await?.and_then(|entry| entry.point());
    }
    if point.is_none() {
        point = manual_point(row, locations);
    }

    let model = place::ActiveModel {
        name: Set(name.to_owned()),
        area_id: Set(area_id),
        region_id: Set(region_id),
        longitude: Set(point.map(|p| p.longitude)),
        latitude: Set(point.map(|p| p.latitude)),
        pleiades_id: Set(pleiades_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(place = %model.name, id = model.id, located = point.is_some(), "Created place");
    Ok(Some(Resolved {
        model,
        created: true,
    }))
}

/// Places matching the triple; a missing area or region matches NULL only.
pub fn find_place(name: &str, area_id: Option<i32>, region_id: Option<i32>) -> Select<place::Entity> {
    let select = place::Entity::find().filter(place::Column::Name.eq(name));
    let select = match area_id {
        Some(id) => select.filter(place::Column::AreaId.eq(id)),
        None => select.filter(place::Column::AreaId.is_null()),
    };
    match region_id {
        Some(id) => select.filter(place::Column::RegionId.eq(id)),
        None => select.filter(place::Column::RegionId.is_null()),
    }
}

fn pleiades_id(row: &SheetRow) -> Option<i64> {
    let cell = row.get(columns::PLEIADES);
    if cell.is_empty() {
        return None;
    }
    match cell.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(source = row.get(columns::SOURCE), value = cell, "Invalid Pleiades id");
            None
        }
    }
}

/// Coordinates from the location sheet, which stores latitude first.
fn manual_point(row: &SheetRow, locations: Option<&LocationSheet>) -> Option<Point> {
    let identifier = row.identifier();
    let Some(found) = locations.and_then(|sheet| sheet.find(identifier)) else {
        warn!(identifier, "No coordinates found for place");
        return None;
    };

    let cell = |index: usize| found.get(index).map(String::as_str).unwrap_or("");
    let latitude = to_decimal(cell(LATITUDE_COLUMN));
    let longitude = to_decimal(cell(LONGITUDE_COLUMN));
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Point::from_lat_lon(latitude, longitude)),
        _ => {
            warn!(identifier, "Incomplete manual coordinates");
            None
        }
    }
}
