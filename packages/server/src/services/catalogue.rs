//! Read models: records with resolved names, places, GeoJSON.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entity::{
    area, century, language, place, primary_category, publication, record, record_century,
    record_language, record_script, region, script, secondary_category,
};
use crate::importer::choice::Vocabulary;
use crate::models::geojson::{Feature, FeatureCollection, FeatureProperties, FeatureRecord};
use crate::models::place::PlaceResponse;
use crate::models::record::{PointGeometry, RecordResponse};

/// Names of the vocabulary entries with the given ids.
async fn names_by_id<E, C>(db: &C, ids: BTreeSet<i32>) -> Result<HashMap<i32, String>, DbErr>
where
    E: Vocabulary,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(E::find()
        .filter(E::id_column().is_in(ids))
        .all(db)
        .await?
        .iter()
        .map(|model| (E::model_id(model), E::model_name(model).to_owned()))
        .collect())
}

/// Group `(record_id, entry_id)` pairs into per-record name lists.
async fn linked_names<E, C>(
    db: &C,
    mut pairs: Vec<(i32, i32)>,
) -> Result<HashMap<i32, Vec<String>>, DbErr>
where
    E: Vocabulary,
    C: ConnectionTrait,
{
    pairs.sort_unstable();
    let names = names_by_id::<E, C>(db, pairs.iter().map(|(_, id)| *id).collect()).await?;

    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (record_id, entry_id) in pairs {
        if let Some(name) = names.get(&entry_id) {
            grouped.entry(record_id).or_default().push(name.clone());
        }
    }
    Ok(grouped)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Resolve the linked names of a batch of records, keeping their order.
pub async fn record_responses<C: ConnectionTrait>(
    db: &C,
    records: Vec<record::Model>,
) -> Result<Vec<RecordResponse>, DbErr> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = records.iter().map(|r| r.id).collect();

    let place_ids: BTreeSet<i32> = records.iter().filter_map(|r| r.place_id).collect();
    let places: HashMap<i32, place::Model> = if place_ids.is_empty() {
        HashMap::new()
    } else {
        place::Entity::find()
            .filter(place::Column::Id.is_in(place_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };

    let category1 = names_by_id::<primary_category::Entity, C>(
        db,
        records.iter().filter_map(|r| r.category1_id).collect(),
    )
    .await?;
    let category2 = names_by_id::<secondary_category::Entity, C>(
        db,
        records.iter().filter_map(|r| r.category2_id).collect(),
    )
    .await?;
    let publications = names_by_id::<publication::Entity, C>(
        db,
        records.iter().filter_map(|r| r.publication_id).collect(),
    )
    .await?;

    let language_pairs: Vec<(i32, i32)> = record_language::Entity::find()
        .select_only()
        .column(record_language::Column::RecordId)
        .column(record_language::Column::LanguageId)
        .filter(record_language::Column::RecordId.is_in(ids.clone()))
        .into_tuple()
        .all(db)
        .await?;
    let script_pairs: Vec<(i32, i32)> = record_script::Entity::find()
        .select_only()
        .column(record_script::Column::RecordId)
        .column(record_script::Column::ScriptId)
        .filter(record_script::Column::RecordId.is_in(ids.clone()))
        .into_tuple()
        .all(db)
        .await?;
    let century_pairs: Vec<(i32, i32)> = record_century::Entity::find()
        .select_only()
        .column(record_century::Column::RecordId)
        .column(record_century::Column::CenturyId)
        .filter(record_century::Column::RecordId.is_in(ids))
        .into_tuple()
        .all(db)
        .await?;
    let mut languages = linked_names::<language::Entity, C>(db, language_pairs).await?;
    let mut scripts = linked_names::<script::Entity, C>(db, script_pairs).await?;
    let mut centuries = linked_names::<century::Entity, C>(db, century_pairs).await?;

    Ok(records
        .into_iter()
        .map(|r| {
            let place = r.place_id.and_then(|id| places.get(&id));
            RecordResponse {
                id: r.id,
                languages: languages.remove(&r.id).unwrap_or_default(),
                scripts: scripts.remove(&r.id).unwrap_or_default(),
                place_name: place.map(|p| p.name.clone()),
                area: non_empty(r.area),
                region: non_empty(r.region),
                coordinates: place.and_then(|p| p.point()).map(PointGeometry::from),
                category1: r.category1_id.and_then(|id| category1.get(&id).cloned()),
                category2: r.category2_id.and_then(|id| category2.get(&id).cloned()),
                period: r.period,
                estimated_centuries: centuries.remove(&r.id).unwrap_or_default(),
                mentioned_placenames: r.mentioned_placenames,
                inscriptions_count: r.inscriptions_count,
                religious_profession: r.religious_profession,
                sex_dedicator: r.sex_dedicator,
                sex_deceased: r.sex_deceased,
                symbol: r.symbol,
                comments: r.comments,
                inscription: r.inscription,
                transcription: r.transcription,
                publication: r.publication_id.and_then(|id| publications.get(&id).cloned()),
                location_in_publication: r.location_in_publication,
                source: r.source,
            }
        })
        .collect())
}

/// Resolve area and region names of a batch of places.
pub async fn place_responses<C: ConnectionTrait>(
    db: &C,
    places: Vec<place::Model>,
) -> Result<Vec<PlaceResponse>, DbErr> {
    let areas =
        names_by_id::<area::Entity, C>(db, places.iter().filter_map(|p| p.area_id).collect())
            .await?;
    let regions =
        names_by_id::<region::Entity, C>(db, places.iter().filter_map(|p| p.region_id).collect())
            .await?;

    Ok(places
        .into_iter()
        .map(|p| {
            let area = p.area_id.and_then(|id| areas.get(&id).cloned());
            let region = p.region_id.and_then(|id| regions.get(&id).cloned());
            PlaceResponse::new(p, area, region)
        })
        .collect())
}

/// One feature per place that has at least one record, ordered by name.
pub async fn feature_collection<C: ConnectionTrait>(db: &C) -> Result<FeatureCollection, DbErr> {
    let records = record::Entity::find()
        .filter(record::Column::PlaceId.is_not_null())
        .order_by_asc(record::Column::Source)
        .all(db)
        .await?;
    let place_of: Vec<Option<i32>> = records.iter().map(|r| r.place_id).collect();
    let place_ids: BTreeSet<i32> = place_of.iter().flatten().copied().collect();
    if place_ids.is_empty() {
        return Ok(FeatureCollection {
            kind: "FeatureCollection",
            features: Vec::new(),
        });
    }

    let mut by_place: HashMap<i32, Vec<RecordResponse>> = HashMap::new();
    for (place_id, response) in place_of.into_iter().zip(record_responses(db, records).await?) {
        if let Some(place_id) = place_id {
            by_place.entry(place_id).or_default().push(response);
        }
    }

    let places = place::Entity::find()
        .filter(place::Column::Id.is_in(place_ids))
        .order_by_asc(place::Column::Name)
        .order_by_asc(place::Column::Id)
        .all(db)
        .await?;
    let features = place_responses(db, places)
        .await?
        .into_iter()
        .filter_map(|place| {
            let records = by_place.remove(&place.id)?;
            let inscriptions_count = records
                .iter()
                .map(|r| i64::from(r.inscriptions_count))
                .sum();
            Some(Feature {
                kind: "Feature",
                geometry: place.coordinates,
                properties: FeatureProperties {
                    placename: place.name,
                    province_region: place.region.unwrap_or_default(),
                    area: place.area.unwrap_or_default(),
                    inscriptions_count,
                    pleiades: place.pleiades_id,
                    records: records.into_iter().map(FeatureRecord::from).collect(),
                },
            })
        })
        .collect();

    Ok(FeatureCollection {
        kind: "FeatureCollection",
        features,
    })
}

impl From<RecordResponse> for FeatureRecord {
    fn from(r: RecordResponse) -> Self {
        Self {
            source: r.source,
            languages: r.languages,
            scripts: r.scripts,
            category1: r.category1,
            category2: r.category2,
            period: r.period,
            inscriptions_count: r.inscriptions_count,
        }
    }
}

/// Write the GeoJSON document to `path`, returning the number of features.
pub async fn export_geojson<C: ConnectionTrait>(db: &C, path: &Path) -> anyhow::Result<usize> {
    let collection = feature_collection(db).await?;
    let json = serde_json::to_vec_pretty(&collection)?;
    tokio::fs::write(path, json).await?;
    Ok(collection.features.len())
}
