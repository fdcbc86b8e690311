use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use server::entity::{century, language, place, record, record_language};
use server::importer::ImportReport;
use server::services::catalogue::record_responses;
use server::services::maintenance::clear_catalogue;

use crate::common::TestApp;

#[tokio::test]
async fn sample_dataset_imports_seven_records() {
    let app = TestApp::spawn().await;

    let report = app.import_sample().await;

    assert_eq!(
        report,
        ImportReport {
            rows_read: 7,
            records_created: 7,
            records_updated: 0,
            places_created: 4,
            rows_skipped: 2,
        }
    );
    assert_eq!(record::Entity::find().count(app.db()).await.unwrap(), 7);
    assert_eq!(place::Entity::find().count(app.db()).await.unwrap(), 4);
}

#[tokio::test]
async fn rows_after_two_blank_rows_are_ignored() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let late = record::Entity::find()
        .all(app.db())
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.source == "IJO I 3");
    assert!(late.is_none());
}

#[tokio::test]
async fn reimport_is_idempotent() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let first = app.record("CIJ I 611").await;
    let languages = language::Entity::find().count(app.db()).await.unwrap();
    let centuries = century::Entity::find().count(app.db()).await.unwrap();

    let report = app.import_sample().await;

    assert_eq!(report.records_created, 0);
    assert_eq!(report.records_updated, 7);
    assert_eq!(report.places_created, 0);
    assert_eq!(record::Entity::find().count(app.db()).await.unwrap(), 7);
    assert_eq!(place::Entity::find().count(app.db()).await.unwrap(), 4);
    assert_eq!(language::Entity::find().count(app.db()).await.unwrap(), languages);
    assert_eq!(century::Entity::find().count(app.db()).await.unwrap(), centuries);
    assert_eq!(app.record("CIJ I 611").await, first);
}

#[tokio::test]
async fn existing_places_are_not_located_again() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    // Venusia and Tarentum are each looked up once, when created.
    assert_eq!(app.fetch_count(), 2);

    // The second Jaffa row points at different manual coordinates.
    let jaffa = app.place("Jaffa").await;
    assert_eq!(jaffa.longitude, Some(34.75));
    assert_eq!(jaffa.latitude, Some(32.05));

    app.import_sample().await;
    assert_eq!(app.fetch_count(), 2);
}

#[tokio::test]
async fn gazetteer_is_loaded_before_the_first_lookup() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    assert!(app.fetch_count() > 0);
    assert_eq!(app.cold_fetch_count(), 0);
}

const PLACE_HEADER: &[&str] = &["id", "source", "placename", "area", "province-region", "pleiades"];

#[tokio::test]
async fn unknown_pleiades_id_falls_back_to_location_sheet() {
    let app = TestApp::spawn().await;

    app.import_sheets(
        &[PLACE_HEADER, &["10", "X 1", "Nowhere", "Italy", "Apulia", "999"]],
        &[&["10", "", "", "", "10˚ 30' S", "20˚ W"]],
    )
    .await;

    let nowhere = app.place("Nowhere").await;
    assert_eq!(nowhere.pleiades_id, Some(999));
    assert_eq!(nowhere.longitude, Some(-20.0));
    assert_eq!(nowhere.latitude, Some(-10.5));
    assert_eq!(app.fetch_count(), 1);
}

#[tokio::test]
async fn existing_triple_ignores_a_different_pleiades_id() {
    let app = TestApp::spawn().await;

    let report = app
        .import_sheets(
            &[
                PLACE_HEADER,
                &["10", "X 1", "Nowhere", "Italy", "Apulia", "999"],
                &["11", "X 2", "Nowhere", "Italy", "Apulia", "48210385"],
            ],
            &[&["10", "", "", "", "10˚ 30' S", "20˚ W"]],
        )
        .await;

    assert_eq!(report.places_created, 1);
    assert_eq!(report.records_created, 2);
    assert_eq!(app.fetch_count(), 1);
    let nowhere = app.place("Nowhere").await;
    assert_eq!(nowhere.pleiades_id, Some(999));
    assert_eq!(nowhere.longitude, Some(-20.0));
    assert_eq!(nowhere.latitude, Some(-10.5));
    assert_eq!(app.record("X 2").await.place_id, Some(nowhere.id));
}

#[tokio::test]
async fn blank_cells_keep_existing_associations() {
    let app = TestApp::spawn().await;
    let header: &[&str] = &["id", "source", "placename", "language", "category 1"];

    app.import_sheets(&[header, &["1", "Y 1", "", "Greek|Latin", "Funerary"]], &[])
        .await;
    let before = app.record("Y 1").await;
    assert!(before.category1_id.is_some());

    let report = app
        .import_sheets(&[header, &["1", "Y 1", "", "", ""]], &[])
        .await;

    assert_eq!(report.records_updated, 1);
    let after = app.record("Y 1").await;
    assert_eq!(after.category1_id, before.category1_id);
    let links = record_language::Entity::find()
        .filter(record_language::Column::RecordId.eq(after.id))
        .count(app.db())
        .await
        .unwrap();
    assert_eq!(links, 2);
}

#[tokio::test]
async fn gazetteer_points_are_stored_longitude_first() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let venusia = app.place("Venusia").await;
    assert_eq!(venusia.pleiades_id, Some(crate::common::VENUSIA));
    assert_eq!(venusia.longitude, Some(15.8132));
    assert_eq!(venusia.latitude, Some(40.9614));
}

#[tokio::test]
async fn unknown_manual_coordinates_leave_place_unlocated() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let athens = app.place("Athens").await;
    assert_eq!(athens.longitude, None);
    assert_eq!(athens.latitude, None);
    assert_eq!(athens.point(), None);
}

#[tokio::test]
async fn record_fields_are_normalized() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let first = app.record("CIJ I 611").await;
    assert_eq!(first.sex_dedicator, "male,female,female-child");
    assert_eq!(first.sex_deceased, "female");
    assert_eq!(first.area, "Italy");
    assert_eq!(first.region, "Apulia");
    assert_eq!(first.inscriptions_count, 1);
    assert_eq!(first.symbol, "menorah");
    assert_eq!(first.location_in_publication, "");

    let tarentum = app.record("CIJ I 613").await;
    assert_eq!(tarentum.inscriptions_count, 0);
    assert_eq!(tarentum.comments, "fragment");
}

#[tokio::test]
async fn linked_vocabularies_are_resolved() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let records = vec![
        app.record("CIJ I 611").await,
        app.record("CIJ I 613").await,
        app.record("IJO I 2").await,
    ];
    let responses = record_responses(app.db(), records).await.unwrap();

    let mut languages = responses[0].languages.clone();
    languages.sort();
    assert_eq!(languages, vec!["Hebrew", "Latin"]);
    assert_eq!(responses[0].category1.as_deref(), Some("Funerary"));
    assert_eq!(responses[0].category2.as_deref(), Some("Epitaph"));

    let mut centuries = responses[1].estimated_centuries.clone();
    centuries.sort();
    assert_eq!(centuries, vec!["-1", "1"]);
    let bc = century::Entity::find()
        .all(app.db())
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "-1")
        .expect("century -1 exists");
    assert_eq!(bc.century_number, Some(-1));

    let unplaced = &responses[2];
    assert_eq!(unplaced.place_name, None);
    assert_eq!(unplaced.area, None);
    assert_eq!(unplaced.coordinates, None);
    assert_eq!(unplaced.mentioned_placenames, "Corinth");
}

#[tokio::test]
async fn clear_removes_catalogue_rows() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    app.token("curator").await;

    let deleted = clear_catalogue(app.db()).await.unwrap();

    assert!(deleted > 0);
    assert_eq!(record::Entity::find().count(app.db()).await.unwrap(), 0);
    assert_eq!(place::Entity::find().count(app.db()).await.unwrap(), 0);
    assert_eq!(
        server::entity::user::Entity::find()
            .count(app.db())
            .await
            .unwrap(),
        1
    );
}
