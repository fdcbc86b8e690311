use sea_orm::{ActiveModelTrait, ActiveValue::Set, IntoActiveModel};
use server::entity::place;
use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn list_places_is_ordered_by_name() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let res = app.get(routes::PLACES).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let names: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Athens", "Jaffa", "Tarentum", "Venusia"]);
    assert_eq!(res.body["data"][3]["pleiades_id"], crate::common::VENUSIA);
    assert_eq!(res.body["data"][0]["coordinates"], serde_json::Value::Null);
}

#[tokio::test]
async fn changing_grouping_refreshes_records() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let venusia = app.place("Venusia").await;

    let res = app
        .patch_with_token(
            &routes::place(venusia.id),
            &json!({ "area": "Southern Italy", "region": null }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["area"], "Southern Italy");
    assert_eq!(res.body["region"], serde_json::Value::Null);
    for source in ["CIJ I 611", "CIJ I 612"] {
        let record = app.record(source).await;
        assert_eq!(record.area, "Southern Italy");
        assert_eq!(record.region, "");
    }
    assert_eq!(app.record("CIJ I 613").await.area, "Italy");
}

#[tokio::test]
async fn absent_grouping_fields_are_kept() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let jaffa = app.place("Jaffa").await;

    let res = app
        .patch_with_token(&routes::place(jaffa.id), &json!({ "region": "Judaea" }), &token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["area"], "Judaea");
    assert_eq!(res.body["region"], "Judaea");
    assert_eq!(app.record("CIJ II 101").await.region, "Judaea");
}

#[tokio::test]
async fn grouping_cannot_duplicate_another_place() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let ungrouped = place::ActiveModel {
        name: Set("Venusia".to_string()),
        area_id: Set(None),
        region_id: Set(None),
        ..Default::default()
    }
    .insert(app.db())
    .await
    .unwrap();
    let venusia = app.record("CIJ I 611").await.place_id.unwrap();

    let res = app
        .patch_with_token(
            &routes::place(venusia),
            &json!({ "area": null, "region": " " }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.text.contains(&ungrouped.id.to_string()));
    let record = app.record("CIJ I 611").await;
    assert_eq!(record.area, "Italy");
    assert_eq!(record.region, "Apulia");
}

#[tokio::test]
async fn update_missing_place_returns_404() {
    let app = TestApp::spawn().await;
    let token = app.token("curator").await;

    let res = app
        .patch_with_token(&routes::place(999), &json!({ "area": "Italy" }), &token)
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn deleting_place_keeps_records() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let venusia = app.place("Venusia").await;

    let res = app.delete_with_token(&routes::place(venusia.id), &token).await;

    assert_eq!(res.status, 204, "{}", res.text);
    let record = app.record("CIJ I 611").await;
    assert_eq!(record.place_id, None);
    assert_eq!(record.area, "");
    assert_eq!(record.region, "");

    let res = app.delete_with_token(&routes::place(venusia.id), &token).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn delete_requires_token() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let venusia = app.place("Venusia").await;

    let res = app.delete_without_token(&routes::place(venusia.id)).await;

    assert_eq!(res.status, 401);
    assert_eq!(app.place("Venusia").await.id, venusia.id);
}

#[tokio::test]
async fn fetch_coordinates_restores_gazetteer_points() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;

    let mut venusia = app.place("Venusia").await.into_active_model();
    venusia.longitude = Set(None);
    venusia.latitude = Set(None);
    let venusia = venusia.update(app.db()).await.unwrap();
    let athens = app.place("Athens").await;
    let fetches = app.fetch_count();

    let res = app
        .post_with_token(
            routes::FETCH_COORDINATES,
            &json!({ "place_ids": [venusia.id, athens.id] }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    // Athens has no Pleiades id and is not looked up.
    assert_eq!(res.body["updated"], 1);
    assert_eq!(app.fetch_count(), fetches + 1);
    let venusia = app.place("Venusia").await;
    assert_eq!(venusia.longitude, Some(15.8132));
    assert_eq!(venusia.latitude, Some(40.9614));
}
