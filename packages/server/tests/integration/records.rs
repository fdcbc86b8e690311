use crate::common::{TestApp, routes};

#[tokio::test]
async fn list_records_is_paginated_by_source() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let res = app.get(&format!("{}?per_page=3&page=2", routes::RECORDS)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["pagination"]["total"], 7);
    assert_eq!(res.body["pagination"]["total_pages"], 3);
    let sources: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["source"].as_str().unwrap())
        .collect();
    assert_eq!(sources, vec!["CIJ II 100", "CIJ II 101", "IJO I 1"]);
}

#[tokio::test]
async fn list_records_filters_by_grouping() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let res = app.get(&format!("{}?area=Italy", routes::RECORDS)).await;
    assert_eq!(res.body["pagination"]["total"], 3);

    let res = app
        .get(&format!("{}?area=Italy&region=Calabria", routes::RECORDS))
        .await;
    assert_eq!(res.body["pagination"]["total"], 1);
    assert_eq!(res.body["data"][0]["source"], "CIJ I 613");
    assert_eq!(res.body["data"][0]["place_name"], "Tarentum");
}

#[tokio::test]
async fn list_records_searches_source_case_insensitively() {
    let app = TestApp::spawn().await;
    app.import_sample().await;

    let res = app.get(&format!("{}?search=ijo", routes::RECORDS)).await;
    assert_eq!(res.body["pagination"]["total"], 2);

    // `_` is matched literally.
    let res = app.get(&format!("{}?search=CIJ_I", routes::RECORDS)).await;
    assert_eq!(res.body["pagination"]["total"], 0);
}

#[tokio::test]
async fn get_record_returns_full_shape() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let id = app.record("CIJ I 611").await.id;

    let res = app.get(&routes::record(id)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let body = &res.body;
    assert_eq!(body["source"], "CIJ I 611");
    assert_eq!(body["place_name"], "Venusia");
    assert_eq!(body["area"], "Italy");
    assert_eq!(body["region"], "Apulia");
    assert_eq!(body["coordinates"]["type"], "Point");
    assert_eq!(body["coordinates"]["coordinates"][0], 15.8132);
    assert_eq!(body["coordinates"]["coordinates"][1], 40.9614);
    assert_eq!(body["sex_dedicator"], "male,female,female-child");
    assert_eq!(body["publication"], serde_json::Value::Null);
    assert_eq!(body["location_in_publication"], "");
}

#[tokio::test]
async fn get_missing_record_returns_404() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::record(999)).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
