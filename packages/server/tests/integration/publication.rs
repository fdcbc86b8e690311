use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn publish_sets_publication_and_location() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let ids = vec![
        app.record("CIJ I 611").await.id,
        app.record("CIJ I 612").await.id,
    ];

    let res = app
        .post_with_token(
            routes::PUBLISH,
            &json!({ "publication": "CIJ I", "record_ids": ids }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["updated"], 2);
    let first = app.record("CIJ I 611").await;
    assert_eq!(first.location_in_publication, "611");
    assert!(first.publication_id.is_some());
    assert_eq!(app.record("CIJ I 612").await.location_in_publication, "612");
    assert_eq!(res.body["data"][0]["publication"], "CIJ I");
}

#[tokio::test]
async fn publish_mismatch_modifies_nothing() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let before = vec![app.record("CIJ I 611").await, app.record("IJO I 1").await];
    let ids: Vec<i32> = before.iter().map(|r| r.id).collect();

    let res = app
        .post_with_token(
            routes::PUBLISH,
            &json!({ "publication": "CIJ I", "record_ids": ids }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.text.contains("IJO I 1"));
    assert_eq!(app.record("CIJ I 611").await, before[0]);
    assert_eq!(app.record("IJO I 1").await, before[1]);
}

#[tokio::test]
async fn publish_unknown_record_returns_404() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;

    let res = app
        .post_with_token(
            routes::PUBLISH,
            &json!({ "publication": "CIJ I", "record_ids": [999] }),
            &token,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn publish_requires_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::PUBLISH,
            &json!({ "publication": "CIJ I", "record_ids": [1] }),
        )
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let res = app
        .post_with_token(
            routes::PUBLISH,
            &json!({ "publication": "CIJ I", "record_ids": [1] }),
            "not-a-token",
        )
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn deleting_publication_keeps_records() {
    let app = TestApp::spawn().await;
    app.import_sample().await;
    let token = app.token("curator").await;
    let id = app.record("CIJ I 611").await.id;
    app.post_with_token(
        routes::PUBLISH,
        &json!({ "publication": "CIJ I", "record_ids": [id] }),
        &token,
    )
    .await;
    let publication_id = app.record("CIJ I 611").await.publication_id.unwrap();

    let res = app
        .delete_with_token(&routes::publication(publication_id), &token)
        .await;

    assert_eq!(res.status, 204, "{}", res.text);
    let record = app.record("CIJ I 611").await;
    assert_eq!(record.publication_id, None);
    assert_eq!(record.location_in_publication, "611");
}
