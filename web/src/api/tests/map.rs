use super::{HOST, body_json, body_string, get};
use crate::test_app;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use sqlx::{Pool, Sqlite};
use test_log::test;
use tower::ServiceExt;

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn get_map_requires_between_param(pool: Pool<Sqlite>) {
    let (app, state) = test_app(pool).await;

    for uri in ["/locations/get-map/", "/locations/get-map/?between="] {
        let response = app
            .clone()
            .oneshot(get(uri))
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["detail"],
            json!("You should set a query set")
        );
    }
    assert!(!state.map_path().exists());
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn get_map_rejects_malformed_param(pool: Pool<Sqlite>) {
    let (app, state) = test_app(pool).await;

    for between in [
        "7:00:00-13:00:00",
        "07:00-13:00",
        "07:00:00",
        "07:00:00-13:00:00-18:00:00",
        "nonsense",
    ] {
        let response = app
            .clone()
            .oneshot(get(&format!("/locations/get-map/?between={between}")))
            .await
            .expect("Failed to execute request");
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected '{between}' to be rejected"
        );
        assert_eq!(
            body_json(response).await["detail"],
            json!("query parameter should be in this format: '00:00:00-00:00:00'.")
        );
    }
    // no render happened for any of them
    assert!(!state.map_path().exists());
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn get_map_rejects_inverted_order(pool: Pool<Sqlite>) {
    let (app, state) = test_app(pool).await;

    // beginning must be strictly earlier than ending
    for between in ["13:00:00-07:00:00", "07:00:00-07:00:00"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/locations/get-map/?between={between}")))
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["detail"],
            json!("First time_set, should be set earlier than second time_set.")
        );
    }
    assert!(!state.map_path().exists());
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn get_map_with_no_matches_is_not_found(pool: Pool<Sqlite>) {
    let (app, state) = test_app(pool).await;

    let response = app
        .oneshot(get("/locations/get-map/?between=19:00:00-20:00:00"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["detail"],
        json!("No location has been set between this time.")
    );
    assert!(!state.map_path().exists());
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn get_map_renders_matching_locations(pool: Pool<Sqlite>) {
    let (app, state) = test_app(pool).await;

    let response = app
        .oneshot(get("/locations/get-map/?between=07:00:00-13:00:00"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["url"],
        json!(format!("http://{HOST}/locations/show-map/"))
    );

    let page = std::fs::read_to_string(state.map_path()).expect("map artifact was not written");
    assert!(page.contains("Harbor"));
    assert!(page.contains("Market"));
    assert!(!page.contains("Overlook"));
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn get_map_link_uses_forwarded_scheme(pool: Pool<Sqlite>) {
    let (app, _state) = test_app(pool).await;

    let request = Request::builder()
        .uri("/locations/get-map/?between=07:00:00-13:00:00")
        .method("GET")
        .header("Host", HOST)
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .oneshot(request)
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["url"],
        json!(format!("https://{HOST}/locations/show-map/"))
    );
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn show_map_before_any_generation(pool: Pool<Sqlite>) {
    let (app, _state) = test_app(pool).await;

    let response = app
        .oneshot(get("/locations/show-map/"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("No map has been generated yet"));
}

#[test(sqlx::test(
    migrations = "../db/migrations/",
    fixtures(path = "../../../../db/fixtures", scripts("locations"))
))]
async fn show_map_reflects_latest_generation(pool: Pool<Sqlite>) {
    let (app, _state) = test_app(pool).await;

    let response = app
        .clone()
        .oneshot(get("/locations/get-map/?between=07:00:00-13:00:00"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/locations/show-map/"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("Harbor"));
    assert!(!page.contains("Overlook"));

    // a second query overwrites the single artifact slot
    let response = app
        .clone()
        .oneshot(get("/locations/get-map/?between=17:00:00-19:00:00"))
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/locations/show-map/"))
        .await
        .expect("Failed to execute request");
    let page = body_string(response).await;
    assert!(page.contains("Overlook"));
    assert!(!page.contains("Harbor"));
}
