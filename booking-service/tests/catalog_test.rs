mod common;

use axum::http::StatusCode;
use common::TestApp;

fn seed(app: &TestApp) {
    app.catalog.insert("cleaning", 40.0, "Kitchen");
    app.catalog.insert("garden", 25.0, "Lawn");
    app.catalog.insert("cleaning", 90.0, "Deep clean");
    app.catalog.insert("plumbing", 60.0, "Pipes");
    app.catalog.insert("cleaning", 15.0, "Windows");
}

#[tokio::test]
async fn listing_without_credential_is_rejected_before_storage() {
    let app = TestApp::spawn();
    seed(&app);

    let response = app.get("/api/v1/services", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        serde_json::json!({ "message": "unauthorized access" })
    );
    assert_eq!(app.catalog.calls(), 0);
}

#[tokio::test]
async fn listing_with_invalid_credential_is_rejected() {
    let app = TestApp::spawn();
    seed(&app);

    let response = app.get("/api/v1/services", Some("forged.token.value")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "unauthorized access");
    assert_eq!(app.catalog.calls(), 0);
}

#[tokio::test]
async fn listing_returns_everything_without_parameters() {
    let app = TestApp::spawn();
    seed(&app);
    let token = app.token_for("a@x.com");

    let response = app.get("/api/v1/services", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 5);
    assert_eq!(response.body["result"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn category_filter_keeps_unconditional_total() {
    let app = TestApp::spawn();
    seed(&app);
    let token = app.token_for("a@x.com");

    let response = app
        .get("/api/v1/services?category=cleaning", Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let result = response.body["result"].as_array().unwrap();
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|s| s["category"] == "cleaning"));
    // total reflects the whole catalog, not the filter
    assert_eq!(response.body["total"], 5);
}

#[tokio::test]
async fn sorts_by_requested_field() {
    let app = TestApp::spawn();
    seed(&app);
    let token = app.token_for("a@x.com");

    let response = app
        .get(
            "/api/v1/services?category=cleaning&sortField=price&sortOrder=desc",
            Some(&token),
        )
        .await;

    let prices: Vec<f64> = response.body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![90.0, 40.0, 15.0]);
}

#[tokio::test]
async fn sort_field_without_order_keeps_natural_order() {
    let app = TestApp::spawn();
    seed(&app);
    let token = app.token_for("a@x.com");

    let response = app
        .get("/api/v1/services?sortField=price", Some(&token))
        .await;

    let names: Vec<&str> = response.body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kitchen", "Lawn", "Deep clean", "Pipes", "Windows"]);
}

#[tokio::test]
async fn pagination_windows_after_filter_and_sort() {
    let app = TestApp::spawn();
    for i in 0..25 {
        app.catalog.insert("cleaning", i as f64, &format!("svc-{i}"));
    }
    app.catalog.insert("garden", 1000.0, "not cleaning");
    let token = app.token_for("a@x.com");

    let response = app
        .get(
            "/api/v1/services?category=cleaning&sortField=price&sortOrder=asc&page=2&limit=10",
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let prices: Vec<f64> = response.body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, (10..20).map(|p| p as f64).collect::<Vec<_>>());
    assert_eq!(response.body["total"], 26);

    let last_page = app
        .get(
            "/api/v1/services?category=cleaning&sortField=price&sortOrder=asc&page=3&limit=10",
            Some(&token),
        )
        .await;
    assert_eq!(last_page.body["result"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_pagination_is_a_bad_request() {
    let app = TestApp::spawn();
    seed(&app);
    let token = app.token_for("a@x.com");

    for uri in [
        "/api/v1/services?page=abc&limit=10",
        "/api/v1/services?page=0&limit=10",
        "/api/v1/services?page=1&limit=-5",
        "/api/v1/services?sortField=price&sortOrder=sideways",
    ] {
        let response = app.get(uri, Some(&token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
    }
    assert_eq!(app.catalog.calls(), 0);
}

#[tokio::test]
async fn fetch_by_id_is_public() {
    let app = TestApp::spawn();
    let id = app.catalog.insert("garden", 25.0, "Lawn");

    let response = app
        .get(&format!("/api/v1/services/{}", id.to_hex()), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["_id"], id.to_hex());
    assert_eq!(response.body["name"], "Lawn");
    assert_eq!(response.body["category"], "garden");
}

#[tokio::test]
async fn fetch_by_unknown_or_malformed_id_is_not_found() {
    let app = TestApp::spawn();
    app.catalog.insert("garden", 25.0, "Lawn");

    let unknown = app
        .get(
            &format!("/api/v1/services/{}", mongodb::bson::oid::ObjectId::new().to_hex()),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let malformed = app.get("/api/v1/services/not-an-id", None).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
    assert_eq!(malformed.body["message"], "service not found");
}
