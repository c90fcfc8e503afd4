use crate::helpers::{spawn_app, spawn_app_with_broken_storage};
use serde_json::{json, Value};

#[tokio::test]
async fn malformed_export_names_are_rejected() {
    // Arrange
    let app = spawn_app().await;
    std::fs::write(app.export_dir.path().join("subscribers-badtoken.txt"), "secret").unwrap();
    let test_cases = vec![
        "subscribers-badtoken.txt",
        "stats-EAB51B53B039E1B7.json",
        "subscribers-0123456789abcdef.csv",
        "other-0123456789abcdef.txt",
        "..%2Fconfiguration%2Fbase.yaml",
    ];

    for name in test_cases {
        // Act
        let response = app.get(&format!("/data-exports/{}", name)).await;

        // Assert
        assert_eq!(400, response.status().as_u16(), "{} was not rejected", name);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Invalid filename" }));
    }
}

#[tokio::test]
async fn exports_are_not_found_before_the_first_subscription() {
    let app = spawn_app().await;

    let response = app
        .get(&format!("/data-exports/{}", app.token.stats_file_name()))
        .await;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "File not found" }));
}

#[tokio::test]
async fn exports_for_another_token_are_not_found() {
    let app = spawn_app().await;
    app.subscribe("a@example.com").await;

    let response = app.get("/data-exports/subscribers-0123456789abcdef.txt").await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn subscriber_log_is_served_as_cacheable_plain_text() {
    // Arrange
    let app = spawn_app().await;
    app.subscribe("a@example.com").await;

    // Act
    let response = app
        .get(&format!("/data-exports/{}", app.token.subscribers_file_name()))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.headers()["content-type"], "text/plain");
    assert_eq!(
        response.headers()["cache-control"],
        "public, max-age=60, s-maxage=60"
    );
    let body = response.text().await.unwrap();
    assert_eq!(Some(body), app.subscribers_file());
}

#[tokio::test]
async fn stats_are_served_as_json() {
    let app = spawn_app().await;
    app.subscribe("a@example.com").await;
    app.subscribe("b@example.com").await;

    let response = app.get("/api/subscribe").await;
    let urls: Value = response.json().await.unwrap();
    let stats_url = urls["statsUrl"].as_str().unwrap();

    let response = app.get(stats_url).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.headers()["content-type"], "application/json");
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["totalSubscribers"], 2);
    assert_eq!(stats["publicUrl"], urls["subscribersUrl"]);
}

#[tokio::test]
async fn test_files_lists_the_export_directory() {
    let app = spawn_app().await;

    let before: Value = app.get("/api/test-files").await.json().await.unwrap();
    assert_eq!(before["directoryExists"], true);
    assert_eq!(before["filesCount"], 0);

    app.subscribe("a@example.com").await;

    let response = app.get("/api/test-files").await;
    assert_eq!(200, response.status().as_u16());
    let after: Value = response.json().await.unwrap();
    assert_eq!(after["filesCount"], 2);
    assert_eq!(
        after["files"],
        json!([app.token.stats_file_name(), app.token.subscribers_file_name()])
    );
    assert_eq!(
        after["path"],
        app.export_dir.path().display().to_string()
    );
}

#[tokio::test]
async fn export_read_failures_return_a_500() {
    let app = spawn_app_with_broken_storage().await;

    let response = app
        .get(&format!("/data-exports/{}", app.token.subscribers_file_name()))
        .await;

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to read file" }));
}

#[tokio::test]
async fn test_files_returns_a_500_when_the_directory_cannot_be_listed() {
    let app = spawn_app_with_broken_storage().await;

    let response = app.get("/api/test-files").await;

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Cannot read directory");
    assert!(body["message"].as_str().map_or(false, |message| !message.is_empty()));
}
