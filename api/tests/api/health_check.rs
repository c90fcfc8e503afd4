use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get("/health_check").await;

    // Assert
    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = spawn_app().await;

    for path in ["/health_check", "/api/subscribe", "/data-exports/nope.txt"] {
        let response = app.get(path).await;
        assert!(
            response.headers().contains_key("x-request-id"),
            "{} responded without a request id",
            path
        );
    }
}
