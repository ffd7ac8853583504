mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use auth_service::api::handlers::LIVENESS_MESSAGE;

fn make_server() -> TestServer {
    let app = common::default_bootstrap().router().unwrap();
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_root_returns_liveness_message() {
    let server = make_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_text("Authentication Service Running");
    assert_eq!(response.text(), LIVENESS_MESSAGE);
}

#[tokio::test]
async fn test_root_is_plain_text() {
    let server = make_server();

    let response = server.get("/").await;

    assert_eq!(
        response.header("content-type"),
        "text/plain; charset=utf-8"
    );
}

#[tokio::test]
async fn test_root_ignores_headers_and_query() {
    let server = make_server();

    let response = server
        .get("/")
        .add_query_param("foo", "bar")
        .add_header("Authorization", "Bearer not-a-real-token")
        .add_header("X-Test-User", "mallory")
        .add_header("Accept", "application/json")
        .await;

    response.assert_status_ok();
    response.assert_text(LIVENESS_MESSAGE);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = make_server();

    let response = server.get("/health").await;

    response.assert_status_not_found();
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_nested_unknown_path_is_not_found() {
    let server = make_server();

    server.get("/api/tokens").await.assert_status_not_found();
}

#[tokio::test]
async fn test_other_methods_on_root_are_rejected() {
    let server = make_server();

    server
        .post("/")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    server
        .delete("/")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_concurrent_requests() {
    let server = make_server();

    let (a, b, c) = tokio::join!(
        async { server.get("/").await },
        async { server.get("/").await },
        async { server.get("/").await },
    );

    for response in [a, b, c] {
        response.assert_status_ok();
        response.assert_text(LIVENESS_MESSAGE);
    }
}
