mod common;

use axum_test::TestServer;

#[tokio::test]
async fn test_redirect_success() {
    let app = common::create_test_app(10);
    app.links.insert("redirect1", "https://example.com/target");

    let server = TestServer::new(common::test_router(app.state.clone())).unwrap();

    let response = server.get("/redirect1").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::create_test_app(10);
    let server = TestServer::new(common::test_router(app.state.clone())).unwrap();

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 404);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["code"], "nonexistent");
    assert!(app.state.click_sender.is_empty());
}

#[tokio::test]
async fn test_redirect_enqueues_click_event() {
    let app = common::create_test_app(10);
    let link = app.links.insert("tracked", "https://example.com/tracked");

    let server = TestServer::new(common::test_router(app.state.clone())).unwrap();

    server
        .get("/tracked")
        .add_header("User-Agent", "integration-test/1.0")
        .await;

    let event = app.receiver.dequeue().await.unwrap();
    assert_eq!(event.link_id, link.id);
    assert_eq!(event.user_agent.as_deref(), Some("integration-test/1.0"));
    assert_eq!(event.ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_redirect_succeeds_when_queue_is_full() {
    let app = common::create_test_app(1);
    app.links.insert("busy", "https://example.com/busy");

    let server = TestServer::new(common::test_router(app.state.clone())).unwrap();

    for _ in 0..3 {
        let response = server.get("/busy").await;
        assert_eq!(response.status_code(), 302);
        assert_eq!(response.header("location"), "https://example.com/busy");
    }

    assert_eq!(app.state.click_sender.len(), 1);
}

#[tokio::test]
async fn test_redirect_succeeds_after_queue_closed() {
    let app = common::create_test_app(4);
    app.links.insert("closing", "https://example.com/closing");
    app.receiver.close();

    let server = TestServer::new(common::test_router(app.state.clone())).unwrap();

    let response = server.get("/closing").await;

    assert_eq!(response.status_code(), 302);
}

#[tokio::test]
async fn test_redirect_storage_failure_is_internal_error() {
    let app = common::create_test_app(4);
    app.links.insert("flaky", "https://example.com/flaky");
    app.links.set_offline(true);

    let server = TestServer::new(common::test_router(app.state.clone())).unwrap();

    let response = server.get("/flaky").await;

    assert_eq!(response.status_code(), 500);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "internal_error");
}
