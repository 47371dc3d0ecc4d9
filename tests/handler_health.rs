mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::create_test_app(common::test_config());
    let server = common::test_server(app.state.clone());

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["message"], "memory");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = common::create_test_app(common::test_config());
    let server = common::test_server(app.state.clone());

    let json = server.get("/health").await.json::<Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("store").is_some());
    assert!(json["checks"].get("cache").is_some());
    assert!(json["checks"].get("click_queue").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let app = common::create_test_app(common::test_config());
    let server = common::test_server(app.state.clone());
    drop(app.click_rx);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}
