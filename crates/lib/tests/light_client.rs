//! LightClient against a mock bridge: method, header and literal bodies on the wire.

mod common;

use axum::http::{Method, StatusCode};
use common::MockServer;
use mazerobo::light::{Colour, LightAction, LightClient, LightControl, LIGHT_CONTENT_TYPE};
use serde_json::json;

#[tokio::test]
async fn put_carries_literal_body_and_content_type() {
    let bridge = MockServer::ok().await;
    let url = format!("{}/api/user/lights/1/state", bridge.base_url);
    let client = LightClient::new(url);

    client
        .apply(LightAction::SetColour(Colour::Teal).command())
        .await
        .unwrap();

    let got = bridge.requests();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].method, Method::PUT);
    assert_eq!(got[0].path, "/api/user/lights/1/state");
    assert_eq!(got[0].header("content-type").as_deref(), Some(LIGHT_CONTENT_TYPE));
    assert_eq!(got[0].json(), json!({"on": true, "hue": 38775, "sat": 254}));
}

#[tokio::test]
async fn error_status_is_not_inspected() {
    let bridge = MockServer::start(StatusCode::INTERNAL_SERVER_ERROR, json!([])).await;
    let client = LightClient::new(bridge.base_url.clone());
    assert!(client.apply(LightAction::TurnOff.command()).await.is_ok());
    assert_eq!(bridge.requests()[0].json(), json!({"on": false}));
}

#[tokio::test]
async fn unreachable_bridge_is_an_error() {
    let port = common::free_port();
    let client = LightClient::new(format!("http://127.0.0.1:{}/state", port));
    assert!(client.apply(LightAction::TurnOn.command()).await.is_err());
}
