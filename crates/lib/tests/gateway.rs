//! End-to-end: start the gateway on a free port with a mock light bridge and a mock
//! connector, POST activities, and observe the PUTs and replies they cause.
//! The gateway task is left running when each test ends.

mod common;

use axum::http::{Method, StatusCode};
use common::{free_port, hung_server, MockServer};
use mazerobo::config::Config;
use mazerobo::gateway;
use serde_json::json;
use std::time::Duration;

async fn start_gateway(light_url: String) -> String {
    let port = free_port();
    let mut config = Config::default();
    config.gateway.port = port;
    config.gateway.bind = "127.0.0.1".to_string();
    config.light.url = Some(light_url);
    tokio::spawn(async move {
        let _ = gateway::run_gateway(config).await;
    });

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(format!("{}/", base)).send().await {
            if resp.status().is_success() {
                return base;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway on {} did not come up within 5s", base);
}

async fn post_activity(base: &str, activity: serde_json::Value) -> StatusCode {
    reqwest::Client::new()
        .post(format!("{}/api/messages", base))
        .json(&activity)
        .send()
        .await
        .expect("post activity")
        .status()
}

#[tokio::test]
async fn health_responds_with_running() {
    let bridge = MockServer::ok().await;
    let base = start_gateway(bridge.base_url.clone()).await;
    let json: serde_json::Value = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["runtime"], "running");
    let port: u64 = base.rsplit(':').next().unwrap().parse().unwrap();
    assert_eq!(json["port"].as_u64(), Some(port));
}

#[tokio::test]
async fn turn_on_message_puts_and_replies() {
    let bridge = MockServer::ok().await;
    let connector = MockServer::ok().await;
    let base = start_gateway(format!("{}/lights/1/state", bridge.base_url)).await;

    let status = post_activity(
        &base,
        json!({
            "type": "message",
            "id": "act-1",
            "serviceUrl": connector.base_url,
            "from": { "id": "29:ada", "name": "Ada" },
            "recipient": { "id": "28:bot", "name": "Maze Robo" },
            "conversation": { "id": "conv-1" },
            "text": "<at>Maze Robo</at> turn on",
            "entities": [
                { "type": "mention", "mentioned": { "id": "28:bot" }, "text": "<at>Maze Robo</at>" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let replies = connector.wait_for(1).await;
    assert_eq!(replies[0].method, Method::POST);
    assert_eq!(replies[0].path, "/v3/conversations/conv-1/activities/act-1");
    assert_eq!(
        replies[0].json()["text"],
        "Sure Ada, I have turned the light on."
    );

    let puts = bridge.requests();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].method, Method::PUT);
    assert_eq!(puts[0].path, "/lights/1/state");
    assert_eq!(puts[0].json(), json!({"on": true, "hue": 2002, "sat": 254}));
}

#[tokio::test]
async fn card_action_deletes_card_before_replying() {
    let bridge = MockServer::ok().await;
    let connector = MockServer::ok().await;
    let base = start_gateway(bridge.base_url.clone()).await;

    post_activity(
        &base,
        json!({
            "type": "message",
            "id": "act-2",
            "replyToId": "card-1",
            "serviceUrl": connector.base_url,
            "from": { "id": "29:ada", "name": "Ada" },
            "recipient": { "id": "28:bot" },
            "conversation": { "id": "conv-1" },
            "value": { "cardAction": "changeColourPurple" }
        }),
    )
    .await;

    let calls = connector.wait_for(2).await;
    assert_eq!(calls[0].method, Method::DELETE);
    assert_eq!(calls[0].path, "/v3/conversations/conv-1/activities/card-1");
    assert_eq!(calls[1].method, Method::POST);
    assert_eq!(calls[1].json()["text"], "Ada changed the colour to purple.");
    assert_eq!(
        bridge.requests()[0].json(),
        json!({"on": true, "hue": 51245, "sat": 254})
    );
}

#[tokio::test]
async fn light_failure_still_confirms() {
    let connector = MockServer::ok().await;
    // Port with nothing listening: the PUT itself fails.
    let dead_light = format!("http://127.0.0.1:{}/state", free_port());
    let base = start_gateway(dead_light).await;

    post_activity(
        &base,
        json!({
            "type": "message",
            "id": "act-3",
            "serviceUrl": connector.base_url,
            "from": { "id": "29:ada", "name": "Ada" },
            "recipient": { "id": "28:bot" },
            "conversation": { "id": "conv-1" },
            "text": "turn off"
        }),
    )
    .await;

    let replies = connector.wait_for(1).await;
    assert_eq!(
        replies[0].json()["text"],
        "Sure Ada, I have turned the light off."
    );
}

#[tokio::test]
async fn hung_light_does_not_block_other_conversations() {
    let connector = MockServer::ok().await;
    let bridge = hung_server().await;
    let base = start_gateway(format!("{}/state", bridge)).await;

    post_activity(
        &base,
        json!({
            "type": "message",
            "id": "act-a",
            "serviceUrl": connector.base_url,
            "from": { "id": "29:ada", "name": "Ada" },
            "recipient": { "id": "28:bot" },
            "conversation": { "id": "conv-a" },
            "text": "turn on"
        }),
    )
    .await;
    post_activity(
        &base,
        json!({
            "type": "message",
            "id": "act-b",
            "serviceUrl": connector.base_url,
            "from": { "id": "29:bob", "name": "Bob" },
            "recipient": { "id": "28:bot" },
            "conversation": { "id": "conv-b" },
            "text": "hello"
        }),
    )
    .await;

    let replies = connector.wait_for(1).await;
    assert_eq!(replies[0].path, "/v3/conversations/conv-b/activities/act-b");
    assert_eq!(replies[0].json()["text"], "Oh, hello to you as well!");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(connector.requests().len(), 1);
}

#[tokio::test]
async fn bot_added_gets_welcome_card() {
    let bridge = MockServer::ok().await;
    let connector = MockServer::ok().await;
    let base = start_gateway(bridge.base_url.clone()).await;

    post_activity(
        &base,
        json!({
            "type": "conversationUpdate",
            "id": "act-4",
            "serviceUrl": connector.base_url,
            "recipient": { "id": "bot-id" },
            "conversation": { "id": "conv-2" },
            "membersAdded": [{ "id": "bot-id" }]
        }),
    )
    .await;

    let replies = connector.wait_for(1).await;
    let body = replies[0].json();
    assert_eq!(
        body["attachments"][0]["contentType"],
        "application/vnd.microsoft.card.adaptive"
    );
    assert_eq!(body["attachments"][0]["content"]["type"], "AdaptiveCard");
}

#[tokio::test]
async fn malformed_activity_is_rejected() {
    let bridge = MockServer::ok().await;
    let base = start_gateway(bridge.base_url.clone()).await;
    let status = reqwest::Client::new()
        .post(format!("{}/api/messages", base))
        .body("{ not json")
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
