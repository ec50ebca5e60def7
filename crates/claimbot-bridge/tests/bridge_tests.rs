// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge gateway against a mock HTTP server.

use claimbot_bridge::BridgeGateway;
use claimbot_config::model::GatewayConfig;
use claimbot_core::{ClaimbotError, ControlRef, HealthStatus, MessagingGateway};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        bridge_url: server.uri(),
        api_id: Some(123456),
        api_hash: Some("abcdef".into()),
        session: "main".into(),
        request_timeout_secs: 5,
    }
}

async fn connected(server: &MockServer) -> BridgeGateway {
    Mock::given(method("POST"))
        .and(path("/v1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1"})))
        .mount(server)
        .await;

    let mut gw = BridgeGateway::new(&config(server)).unwrap();
    gw.connect().await.unwrap();
    gw
}

#[tokio::test]
async fn connect_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/session"))
        .and(body_json(json!({
            "api_id": 123456,
            "api_hash": "abcdef",
            "session": "main"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut gw = BridgeGateway::new(&config(&server)).unwrap();
    gw.connect().await.unwrap();
    assert!(gw.is_connected());
}

#[tokio::test]
async fn rejected_credentials_are_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/session"))
        .respond_with(ResponseTemplate::new(401).set_body_string("session expired"))
        .mount(&server)
        .await;

    let mut gw = BridgeGateway::new(&config(&server)).unwrap();
    let err = gw.connect().await.unwrap_err();
    assert!(err.is_fatal(), "got {err}");
    assert!(err.to_string().contains("session expired"));
}

#[tokio::test]
async fn send_uses_bearer_token() {
    let server = MockServer::start().await;
    let gw = connected(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chats/ltc_bot/messages"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({"text": "/start"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 501,
            "sent_at": "2026-03-10T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sent = gw.send_message("ltc_bot", "/start").await.unwrap();
    assert_eq!(sent.id, "501");
    assert_eq!(sent.sent_at.to_rfc3339(), "2026-03-10T12:00:00+00:00");
}

#[tokio::test]
async fn fetch_returns_newest_first_within_limit() {
    let server = MockServer::start().await;
    let gw = connected(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/chats/ltc_bot/messages"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {"id": 1, "text": "old", "timestamp": "2026-03-10T11:00:00Z"},
                {"id": 3, "text": "menu", "timestamp": "2026-03-10T12:00:02Z",
                 "controls": [[{"label": "Hourly Bonus"}]]},
                {"id": 2, "text": "mid", "timestamp": "2026-03-10T12:00:01Z"}
            ]
        })))
        .mount(&server)
        .await;

    let messages = gw.fetch_recent_messages("ltc_bot", 2).await.unwrap();
    let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["3", "2"]);
    assert_eq!(messages[0].controls[0][0].label, "Hourly Bonus");
}

#[tokio::test]
async fn press_posts_row_and_col() {
    let server = MockServer::start().await;
    let gw = connected(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chats/ltc_bot/messages/77/press"))
        .and(body_json(json!({"row": 1, "col": 0})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let control = ControlRef {
        message_id: "77".into(),
        row: 1,
        col: 0,
    };
    gw.press_control("ltc_bot", &control).await.unwrap();
}

#[tokio::test]
async fn server_error_is_transport() {
    let server = MockServer::start().await;
    let gw = connected(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/chats/ltc_bot/messages"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = gw.fetch_recent_messages("ltc_bot", 5).await.unwrap_err();
    assert!(matches!(err, ClaimbotError::Transport { .. }), "got {err}");
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn revoked_session_mid_run_is_auth() {
    let server = MockServer::start().await;
    let gw = connected(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chats/ltc_bot/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = gw.send_message("ltc_bot", "/start").await.unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn malformed_body_is_transport() {
    let server = MockServer::start().await;
    let gw = connected(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chats/ltc_bot/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = gw.send_message("ltc_bot", "/start").await.unwrap_err();
    assert!(matches!(err, ClaimbotError::Transport { .. }));
}

#[tokio::test]
async fn calls_before_connect_fail() {
    let server = MockServer::start().await;
    let gw = BridgeGateway::new(&config(&server)).unwrap();
    let err = gw.send_message("ltc_bot", "/start").await.unwrap_err();
    assert!(matches!(err, ClaimbotError::Transport { .. }));
}

#[tokio::test]
async fn health_maps_status_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "degraded", "detail": "reconnecting"})),
        )
        .mount(&server)
        .await;

    let gw = BridgeGateway::new(&config(&server)).unwrap();
    assert_eq!(
        gw.health_check().await.unwrap(),
        HealthStatus::Degraded("reconnecting".into())
    );
}
