//! Provisioning tests against a mock device-management server.

use axum::http::Method;
use serde_json::Value;

use datacollector::config::ProvisioningConfig;
use datacollector::lwm2m::{ServerClient, ServerError, STATUS_CHANGED};
use datacollector::registration::HandlerError;
use datacollector::RegistrationHandler;

mod common;

const OBJECTS: [u16; 7] = [3301, 3303, 3304, 3324, 3325, 3330, 3348];

#[tokio::test]
async fn test_time_sync_then_observations_in_order() {
    let server = common::start_healthy_server().await;
    let handler = server.handler();

    let report = handler.handle(br#"{"endpoint":"node-1"}"#).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.endpoint, "node-1");
    assert_eq!(report.time_sync.as_ref().unwrap().attempts, 1);
    assert_eq!(
        report.observations.iter().map(|(object, _)| *object).collect::<Vec<_>>(),
        OBJECTS.to_vec()
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 8);

    let sync = &requests[0];
    assert_eq!(sync.method, Method::PUT);
    assert_eq!(sync.path, "/api/clients/node-1/3/0/13");
    assert_eq!(sync.query.as_deref(), Some("format=Text"));
    let body: Value = serde_json::from_str(&sync.body).unwrap();
    assert_eq!(body["id"], 13);
    assert!(body["value"].as_str().unwrap().ends_with('Z'));

    for (request, object) in requests[1..].iter().zip(OBJECTS) {
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, format!("/api/clients/node-1/{}/0/observe", object));
    }
}

#[tokio::test]
async fn test_retries_until_marker_arrives() {
    let server = common::start_mock_server(|request, previous| {
        if request.method == Method::PUT && previous < 2 {
            (500, "internal error".to_string())
        } else {
            (200, common::healthy_body(&request.method))
        }
    })
    .await;

    let outcome = server.handler().sync_time("node-2").await.unwrap();

    assert!(outcome.succeeded);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.response.marker(), Some(STATUS_CHANGED));
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_ok_status_with_wrong_marker_is_retried() {
    let server = common::start_mock_server(|_, previous| {
        if previous == 0 {
            (200, r#"{"status":"NOT_FOUND"}"#.to_string())
        } else {
            (200, r#"{"status":"CONTENT"}"#.to_string())
        }
    })
    .await;

    let outcome = server.handler().start_observation("node-3", 3303).await.unwrap();

    assert!(outcome.succeeded);
    assert_eq!(outcome.attempts, 2);
}

#[tokio::test]
async fn test_not_found_marker_exhausts_every_call_without_aborting() {
    let server = common::start_mock_server(|_, _| (200, r#"{"status":"NOT_FOUND"}"#.to_string())).await;

    let report = server.handler().provision("ghost").await.unwrap();

    let time_sync = report.time_sync.as_ref().unwrap();
    assert!(time_sync.is_exhausted());
    assert_eq!(time_sync.attempts, 5);
    assert_eq!(time_sync.response.marker(), Some("NOT_FOUND"));

    assert_eq!(report.failed_objects(), OBJECTS.to_vec());
    assert!(report.observations.iter().all(|(_, outcome)| outcome.attempts == 5));
    assert_eq!(server.requests().len(), 8 * 5);
}

#[tokio::test]
async fn test_unknown_client_plain_text_aborts_event() {
    let server = common::start_mock_server(|_, _| {
        (404, "no registered client with id 'ghost'".to_string())
    })
    .await;

    let result = server.handler().handle(br#"{"endpoint":"ghost"}"#).await;

    assert!(matches!(
        result,
        Err(HandlerError::Server(ServerError::NoStatusMarker(status))) if status.as_u16() == 404
    ));
    // time sync is retried to exhaustion, no observation follows
    assert_eq!(server.requests().len(), 5);
    assert!(server.requests().iter().all(|request| request.method == Method::PUT));
}

#[tokio::test]
async fn test_ok_reply_without_json_aborts_immediately() {
    let server = common::start_mock_server(|_, _| (200, "<html>ok</html>".to_string())).await;

    let result = server.handler().handle(br#"{"endpoint":"node-6"}"#).await;

    assert!(matches!(
        result,
        Err(HandlerError::Server(ServerError::NoStatusMarker(status))) if status.as_u16() == 200
    ));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_custom_plan() {
    let server = common::start_healthy_server().await;
    let handler = server.handler_with(ProvisioningConfig {
        sync_time: false,
        instance: 1,
        objects: vec![3303],
    });

    let report = handler.provision("node-4").await.unwrap();

    assert!(report.time_sync.is_none());
    assert_eq!(server.paths(), vec!["/api/clients/node-4/3303/1/observe"]);
}

#[tokio::test]
async fn test_endpoint_is_percent_encoded() {
    let server = common::start_healthy_server().await;
    let handler = server.handler_with(ProvisioningConfig {
        sync_time: false,
        instance: 0,
        objects: vec![3301],
    });

    handler.handle(br#"{"endpoint":"urn:imei/35 1"}"#).await.unwrap();

    assert_eq!(server.paths(), vec!["/api/clients/urn:imei%2F35%201/3301/0/observe"]);
}

#[tokio::test]
async fn test_transport_error_aborts_event() {
    let addr = common::closed_port().await;
    let url = format!("http://{}/api/clients/", addr).parse().unwrap();
    let client = ServerClient::with_base_url(url).unwrap();
    let handler = RegistrationHandler::new(client, common::fast_policy(), ProvisioningConfig::default());

    let result = handler.handle(br#"{"endpoint":"node-5"}"#).await;

    assert!(matches!(
        result,
        Err(HandlerError::Server(ServerError::Transport(_)))
    ));
}

#[tokio::test]
async fn test_malformed_payload_sends_nothing() {
    let server = common::start_healthy_server().await;
    let handler = server.handler();

    assert!(handler.handle(b"not json").await.is_err());
    assert!(handler.handle(br#"{"registrationId":"x"}"#).await.is_err());
    assert!(handler.handle(br#"{"endpoint":""}"#).await.is_err());

    assert!(server.requests().is_empty());
}
