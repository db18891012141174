//! End-to-end correlation: client interceptor against the real server.

use correlation_demo::client::{ClientError, ClientTelemetry, CorrelatedClient};
use correlation_demo::config::ClientConfig;
use correlation_demo::telemetry::{TelemetryChannel, CORRELATION_ID_PROPERTY};

mod common;

#[tokio::test]
async fn one_id_links_client_and_server_telemetry() {
    let (addr, server_captured, shutdown) = common::spawn_api_server().await;

    let (client_channel, client_captured) = TelemetryChannel::capture();
    let config = ClientConfig {
        api_base_url: format!("http://{}", addr),
        max_attempts: 3,
        retry_delay_ms: 50,
    };
    let client = CorrelatedClient::new(&config, ClientTelemetry::new(client_channel)).unwrap();

    let values = client.get_values().await.unwrap();
    assert_eq!(values, vec!["value1", "value2"]);

    // The client logged one success event with the echoed id.
    let client_events = client_captured.events();
    assert_eq!(client_events.len(), 1);
    let client_id = client_events[0].properties[CORRELATION_ID_PROPERTY].clone();
    assert!(!client_id.is_empty());

    // Every server-side record carries the same id the client minted.
    let server_events = server_captured.events();
    assert_eq!(server_events.len(), 2);
    for event in &server_events {
        assert_eq!(event.properties[CORRELATION_ID_PROPERTY], client_id);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn server_failures_are_correlated_across_both_sides() {
    let (addr, server_captured, shutdown) = common::spawn_api_server().await;

    let (client_channel, client_captured) = TelemetryChannel::capture();
    let config = ClientConfig {
        api_base_url: format!("http://{}", addr),
        max_attempts: 3,
        retry_delay_ms: 20,
    };
    let client = CorrelatedClient::new(&config, ClientTelemetry::new(client_channel)).unwrap();

    let error = client.get("/api/v1.0/values/fail").await.unwrap_err();
    match &error {
        ClientError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {:?}", other),
    }

    // The client logged exactly one exception, for the final attempt.
    let client_exceptions = client_captured.exceptions();
    assert_eq!(client_exceptions.len(), 1);
    let client_id = client_exceptions[0].properties[CORRELATION_ID_PROPERTY].clone();
    assert!(!client_id.is_empty());
    assert_eq!(
        client_exceptions[0].properties["status"],
        "500 - Internal Server Error"
    );

    // The server logged one exception per attempt, all under the same id
    // because retries share the logical call's identifier.
    let server_exceptions = server_captured.exceptions();
    assert_eq!(server_exceptions.len(), 3);
    for exception in &server_exceptions {
        assert_eq!(exception.properties[CORRELATION_ID_PROPERTY], client_id);
    }

    shutdown.trigger();
}
