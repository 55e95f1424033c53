//! Integration tests for the Icinga2 client against a mock Icinga2 API.

use std::time::Duration;

use alertgram_icinga::{IcingaClient, IcingaConfig};
use alertgram_ledger::AckTarget;
use alertgram_relay::{AcknowledgeRequest, MonitoringApi, MonitoringError, ACK_COMMENT};
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;
use tokio::net::TcpListener;

const ENDPOINT: &str = "/v1/actions/acknowledge-problem";

// base64("alertgram:s3cret")
const BASIC_AUTH: &str = "Basic YWxlcnRncmFtOnMzY3JldA==";

fn client(base_url: &str, timeout: Duration) -> IcingaClient {
    let config = IcingaConfig::new(&format!("{base_url}/"), "alertgram", "s3cret")
        .unwrap()
        .with_timeout(timeout);
    IcingaClient::new(config).unwrap()
}

fn host_request() -> AcknowledgeRequest {
    AcknowledgeRequest::for_target(AckTarget::Host { host: "web1" }, "alice", ACK_COMMENT)
}

#[tokio::test]
async fn posts_acknowledgement_with_basic_auth() {
    let server = MockServer::start();
    let ack = server.mock(|when, then| {
        when.method(POST)
            .path(ENDPOINT)
            .header("authorization", BASIC_AUTH)
            .header("accept", "application/json")
            .json_body(json!({
                "type": "Host",
                "filter": "host.name == host_name",
                "filter_vars": {"host_name": "web1"},
                "author": "alice",
                "comment": ACK_COMMENT,
                "sticky": false,
                "notify": true,
            }));
        then.status(200).json_body(json!({
            "results": [{
                "code": 200.0,
                "name": "web1",
                "status": "Successfully acknowledged problem for object 'web1'."
            }]
        }));
    });

    client(&server.base_url(), Duration::from_secs(5))
        .acknowledge_problem(&host_request())
        .await
        .unwrap();

    ack.assert_calls(1);
}

#[tokio::test]
async fn service_acknowledgement_targets_both_names() {
    let server = MockServer::start();
    let ack = server.mock(|when, then| {
        when.method(POST)
            .path(ENDPOINT)
            .header("authorization", BASIC_AUTH)
            .json_body(json!({
                "type": "Service",
                "filter": "host.name == host_name && service.name == service_name",
                "filter_vars": {"host_name": "db1", "service_name": "disk \"/var\""},
                "author": "bob",
                "comment": ACK_COMMENT,
                "sticky": false,
                "notify": true,
            }));
        then.status(200)
            .json_body(json!({"results": [{"code": 200.0, "status": "ok"}]}));
    });
    let request = AcknowledgeRequest::for_target(
        AckTarget::Service {
            host: "db1",
            service: "disk \"/var\"",
        },
        "bob",
        ACK_COMMENT,
    );

    client(&server.base_url(), Duration::from_secs(5))
        .acknowledge_problem(&request)
        .await
        .unwrap();

    ack.assert_calls(1);
}

#[tokio::test]
async fn rejected_credentials() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(401).json_body(json!({
            "error": 401.0,
            "status": "Unauthorized. Please check your user credentials."
        }));
    });

    let err = client(&server.base_url(), Duration::from_secs(5))
        .acknowledge_problem(&host_request())
        .await
        .unwrap_err();

    assert_eq!(err, MonitoringError::Unauthorized);
}

#[tokio::test]
async fn unknown_object() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(404)
            .json_body(json!({"error": 404.0, "status": "No objects found."}));
    });

    let err = client(&server.base_url(), Duration::from_secs(5))
        .acknowledge_problem(&host_request())
        .await
        .unwrap_err();

    assert!(matches!(err, MonitoringError::NoMatchingObject { .. }));
}

#[tokio::test]
async fn per_object_failure_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(200).json_body(json!({
            "results": [{"code": 409.0, "status": "Object is already acknowledged."}]
        }));
    });

    let err = client(&server.base_url(), Duration::from_secs(5))
        .acknowledge_problem(&host_request())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MonitoringError::Rejected {
            status: 409,
            reason: "Object is already acknowledged.".into()
        }
    );
}

#[tokio::test]
async fn slow_api_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"results": []}));
    });

    let err = client(&server.base_url(), Duration::from_millis(100))
        .acknowledge_problem(&host_request())
        .await
        .unwrap_err();

    assert_eq!(err, MonitoringError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn unreachable_api_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), Duration::from_secs(5))
        .acknowledge_problem(&host_request())
        .await
        .unwrap_err();

    assert!(matches!(err, MonitoringError::Network(_)));
}
