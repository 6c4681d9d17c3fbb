// Tests for `HttpSwitchAgentClient` against a wiremock agent.

use std::time::Duration;

use serde_json::json;
use switch_agent_client::{ClientError, HttpSwitchAgentClient, SwitchAgentClient};
use switch_operator_core::{code, DeviceStatus};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, HttpSwitchAgentClient) {
    let server = MockServer::start().await;
    let client = HttpSwitchAgentClient::new(&server.uri(), Duration::from_secs(1)).unwrap();
    (server, client)
}

#[tokio::test]
async fn get_device_info_decodes_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/GetDeviceInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"code": 0, "message": "Success"},
            "data": {
                "local_mac_address": "aa:bb:cc:00:00:01",
                "hwsku": "Accton-AS7726-32X",
                "sonic_os_version": "12",
                "asic_type": "broadcom",
                "readiness": 1
            }
        })))
        .mount(&server)
        .await;

    let device = client.get_device_info().await.unwrap();
    assert_eq!(device.local_mac_address, "aa:bb:cc:00:00:01");
    assert_eq!(device.hwsku, "Accton-AS7726-32X");
    assert_eq!(device.readiness, 1);
}

#[tokio::test]
async fn set_admin_status_sends_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/SetInterfaceAdminStatus"))
        .and(body_json(json!({"name": "Ethernet0", "admin_status": "up"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {"code": 0, "message": "Success"},
            "data": {
                "name": "Ethernet0",
                "mac_address": "",
                "operation_status": "down",
                "admin_status": "up"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let iface = client
        .set_interface_admin_status("Ethernet0", DeviceStatus::Up)
        .await
        .unwrap();
    assert_eq!(iface.admin_status, DeviceStatus::Up);
    assert_eq!(iface.operation_status, DeviceStatus::Down);
}

#[tokio::test]
async fn nonzero_status_is_remote_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/GetInterfaceNeighbor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {
                "code": 201,
                "message": "failed to get interface neighbor: no LLDP neighbor found for interface Ethernet0"
            }
        })))
        .mount(&server)
        .await;

    let err = client.get_interface_neighbor("Ethernet0").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status_code(), Some(code::NOT_FOUND));
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn http_failure_is_transport_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/ListPorts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_ports().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn garbage_body_is_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/ListInterfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_interfaces().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_agent_is_transport_error() {
    let client = HttpSwitchAgentClient::new("127.0.0.1:1", Duration::from_millis(200)).unwrap();

    let err = client.get_interface("Ethernet0").await.unwrap_err();
    assert!(err.is_retriable());
}
