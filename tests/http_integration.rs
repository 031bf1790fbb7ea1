// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport and station session using wiremock.

use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use technove::{
    ConnectionError, DeviceError, Error, HttpConfig, OutOfBoundError, Payload, RetryPolicy,
    Station, StationInfo, Status,
};
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(mock_server: &MockServer) -> HttpConfig {
    let address = mock_server.address();
    HttpConfig::new(address.ip().to_string())
        .with_port(address.port())
        .with_retry_policy(RetryPolicy::new().with_initial_delay(Duration::from_millis(10)))
}

fn station_for(mock_server: &MockServer) -> Station {
    Station::from_config(config_for(mock_server))
}

fn snapshot(json: serde_json::Value) -> StationInfo {
    StationInfo::from_json(&json).unwrap()
}

// ============================================================================
// Transport Tests
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn json_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("accept"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let payload = station.request("/", Method::GET, None).await.unwrap();

        assert_eq!(payload.as_json().unwrap()["status"], "ok");
    }

    #[tokio::test]
    async fn text_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let payload = station.request("/", Method::GET, None).await.unwrap();

        assert_eq!(payload, Payload::Text("ok".to_string()));
    }

    #[tokio::test]
    async fn unusual_content_type_is_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "plain/text"))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let payload = station.request("/", Method::GET, None).await.unwrap();

        assert_eq!(payload.as_text(), Some("ok"));
    }

    #[tokio::test]
    async fn json_content_type_is_case_insensitive() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"status": "ok"}"#, "Application/JSON"),
            )
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let payload = station.request("/", Method::GET, None).await.unwrap();

        assert_eq!(payload.as_json().unwrap()["status"], "ok");
    }

    #[tokio::test]
    async fn post_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(json!({"key": "value"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let body = json!({"key": "value"});
        let payload = station
            .request("/", Method::POST, Some(&body))
            .await
            .unwrap();

        assert_eq!(payload.as_json().unwrap()["status"], "ok");
    }

    #[tokio::test]
    async fn empty_json_body_is_null() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("", "application/json"))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let payload = station.request("/", Method::GET, None).await.unwrap();

        assert_eq!(payload, Payload::Json(serde_json::Value::Null));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let err = station.request("/", Method::GET, None).await.unwrap_err();

        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn retries_after_timeouts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "nok"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station =
            Station::from_config(config_for(&mock_server).with_timeout(Duration::from_millis(100)));
        let payload = station.request("/", Method::GET, None).await.unwrap();

        assert_eq!(payload.as_json().unwrap()["status"], "ok");
    }

    #[tokio::test]
    async fn timeout_after_retries_exhausted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Vive la poutine!")
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(3)
            .mount(&mock_server)
            .await;

        let mut station =
            Station::from_config(config_for(&mock_server).with_timeout(Duration::from_millis(100)));
        let err = station.request("/", Method::GET, None).await.unwrap_err();

        assert!(err.is_connection());
        assert!(matches!(err, Error::Connection(ConnectionError::Timeout { .. })));
    }

    #[tokio::test]
    async fn retry_bound_is_configurable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = config_for(&mock_server)
            .with_timeout(Duration::from_millis(100))
            .with_retry_policy(RetryPolicy::disabled());
        let mut station = Station::from_config(config);
        let err = station.request("/", Method::GET, None).await.unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn connection_refused() {
        // Reserve a free port, then release it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = HttpConfig::new("127.0.0.1")
            .with_port(port)
            .with_retry_policy(RetryPolicy::new().with_initial_delay(Duration::from_millis(10)));
        let mut station = Station::from_config(config);
        let err = station.request("/", Method::GET, None).await.unwrap_err();

        assert!(err.is_connection());
        assert!(!err.is_timeout());
        assert!(matches!(err, Error::Connection(ConnectionError::Request { .. })));
    }

    #[tokio::test]
    async fn http_error_404_with_text_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("syrop!"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let err = station.request("/", Method::GET, None).await.unwrap_err();

        assert!(!err.is_connection());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.response_body(), Some(&json!({"message": "syrop!"})));
    }

    #[tokio::test]
    async fn http_error_500_with_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"status": "nok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let err = station.request("/", Method::GET, None).await.unwrap_err();

        match err {
            Error::Device(DeviceError::UnexpectedResponse { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, json!({"status": "nok"}));
            }
            other => panic!("Expected UnexpectedResponse, got {other:?}"),
        }
    }
}

// ============================================================================
// Transport Handle Lifecycle Tests
// ============================================================================

mod lifecycle {
    use super::*;

    async fn mount_info(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "testing"})))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn owned_client_is_created_on_first_request_and_closed() {
        let mock_server = MockServer::start().await;
        mount_info(&mock_server).await;

        let mut station = station_for(&mock_server);
        assert!(!station.transport().has_client());

        station.update().await.unwrap();
        assert!(station.transport().has_client());
        assert!(station.transport().owns_client());

        station.close();
        assert!(!station.transport().has_client());
    }

    #[tokio::test]
    async fn closed_station_reconnects_on_next_request() {
        let mock_server = MockServer::start().await;
        mount_info(&mock_server).await;

        let mut station = station_for(&mock_server);
        station.update().await.unwrap();
        station.close();

        let info = station.update().await.unwrap();
        assert_eq!(info.name, "testing");
    }

    #[tokio::test]
    async fn shared_client_is_never_closed() {
        let mock_server = MockServer::start().await;
        mount_info(&mock_server).await;

        let shared = reqwest::Client::new();
        let mut station = Station::with_client(config_for(&mock_server), shared.clone());

        station.update().await.unwrap();
        station.close();

        assert!(station.transport().has_client());
        assert!(!station.transport().owns_client());

        let response = shared
            .get(format!("{}/station/get/info", mock_server.uri()))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn scoped_session() {
        let mock_server = MockServer::start().await;
        mount_info(&mock_server).await;

        let info = station_for(&mock_server)
            .scoped(async |station| station.update().await)
            .await
            .unwrap();

        assert_eq!(info.name, "testing");
    }
}

// ============================================================================
// Station Update Tests
// ============================================================================

mod station_update {
    use super::*;

    #[tokio::test]
    async fn update_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let err = station.update().await.unwrap_err();

        assert!(matches!(err, Error::Device(DeviceError::EmptyResponse)));
        assert!(station.info().is_none());
    }

    #[tokio::test]
    async fn update_falsy_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(0)))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);

        let err = station.update().await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::EmptyResponse)));

        let err = station.update().await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::EmptyResponse)));
    }

    #[tokio::test]
    async fn update_with_irregular_field_types() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "testing",
                "maxCurrent": 24.0,
                "network_ssid": null,
                "auto_charge": "nope",
                "status": 67
            })))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let info = station.update().await.unwrap();

        assert_eq!(info.name, "testing");
        assert_eq!(info.max_current, 24);
        assert_eq!(info.network_ssid, "Unknown");
        assert!(!info.auto_charge);
        assert_eq!(info.status, Status::PluggedCharging);
    }

    #[tokio::test]
    async fn update_partial_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "testing"})))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let info = station.update().await.unwrap();

        assert_eq!(info.name, "testing");
        assert_eq!(info.version, "Unknown");
        assert_eq!(info.max_station_current, 0);
        assert!(!info.auto_charge);
        assert_eq!(info.status, Status::Unknown);
        assert_eq!(station.info(), Some(&info));
    }

    #[tokio::test]
    async fn update_unknown_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "testing", "status": "1234"})),
            )
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let info = station.update().await.unwrap();

        assert_eq!(info.name, "testing");
        assert_eq!(info.status, Status::Unknown);
    }

    // Some client variants reject unknown status codes; this library maps
    // them to Unknown instead and the snapshot still parses.
    #[tokio::test]
    async fn update_unrecognized_status_code_does_not_fail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 42})))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let info = station.update().await.unwrap();

        assert_eq!(info.status, Status::Unknown);
    }

    #[tokio::test]
    async fn update_replaces_snapshot_wholesale() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "first",
                "maxStationCurrent": 32,
                "status": 67
            })))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "second"})))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.update().await.unwrap();
        assert_eq!(station.info().unwrap().max_station_current, 32);

        station.update().await.unwrap();
        let info = station.info().unwrap();
        assert_eq!(info.name, "second");
        assert_eq!(info.max_station_current, 0);
        assert_eq!(info.status, Status::Unknown);
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/get/info"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(json!({"name": "cached"})));

        assert_eq!(station.update().await.unwrap_err().status(), Some(500));
        assert_eq!(station.info().unwrap().name, "cached");
    }
}

// ============================================================================
// Station Command Tests
// ============================================================================

mod station_commands {
    use super::*;

    fn ok_text() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw("ok", "plain/text")
    }

    #[tokio::test]
    async fn set_auto_charge() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/station/set/automatic"))
            .and(body_json(json!({"activated": true})))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_auto_charge(true).await.unwrap();
    }

    #[tokio::test]
    async fn set_charging_enabled() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/control/start"))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/station/control/stop"))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(json!({"auto_charge": false})));

        station.set_charging_enabled(true).await.unwrap();
        station.set_charging_enabled(false).await.unwrap();
    }

    #[tokio::test]
    async fn set_charging_enabled_without_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/station/control/start"))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_charging_enabled(true).await.unwrap();
    }

    #[tokio::test]
    async fn set_charging_enabled_with_auto_charge() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ok_text())
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(json!({"auto_charge": true})));

        let err = station.set_charging_enabled(true).await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::AutoChargeEnabled)));
    }

    #[tokio::test]
    async fn set_max_current() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/station/control/partage"))
            .and(body_json(json!({"stationNumber": 1, "current": 32})))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(
            json!({"maxStationCurrent": 32, "inSharingMode": false}),
        ));

        station.set_max_current(32).await.unwrap();
    }

    #[tokio::test]
    async fn set_max_current_sharing_mode() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/station/control/partage"))
            .respond_with(ok_text())
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(
            json!({"maxStationCurrent": 32, "inSharingMode": true}),
        ));

        let err = station.set_max_current(32).await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::SharingModeEnabled)));
    }

    #[tokio::test]
    async fn set_max_current_too_low() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ok_text())
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(
            json!({"maxStationCurrent": 32, "inSharingMode": false}),
        ));

        let err = station.set_max_current(2).await.unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBound(OutOfBoundError::BelowMinimum { min: 8, actual: 2 })
        ));
    }

    #[tokio::test]
    async fn set_max_current_too_high() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ok_text())
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_info(snapshot(
            json!({"maxStationCurrent": 32, "inSharingMode": false}),
        ));

        let err = station.set_max_current(48).await.unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBound(OutOfBoundError::AboveMaximum { max: 32, actual: 48 })
        ));
    }

    #[tokio::test]
    async fn set_max_current_without_snapshot_only_checks_minimum() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/station/control/partage"))
            .and(body_json(json!({"stationNumber": 1, "current": 48})))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_max_current(48).await.unwrap();

        let err = station.set_max_current(7).await.unwrap_err();
        assert!(err.is_out_of_bound());
    }

    #[tokio::test]
    async fn set_high_rate_schedule() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/station/schedule/high/activate"))
            .and(body_json(json!({"activated": true})))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/station/schedule/high/activate"))
            .and(body_json(json!({"activated": false})))
            .respond_with(ok_text())
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        station.set_high_rate_schedule(true).await.unwrap();
        station.set_high_rate_schedule(false).await.unwrap();
    }

    #[tokio::test]
    async fn command_error_response_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/station/set/automatic"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut station = station_for(&mock_server);
        let err = station.set_auto_charge(false).await.unwrap_err();

        assert_eq!(err.status(), Some(503));
    }
}
