#![allow(clippy::unwrap_used)]
// Integration tests for `Coordinator` and `Controller` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flameboss_api::{Credentials, FlameBossClient};
use flameboss_core::{
    Controller, ControllerConfig, Coordinator, CoordinatorConfig, CoreError, ReadingKey,
    ReadingValue, RefreshState, TransportConfig, onboard,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials() -> Credentials {
    Credentials {
        username: "pitmaster".into(),
        auth_token: SecretString::from("tok-123".to_string()),
        device_id: Some("42".into()),
    }
}

fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig {
        poll_interval: Duration::from_millis(100),
        refresh_timeout: Duration::from_secs(2),
    }
}

async fn setup(config: CoordinatorConfig) -> (MockServer, Coordinator) {
    let server = MockServer::start().await;
    let client = FlameBossClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    );
    client.restore(credentials());
    let coordinator = Coordinator::new(Arc::new(client), config);
    (server, coordinator)
}

fn controller_config(server: &MockServer) -> ControllerConfig {
    let mut config = ControllerConfig::new(credentials())
        .unwrap()
        .with_base_url(Url::parse(&server.uri()).unwrap());
    config.poll_interval = Duration::from_millis(100);
    config
}

fn cook(online: bool, pit_temp: i32) -> serde_json::Value {
    json!({
        "id": 7,
        "title": "Overnight brisket",
        "online": online,
        "data_cnt": 1,
        "data": [{
            "sec": 1_700_000_000,
            "set_temp": 1000,
            "pit_temp": pit_temp,
            "meat_temp1": 600,
            "fan_dc": 4000
        }],
        "probe_name_0": "Pit",
        "probe_name_1": "Point"
    })
}

async fn mount_cook_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cooks": [{ "id": 7 }] })))
        .mount(server)
        .await;
}

async fn mount_cook(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v4/cooks/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_normalizes_and_caches() {
    let (server, coordinator) = setup(fast_config()).await;
    mount_cook_list(&server).await;
    mount_cook(&server, cook(true, 990)).await;

    assert!(coordinator.snapshot().is_none());
    assert!(coordinator.last_success().is_none());

    let snap = coordinator.refresh().await.unwrap();

    assert_eq!(snap.pit_temp, Some(210));
    assert_eq!(snap.pit_set_temp, Some(212));
    assert_eq!(snap.meat_temp1, Some(140));
    assert_eq!(snap.fan_duty_percent, Some(40));
    assert!(Arc::ptr_eq(&snap, &coordinator.snapshot().unwrap()));
    assert_eq!(coordinator.state(), RefreshState::Idle);
    assert!(coordinator.data_age().is_some());
}

#[tokio::test]
async fn test_concurrent_refreshes_share_one_fetch() {
    let (server, coordinator) = setup(fast_config()).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "cooks": [{ "id": 7 }] }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/cooks/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cook(true, 990)))
        .expect(1)
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(coordinator.refresh(), coordinator.refresh());

    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
}

#[tokio::test]
async fn test_failed_refresh_keeps_cached_snapshot() {
    let (server, coordinator) = setup(fast_config()).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cooks": [{ "id": 7 }] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    mount_cook(&server, cook(true, 990)).await;

    let first = coordinator.refresh().await.unwrap();
    let mut states = coordinator.watch_state();

    let err = coordinator.refresh().await.unwrap_err();

    assert!(matches!(err, CoreError::UpdateFailed { .. }), "got: {err:?}");
    assert!(matches!(err.root_cause(), CoreError::Api { status: Some(500), .. }));
    assert!(err.is_transient());
    assert!(Arc::ptr_eq(&first, &coordinator.snapshot().unwrap()));
    assert!(states.has_changed().unwrap());
    assert!(matches!(*states.borrow_and_update(), RefreshState::Stale { .. }));
}

#[tokio::test]
async fn test_first_refresh_failure_is_setup_failure() {
    let (server, coordinator) = setup(fast_config()).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cooks": [] })))
        .mount(&server)
        .await;

    let err = coordinator.first_refresh().await.unwrap_err();

    assert!(matches!(err, CoreError::SetupFailed { .. }), "got: {err:?}");
    assert!(matches!(err.root_cause(), CoreError::NotFound { .. }));
    assert!(coordinator.snapshot().is_none());

    // Nothing to serve, so the timer refuses to start.
    assert!(coordinator.start().await.is_err());
}

#[tokio::test]
async fn test_refresh_timeout() {
    let (server, coordinator) = setup(CoordinatorConfig {
        poll_interval: Duration::from_secs(30),
        refresh_timeout: Duration::from_millis(100),
    })
    .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "cooks": [{ "id": 7 }] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = coordinator.refresh().await.unwrap_err();

    assert!(matches!(err.root_cause(), CoreError::Timeout { .. }), "got: {err:?}");
    assert!(coordinator.snapshot().is_none());
    assert!(coordinator.state().is_stale());
}

#[tokio::test]
async fn test_rejected_token_requires_reauth() {
    let (server, coordinator) = setup(fast_config()).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = coordinator.refresh().await.unwrap_err();

    assert!(err.requires_reauth());
    assert!(matches!(coordinator.state(), RefreshState::ReauthRequired { .. }));
}

#[tokio::test]
async fn test_subscribers_see_successful_refreshes() {
    let (server, coordinator) = setup(fast_config()).await;
    mount_cook_list(&server).await;
    mount_cook(&server, cook(true, 990)).await;

    let mut stream = coordinator.subscribe();
    assert!(stream.current().is_none());

    let refreshed = coordinator.refresh().await.unwrap();
    let seen = stream.changed().await.unwrap();

    assert!(Arc::ptr_eq(&refreshed, &seen));
    assert!(Arc::ptr_eq(&seen, stream.current().unwrap()));
}

// ── Controller ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_onboard_logs_in_and_discovers_device() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/sessions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user_id": 11, "auth_token": "tok-new" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip_devices": [{ "id": 42 }] })))
        .mount(&server)
        .await;

    let account = onboard(
        Url::parse(&server.uri()).unwrap(),
        "pitmaster",
        &SecretString::from("hunter2".to_string()),
        &TransportConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(account.user_id, 11);
    assert_eq!(account.credentials.username, "pitmaster");
    assert_eq!(account.credentials.device_id.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_onboard_rejected_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/sessions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = onboard(
        Url::parse(&server.uri()).unwrap(),
        "pitmaster",
        &SecretString::from("wrong".to_string()),
        &TransportConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_controller_lifecycle() {
    let server = MockServer::start().await;
    mount_cook_list(&server).await;
    mount_cook(&server, cook(true, 990)).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/devices/42/set_set_temp"))
        .and(body_string("temp_tdc=1211"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(controller_config(&server)).unwrap();
    let mut stream = controller.subscribe();

    controller.connect().await.unwrap();
    assert!(controller.coordinator().is_running());
    assert_eq!(controller.snapshot().unwrap().title, "Overnight brisket");

    // The first change is the connect refresh; the second comes from the timer.
    stream.changed().await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), stream.changed())
        .await
        .unwrap()
        .unwrap();

    controller.set_target_temperature(250).await.unwrap();

    controller.disconnect().await;
    assert!(!controller.coordinator().is_running());
    assert!(controller.snapshot().is_some());
    assert!(matches!(controller.refresh().await, Err(CoreError::ShutDown)));
}

#[tokio::test]
async fn test_offline_controller_readings() {
    let server = MockServer::start().await;
    mount_cook_list(&server).await;
    mount_cook(&server, cook(false, 990)).await;

    let controller = Controller::oneshot(controller_config(&server)).await.unwrap();
    let readings = controller.readings();

    assert_eq!(readings.len(), 7);
    assert_eq!(readings[0].key, ReadingKey::Online);
    assert_eq!(readings[0].value, Some(ReadingValue::State("Offline")));
    assert!(readings[1..].iter().all(|r| r.value.is_none()));
    assert!(!controller.coordinator().is_running());
}

#[tokio::test]
async fn test_reauthenticate_resumes_polling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cooks": [{ "id": 7 }] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/cooks"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_cook_list(&server).await;
    mount_cook(&server, cook(true, 990)).await;
    Mock::given(method("POST"))
        .and(path("/api/v4/sessions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user_id": 11, "auth_token": "tok-new" })),
        )
        .mount(&server)
        .await;

    let controller = Controller::oneshot(controller_config(&server)).await.unwrap();
    assert!(controller.refresh().await.unwrap_err().requires_reauth());
    assert!(matches!(controller.state(), RefreshState::ReauthRequired { .. }));

    let account = controller
        .reauthenticate(&SecretString::from("hunter2".to_string()))
        .await
        .unwrap();

    assert_eq!(account.user_id, 11);
    assert_eq!(account.credentials.device_id.as_deref(), Some("42"));
    assert_eq!(controller.state(), RefreshState::Idle);
}
