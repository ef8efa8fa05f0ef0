use async_trait::async_trait;
use greenplug::config::Config;
use greenplug::controller::Controller;
use greenplug::error::{GreenplugError, Result};
use greenplug::metrics::{MetricRecord, MetricsSink};
use greenplug::provider::ProviderClient;
use greenplug::switch::{ReconcileOutcome, SwitchEndpoint};
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct FakeSwitch {
    state: Mutex<bool>,
    fail_read: bool,
    writes: Mutex<Vec<bool>>,
    values: Mutex<Vec<u32>>,
}

#[async_trait]
impl SwitchEndpoint for FakeSwitch {
    async fn current_state(&self) -> Result<bool> {
        if self.fail_read {
            return Err(GreenplugError::transport("connection refused"));
        }
        Ok(*self.state.lock().unwrap())
    }

    async fn set_state(&self, on: bool) -> Result<()> {
        self.writes.lock().unwrap().push(on);
        *self.state.lock().unwrap() = on;
        Ok(())
    }

    async fn publish_value(&self, percent: u32) -> Result<()> {
        self.values.lock().unwrap().push(percent);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<(String, Vec<MetricRecord>)>>,
    fail: bool,
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn put_metrics(&self, namespace: &str, records: &[MetricRecord]) -> Result<()> {
        if self.fail {
            return Err(GreenplugError::metrics_sink("sink unavailable"));
        }
        self.batches
            .lock()
            .unwrap()
            .push((namespace.to_string(), records.to_vec()));
        Ok(())
    }
}

fn scenario_payload(
    wind: &str,
    hydro: &str,
    solar: &str,
    thermal: &str,
    forecast: &str,
    total: &str,
) -> serde_json::Value {
    serde_json::json!({
        "Data": {
            "LblReadDate": "01/01/24 00:00,01/01/24 00:15,",
            "LblWindData": wind,
            "LblHydroData": hydro,
            "LblSolarData": solar,
            "LblThermData": thermal,
            "LblForecastData": forecast,
            "LblTotalData": total,
        }
    })
}

async fn mock_provider(payload: serde_json::Value) -> (MockServer, ProviderClient) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-electricity-generation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.provider.url = format!("{}/get-electricity-generation", server.uri());
    config.provider.timeout_seconds = 5;
    let client = ProviderClient::new(&config.provider).unwrap();
    (server, client)
}

fn test_config(value_suffix: Option<&str>) -> Config {
    let mut config = Config::default();
    config.sequematic.switch_url_suffix = "9999/ABCDF0123/plug".to_string();
    config.sequematic.value_url_suffix = value_suffix.map(str::to_string);
    config
}

#[tokio::test]
async fn scenario_a_half_green_turns_switch_off() {
    let payload = scenario_payload("10,12,", "5,6,", "3,4,", "20,22,", "40,44,", "38,42,");
    let (_server, provider) = mock_provider(payload).await;

    let controller = Controller::new(
        test_config(None),
        provider,
        FakeSwitch {
            state: Mutex::new(true),
            ..FakeSwitch::default()
        },
        RecordingSink::default(),
    );

    // green = 12+6+4 = 22 of load 44 -> 50% < 80% -> switch off
    let outcome = controller.run_once().await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Changed { on: false });
}

#[tokio::test]
async fn scenario_b_full_green_turns_switch_on_at_boundary() {
    let payload = scenario_payload("20,40,", "10,20,", "10,20,", "20,22,", "40,80,", "60,102,");
    let (_server, provider) = mock_provider(payload).await;

    let controller = Controller::new(
        test_config(None),
        provider,
        FakeSwitch::default(),
        RecordingSink::default(),
    );

    // green = 80 of load 80 -> 100% >= 80% -> switch on
    let outcome = controller.run_once().await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Changed { on: true });
}

#[tokio::test]
async fn metrics_are_batched_under_the_greenplug_namespace() {
    let payload = scenario_payload("10,12,", "5,6,", "3,4,", "20,22,", "40,44,", "38,42,");
    let (_server, provider) = mock_provider(payload).await;

    let sink = std::sync::Arc::new(RecordingSink::default());
    let controller = Controller::new(
        test_config(None),
        provider,
        FakeSwitch::default(),
        SharedSink(sink.clone()),
    );
    controller.run_once().await.unwrap();

    let batches = sink.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let (namespace, records) = &batches[0];
    assert_eq!(namespace, "greenplug");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].value, 22);
    assert_eq!(records[2].value, 44);
}

struct SharedSink(std::sync::Arc<RecordingSink>);

#[async_trait]
impl MetricsSink for SharedSink {
    async fn put_metrics(&self, namespace: &str, records: &[MetricRecord]) -> Result<()> {
        self.0.put_metrics(namespace, records).await
    }
}

#[tokio::test]
async fn metrics_failure_does_not_block_reconciliation() {
    let payload = scenario_payload("10,12,", "5,6,", "3,4,", "20,22,", "40,44,", "38,42,");
    let (_server, provider) = mock_provider(payload).await;

    let controller = Controller::new(
        test_config(None),
        provider,
        FakeSwitch {
            state: Mutex::new(true),
            ..FakeSwitch::default()
        },
        RecordingSink {
            fail: true,
            ..RecordingSink::default()
        },
    );

    let outcome = controller.run_once().await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Changed { on: false });
}

#[tokio::test]
async fn green_percent_is_published_when_value_variable_is_configured() {
    let payload = scenario_payload("10,12,", "5,6,", "3,4,", "20,22,", "40,44,", "38,42,");
    let (_server, provider) = mock_provider(payload).await;

    let switch = std::sync::Arc::new(FakeSwitch::default());
    let controller = Controller::new(
        test_config(Some("9999/ABCDF0123/pct")),
        provider,
        SharedSwitch(switch.clone()),
        RecordingSink::default(),
    );
    controller.run_once().await.unwrap();

    assert_eq!(*switch.values.lock().unwrap(), vec![50]);
}

struct SharedSwitch(std::sync::Arc<FakeSwitch>);

#[async_trait]
impl SwitchEndpoint for SharedSwitch {
    async fn current_state(&self) -> Result<bool> {
        self.0.current_state().await
    }
    async fn set_state(&self, on: bool) -> Result<()> {
        self.0.set_state(on).await
    }
    async fn publish_value(&self, percent: u32) -> Result<()> {
        self.0.publish_value(percent).await
    }
}

#[tokio::test]
async fn unreadable_switch_state_fails_the_run_without_writes() {
    let payload = scenario_payload("10,12,", "5,6,", "3,4,", "20,22,", "40,44,", "38,42,");
    let (_server, provider) = mock_provider(payload).await;

    let switch = std::sync::Arc::new(FakeSwitch {
        fail_read: true,
        ..FakeSwitch::default()
    });
    let controller = Controller::new(
        test_config(None),
        provider,
        SharedSwitch(switch.clone()),
        RecordingSink::default(),
    );

    let err = controller.run_once().await.unwrap_err();
    assert!(matches!(err, GreenplugError::Transport { .. }));
    assert!(switch.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_provider_payload_fails_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-electricity-generation"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut config = test_config(None);
    config.provider.url = format!("{}/get-electricity-generation", server.uri());
    let provider = ProviderClient::new(&config.provider).unwrap();

    let controller = Controller::new(
        config,
        provider,
        FakeSwitch::default(),
        RecordingSink::default(),
    );
    let err = controller.run_once().await.unwrap_err();
    assert!(matches!(err, GreenplugError::MalformedReading { .. }));
}
