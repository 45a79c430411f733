use std::sync::Arc;
use std::time::Duration;

use baynav_events::{EventBus, PrivacyLevel};
use baynav_platform::{NoopHaptics, Transport};
use baynav_prefs::keys;
use baynav_safety::{SafetyController, SafetyService};
use baynav_telemetry::Metrics;
use baynav_test_support::{
    InvocationLog, RecordingConcealer, RecordingLauncher, ScriptedConnectivity, ScriptedPrefs,
};
use tokio::time::timeout;

struct Harness {
    prefs: Arc<ScriptedPrefs>,
    connectivity: Arc<ScriptedConnectivity>,
    log: InvocationLog,
    controller: SafetyController,
}

fn harness() -> Harness {
    let log = InvocationLog::new();
    let prefs = Arc::new(ScriptedPrefs::with_log(log.clone()));
    let connectivity = Arc::new(ScriptedConnectivity::new(vec![Transport::Wifi]));
    let launcher = Arc::new(RecordingLauncher::new(log.clone()));
    let concealer = Arc::new(RecordingConcealer::new(log.clone()));
    let engine = Arc::new(SafetyService::new(
        prefs.clone(),
        connectivity.clone(),
        launcher,
        concealer,
        EventBus::new(),
        Metrics::new().expect("metrics registry"),
    ));
    let controller = SafetyController::new(engine, Arc::new(NoopHaptics::new()));
    Harness {
        prefs,
        connectivity,
        log,
        controller,
    }
}

fn prefs_reads(log: &InvocationLog) -> usize {
    log.entries()
        .iter()
        .filter(|entry| entry.starts_with("prefs.get"))
        .count()
}

#[tokio::test]
async fn initialize_loads_settings_and_marks_ready() {
    let h = harness();
    h.prefs.seed_bool(keys::QUICK_EXIT_ENABLED, true);
    h.prefs
        .seed_string(keys::QUICK_EXIT_URL, "https://apnews.com");

    h.controller.initialize().await;

    let state = h.controller.current();
    assert!(state.initialized);
    assert!(state.quick_exit_enabled);
    assert_eq!(state.quick_exit_url, "https://apnews.com");
    assert!(state.show_safety_tips);
    assert_eq!(state.network.level, PrivacyLevel::Caution);
    h.controller.shutdown().await;
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let h = harness();
    h.controller.initialize().await;
    let reads_after_first = prefs_reads(&h.log);
    assert!(reads_after_first > 0);

    h.controller.initialize().await;
    assert_eq!(
        prefs_reads(&h.log),
        reads_after_first,
        "a second initialize must not repeat the load sequence"
    );
    h.controller.shutdown().await;
}

#[tokio::test]
async fn initialize_auto_starts_incognito_session_from_persisted_setting() {
    let h = harness();
    h.prefs.seed_bool(keys::INCOGNITO_MODE, true);

    h.controller.initialize().await;

    let state = h.controller.current();
    assert!(state.incognito_mode_enabled);
    assert!(state.incognito_session_active);
    assert!(h.controller.engine().is_incognito_session());
    h.controller.shutdown().await;
}

#[tokio::test]
async fn initialize_publishes_once_even_when_reads_fail() {
    let h = harness();
    h.prefs.set_fail_reads(true);
    let mut rx = h.controller.subscribe();

    h.controller.initialize().await;

    rx.changed().await.expect("one snapshot is published");
    let state = rx.borrow_and_update().clone();
    assert!(state.initialized);
    assert!(state.show_safety_tips, "defaults are used silently");
    assert_eq!(state.quick_exit_url, "https://www.google.com");
    h.controller.shutdown().await;
}

#[tokio::test]
async fn mutations_notify_optimistically_even_when_the_write_fails() {
    let h = harness();
    h.controller.initialize().await;
    h.prefs.set_fail_writes(true);

    let mut rx = h.controller.subscribe();
    rx.borrow_and_update();

    h.controller.set_quick_exit_enabled(true).await;

    rx.changed().await.expect("mutation must notify");
    assert!(rx.borrow_and_update().quick_exit_enabled);
    assert_eq!(
        h.prefs.stored_bool(keys::QUICK_EXIT_ENABLED),
        None,
        "the durable write failed and is not rolled back in the cache"
    );
    h.controller.shutdown().await;
}

#[tokio::test]
async fn session_toggles_update_the_snapshot() {
    let h = harness();
    h.controller.initialize().await;

    h.controller.start_incognito_session();
    assert!(h.controller.current().incognito_session_active);

    h.controller.end_incognito_session();
    assert!(!h.controller.current().incognito_session_active);
    h.controller.shutdown().await;
}

#[tokio::test]
async fn network_changes_flow_into_the_snapshot() {
    let h = harness();
    h.controller.initialize().await;

    let mut rx = h.controller.subscribe();
    rx.borrow_and_update();

    h.connectivity.set_reading(vec![Transport::Vpn]);

    timeout(Duration::from_secs(2), async {
        loop {
            rx.changed().await.expect("watch channel open");
            if rx.borrow_and_update().network.level == PrivacyLevel::Good {
                break;
            }
        }
    })
    .await
    .expect("snapshot should reflect the new reading");
    h.controller.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_network_updates() {
    let h = harness();
    h.controller.initialize().await;
    h.controller.shutdown().await;

    let mut rx = h.controller.subscribe();
    rx.borrow_and_update();
    h.connectivity.set_reading(vec![Transport::Vpn]);

    let result = timeout(Duration::from_millis(200), rx.changed()).await;
    assert!(
        result.is_err(),
        "no snapshot may be published after teardown"
    );
}

#[tokio::test]
async fn disguise_flow_mirrors_engine_state() {
    let h = harness();
    h.controller.initialize().await;

    let result = h.controller.apply_disguised_icon("notes").await;
    assert!(result.success);
    let state = h.controller.current();
    assert!(state.disguised_mode_enabled);
    assert_eq!(state.disguised_icon.map(|icon| icon.id), Some("notes"));

    let reset = h.controller.reset_to_default_icon().await;
    assert!(reset.success);
    let state = h.controller.current();
    assert!(!state.disguised_mode_enabled);
    assert!(state.disguised_icon.is_none());
    h.controller.shutdown().await;
}

#[tokio::test]
async fn refresh_network_status_requeries_the_signal() {
    let h = harness();
    h.controller.initialize().await;

    h.connectivity.set_fail(true);
    h.controller.refresh_network_status().await;
    assert_eq!(h.controller.current().network.level, PrivacyLevel::Unknown);
    h.controller.shutdown().await;
}
