use std::sync::Arc;

use baynav_events::{EventBus, PrivacyLevel};
use baynav_platform::Transport;
use baynav_prefs::keys;
use baynav_safety::{PERSISTED_HISTORY_CAP, SESSION_HISTORY_CAP, SafetyService};
use baynav_telemetry::Metrics;
use baynav_test_support::{
    InvocationLog, RecordingConcealer, RecordingLauncher, ScriptedConnectivity, ScriptedPrefs,
};

struct Harness {
    prefs: Arc<ScriptedPrefs>,
    connectivity: Arc<ScriptedConnectivity>,
    launcher: Arc<RecordingLauncher>,
    log: InvocationLog,
    engine: SafetyService,
}

fn harness() -> Harness {
    let log = InvocationLog::new();
    let prefs = Arc::new(ScriptedPrefs::with_log(log.clone()));
    let connectivity = Arc::new(ScriptedConnectivity::new(vec![Transport::Wifi]));
    let launcher = Arc::new(RecordingLauncher::new(log.clone()));
    let concealer = Arc::new(RecordingConcealer::new(log.clone()));
    let engine = SafetyService::new(
        prefs.clone(),
        connectivity.clone(),
        launcher.clone(),
        concealer,
        EventBus::new(),
        Metrics::new().expect("metrics registry"),
    );
    Harness {
        prefs,
        connectivity,
        launcher,
        log,
        engine,
    }
}

async fn drain_spawned_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn persisted_history_dedupes_caps_and_front_inserts() {
    let h = harness();

    h.engine.add_recent_program("food-bank").await;
    h.engine.add_recent_program("shelter").await;
    h.engine.add_recent_program("food-bank").await;
    assert_eq!(h.engine.recent_programs().await, vec!["food-bank", "shelter"]);

    for i in 0..30 {
        h.engine.add_recent_program(&format!("program-{i}")).await;
    }
    let programs = h.engine.recent_programs().await;
    assert_eq!(programs.len(), PERSISTED_HISTORY_CAP);
    assert_eq!(programs[0], "program-29");
    assert_eq!(
        h.prefs
            .stored_list(keys::RECENT_PROGRAMS)
            .expect("persisted list")
            .len(),
        PERSISTED_HISTORY_CAP
    );
}

#[tokio::test]
async fn session_history_is_capped_independently() {
    let h = harness();
    h.engine.start_incognito_session();

    for i in 0..30 {
        h.engine.add_search_query(&format!("query-{i}")).await;
    }
    let queries = h.engine.search_history().await;
    assert_eq!(queries.len(), SESSION_HISTORY_CAP);
    assert_eq!(queries[0], "query-29");
}

#[tokio::test]
async fn incognito_session_never_touches_persisted_lists() {
    let h = harness();
    h.prefs.seed_list(keys::RECENT_PROGRAMS, &["old-program"]);
    h.prefs.seed_list(keys::SEARCH_HISTORY, &["old query"]);

    h.engine.start_incognito_session();
    h.engine.add_recent_program("secret-program").await;
    h.engine.add_search_query("secret query").await;

    assert_eq!(
        h.engine.recent_programs().await,
        vec!["secret-program"],
        "reads during a session must come from the session list only"
    );
    assert_eq!(h.engine.search_history().await, vec!["secret query"]);
    assert_eq!(
        h.prefs.stored_list(keys::RECENT_PROGRAMS),
        Some(vec!["old-program".to_string()])
    );
    assert_eq!(
        h.prefs.stored_list(keys::SEARCH_HISTORY),
        Some(vec!["old query".to_string()])
    );
}

#[tokio::test]
async fn ending_a_session_discards_session_data_and_restores_persisted_reads() {
    let h = harness();
    h.prefs.seed_list(keys::RECENT_PROGRAMS, &["persisted-program"]);

    h.engine.start_incognito_session();
    h.engine.add_recent_program("session-program").await;
    h.engine.end_incognito_session();

    assert!(!h.engine.is_incognito_session());
    assert_eq!(
        h.engine.recent_programs().await,
        vec!["persisted-program"],
        "session entries must not leak past the session"
    );

    h.engine.start_incognito_session();
    assert!(
        h.engine.recent_programs().await.is_empty(),
        "a fresh session starts with no carryover"
    );
}

#[tokio::test]
async fn quick_exit_clears_data_even_when_navigation_fails() {
    let h = harness();
    h.launcher.set_openable(false);
    h.launcher.set_fail_open(true);

    h.engine.start_incognito_session();
    h.engine.add_recent_program("secret-program").await;
    h.engine.add_search_query("secret query").await;

    h.engine.execute_quick_exit().await;
    drain_spawned_tasks().await;

    h.engine.end_incognito_session();
    assert!(h.engine.recent_programs().await.is_empty());
    assert!(h.engine.search_history().await.is_empty());
    assert!(
        h.log.contains("launcher.open"),
        "navigation must still have been attempted"
    );
}

#[tokio::test]
async fn quick_exit_orders_clearing_before_navigation_and_concealment() {
    let h = harness();
    h.prefs.seed_bool(keys::INCOGNITO_MODE, true);
    h.prefs.seed_list(keys::RECENT_PROGRAMS, &["old-program"]);

    h.engine.execute_quick_exit().await;
    drain_spawned_tasks().await;

    let purge = h
        .log
        .position_of("prefs.remove recent_programs")
        .expect("persisted history must be purged");
    let conceal = h
        .log
        .position_of("concealer.conceal")
        .expect("the app must be concealed");
    let open = h
        .log
        .position_of("launcher.open")
        .expect("navigation must be attempted");
    assert!(
        purge < conceal,
        "data clearing must complete before the exit sequence ends"
    );
    assert!(purge < open, "data clearing must precede navigation");
    assert!(!h.prefs.contains_key(keys::RECENT_PROGRAMS));
}

#[tokio::test]
async fn quick_exit_preserves_persisted_history_outside_incognito() {
    let h = harness();
    h.prefs.seed_list(keys::RECENT_PROGRAMS, &["kept-program"]);

    h.engine.execute_quick_exit().await;
    drain_spawned_tasks().await;

    assert_eq!(
        h.prefs.stored_list(keys::RECENT_PROGRAMS),
        Some(vec!["kept-program".to_string()]),
        "persisted history is only purged when incognito applies"
    );
}

#[tokio::test]
async fn quick_exit_uses_stored_url_and_falls_back_to_catalog_default() {
    let h = harness();
    assert_eq!(h.engine.quick_exit_url().await, "https://www.google.com");

    h.engine.set_quick_exit_url("https://www.weather.gov").await;
    h.engine.execute_quick_exit().await;
    drain_spawned_tasks().await;

    assert!(h.log.contains("launcher.open https://www.weather.gov"));
}

#[tokio::test]
async fn quick_exit_url_is_persisted_verbatim() {
    let h = harness();
    // No validation is performed by design; this is a recorded review item.
    h.engine.set_quick_exit_url("javascript:alert(1)").await;
    assert_eq!(h.engine.quick_exit_url().await, "javascript:alert(1)");
}

#[tokio::test]
async fn enabling_incognito_mode_purges_persisted_history_immediately() {
    let h = harness();
    h.prefs.seed_list(keys::RECENT_PROGRAMS, &["old-program"]);
    h.prefs.seed_list(keys::SEARCH_HISTORY, &["old query"]);

    h.engine.set_incognito_mode_enabled(true).await;

    assert!(!h.prefs.contains_key(keys::RECENT_PROGRAMS));
    assert!(!h.prefs.contains_key(keys::SEARCH_HISTORY));
    assert!(h.engine.is_incognito_session());
    assert_eq!(h.prefs.stored_bool(keys::INCOGNITO_MODE), Some(true));

    h.engine.set_incognito_mode_enabled(false).await;
    assert!(!h.engine.is_incognito_session());
}

#[tokio::test]
async fn clear_all_history_purges_every_list() {
    let h = harness();
    h.prefs.seed_list(keys::RECENT_PROGRAMS, &["a"]);
    h.prefs.seed_list(keys::SEARCH_HISTORY, &["b"]);
    h.engine.start_incognito_session();
    h.engine.add_recent_program("c").await;

    h.engine.clear_all_history().await;

    assert!(h.engine.recent_programs().await.is_empty());
    assert!(!h.prefs.contains_key(keys::RECENT_PROGRAMS));
    assert!(!h.prefs.contains_key(keys::SEARCH_HISTORY));
}

#[tokio::test]
async fn storage_failures_fall_back_to_documented_defaults() {
    let h = harness();
    h.prefs.seed_bool(keys::QUICK_EXIT_ENABLED, true);
    h.prefs.seed_bool(keys::SHOW_SAFETY_TIPS, false);
    h.prefs.set_fail_reads(true);

    assert!(!h.engine.is_quick_exit_enabled().await);
    assert!(h.engine.should_show_safety_tips().await);
    assert!(h.engine.is_network_warnings_enabled().await);
    assert!(!h.engine.is_incognito_mode_enabled().await);
    assert_eq!(h.engine.quick_exit_url().await, "https://www.google.com");
    assert!(h.engine.recent_programs().await.is_empty());
}

#[tokio::test]
async fn storage_write_failures_are_absorbed() {
    let h = harness();
    h.prefs.set_fail_writes(true);

    h.engine.set_quick_exit_enabled(true).await;
    h.engine.set_show_safety_tips(false).await;
    h.engine.add_recent_program("program").await;

    assert_eq!(h.prefs.stored_bool(keys::QUICK_EXIT_ENABLED), None);
}

#[tokio::test]
async fn network_status_follows_the_classification_table() {
    let h = harness();

    assert_eq!(
        h.engine.network_privacy_status().await.level,
        PrivacyLevel::Caution
    );

    h.connectivity.set_reading(vec![Transport::Vpn]);
    let status = h.engine.network_privacy_status().await;
    assert_eq!(status.level, PrivacyLevel::Good);
    assert_eq!(status.connection_type, "VPN");

    h.connectivity.set_fail(true);
    let status = h.engine.network_privacy_status().await;
    assert_eq!(status.level, PrivacyLevel::Unknown);
    assert_eq!(status.connection_type, "Unknown");
}

#[tokio::test]
async fn network_watch_re_evaluates_on_change() {
    let h = harness();
    let mut stream = h.engine.watch_network_privacy();

    h.connectivity.set_reading(vec![Transport::Cellular]);
    let status = stream.next().await.expect("stream should yield");
    assert_eq!(status.level, PrivacyLevel::Moderate);
    assert_eq!(status.connection_type, "Mobile Data");

    h.connectivity.set_reading(vec![Transport::None]);
    let status = stream.next().await.expect("stream should yield");
    assert_eq!(status.level, PrivacyLevel::Offline);
}

#[tokio::test]
async fn unrecognised_disguise_icon_falls_back_to_catalog_first() {
    let h = harness();

    let result = h.engine.apply_disguised_icon("no-such-icon").await;
    assert!(result.success);
    assert!(result.requires_restart);
    assert_eq!(
        h.engine.current_disguised_icon().await.map(|icon| icon.id),
        Some("calculator")
    );
    assert!(h.engine.is_disguised_mode_enabled().await);
}

#[tokio::test]
async fn disguise_persistence_failure_reports_without_erroring() {
    let h = harness();
    h.prefs.set_fail_writes(true);

    let result = h.engine.apply_disguised_icon("weather").await;
    assert!(!result.success);
    assert!(!result.requires_restart);
    assert!(!result.message.is_empty());
}

#[tokio::test]
async fn reset_restores_the_default_icon() {
    let h = harness();
    let applied = h.engine.apply_disguised_icon("clock").await;
    assert!(applied.success);

    let reset = h.engine.reset_to_default_icon().await;
    assert!(reset.success);
    assert!(!h.engine.is_disguised_mode_enabled().await);
    assert_eq!(h.engine.current_disguised_icon().await, None);
}
