//! The safety engine: single source of truth for persisted safety settings
//! and transient session state.
//!
//! # Design
//! - All collaborators are injected; the engine owns no globals.
//! - No public operation surfaces a storage or connectivity error: reads
//!   fall back to documented defaults, writes are best-effort and logged.
//! - Session state sits behind a synchronous mutex that is never held
//!   across an await point.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use baynav_events::{EventBus, HistoryScope, SafetyEvent};
use baynav_platform::{AppConcealer, ConnectivityMonitor, Transport, UrlLauncher};
use baynav_prefs::{PreferenceStore, keys};
use baynav_telemetry::Metrics;

use crate::catalog;
use crate::classify::classify_transports;
use crate::history::{HistoryList, PERSISTED_HISTORY_CAP, SESSION_HISTORY_CAP};
use crate::model::{DisguiseResult, DisguisedAppIcon, NetworkPrivacyStatus, SafetySettings};

/// Transient per-process session state.
struct SessionState {
    incognito: bool,
    session_id: Option<Uuid>,
    recent_programs: HistoryList,
    search_queries: HistoryList,
}

impl SessionState {
    fn new() -> Self {
        Self {
            incognito: false,
            session_id: None,
            recent_programs: HistoryList::new(SESSION_HISTORY_CAP),
            search_queries: HistoryList::new(SESSION_HISTORY_CAP),
        }
    }

    fn clear_lists(&mut self) {
        self.recent_programs.clear();
        self.search_queries.clear();
    }
}

/// Safety state engine. All safety mutations pass through here.
pub struct SafetyService {
    prefs: Arc<dyn PreferenceStore>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    launcher: Arc<dyn UrlLauncher>,
    concealer: Arc<dyn AppConcealer>,
    events: EventBus,
    metrics: Metrics,
    session: Mutex<SessionState>,
}

impl SafetyService {
    /// Construct the engine from its collaborators.
    #[must_use]
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        launcher: Arc<dyn UrlLauncher>,
        concealer: Arc<dyn AppConcealer>,
        events: EventBus,
        metrics: Metrics,
    ) -> Self {
        Self {
            prefs,
            connectivity,
            launcher,
            concealer,
            events,
            metrics,
            session: Mutex::new(SessionState::new()),
        }
    }

    /// Event bus the engine publishes on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ---- quick exit ------------------------------------------------------

    /// Whether the quick-exit button is enabled. Defaults to false.
    pub async fn is_quick_exit_enabled(&self) -> bool {
        self.read_bool(keys::QUICK_EXIT_ENABLED, false).await
    }

    /// Persist the quick-exit toggle.
    pub async fn set_quick_exit_enabled(&self, enabled: bool) {
        self.write_bool(keys::QUICK_EXIT_ENABLED, enabled).await;
        self.publish_setting_changed(keys::QUICK_EXIT_ENABLED);
    }

    /// The quick-exit destination. Never empty: falls back to the first
    /// catalog destination when unset.
    pub async fn quick_exit_url(&self) -> String {
        self.read_string(keys::QUICK_EXIT_URL)
            .await
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| catalog::default_quick_exit_url().to_string())
    }

    /// Persist the quick-exit destination verbatim. No validation is
    /// performed; the settings UI is responsible for sane input.
    pub async fn set_quick_exit_url(&self, url: &str) {
        self.write_string(keys::QUICK_EXIT_URL, url).await;
        self.publish_setting_changed(keys::QUICK_EXIT_URL);
    }

    /// Execute the panic flow: clear sensitive data, then leave.
    ///
    /// Ordering is the central safety contract: session data is cleared
    /// (and persisted history purged when incognito applies) strictly
    /// before navigation is attempted, and the concealment step is not
    /// gated on the navigation outcome. A failed browser launch must never
    /// leave old history behind.
    #[instrument(skip(self))]
    pub async fn execute_quick_exit(&self) {
        let destination = self.quick_exit_url().await;

        let in_session = {
            let mut session = self.session.lock().expect("session mutex poisoned");
            session.clear_lists();
            session.incognito
        };
        if in_session || self.is_incognito_mode_enabled().await {
            self.purge_persisted_history().await;
        }

        // Fire-and-forget: the launch is initiated here but its outcome is
        // never awaited before concealment.
        let launcher = Arc::clone(&self.launcher);
        let target = destination.clone();
        tokio::spawn(async move {
            if !launcher.can_open(&target).await {
                warn!(url = %target, "no handler reported for quick-exit destination");
            }
            if let Err(err) = launcher.open(&target).await {
                warn!(url = %target, error = ?err, "quick-exit navigation failed");
            }
        });

        self.concealer.conceal().await;
        self.metrics.inc_quick_exit();
        self.events
            .publish(SafetyEvent::QuickExitExecuted { destination });
        info!("quick exit executed");
    }

    // ---- incognito -------------------------------------------------------

    /// Whether the durable incognito preference is on. Defaults to false.
    pub async fn is_incognito_mode_enabled(&self) -> bool {
        self.read_bool(keys::INCOGNITO_MODE, false).await
    }

    /// Persist the incognito preference.
    ///
    /// Enabling purges persisted history as part of the same operation and
    /// starts a session, so the persisted lists are never stale while the
    /// setting claims incognito. Disabling ends the active session.
    #[instrument(skip(self))]
    pub async fn set_incognito_mode_enabled(&self, enabled: bool) {
        self.write_bool(keys::INCOGNITO_MODE, enabled).await;
        if enabled {
            self.purge_persisted_history().await;
            self.start_incognito_session();
        } else {
            self.end_incognito_session();
        }
        self.publish_setting_changed(keys::INCOGNITO_MODE);
    }

    /// Whether an incognito session is active right now.
    ///
    /// # Panics
    ///
    /// Panics if the session mutex has been poisoned.
    #[must_use]
    pub fn is_incognito_session(&self) -> bool {
        self.session.lock().expect("session mutex poisoned").incognito
    }

    /// Begin a fresh incognito session with empty session lists.
    ///
    /// # Panics
    ///
    /// Panics if the session mutex has been poisoned.
    pub fn start_incognito_session(&self) {
        let session_id = Uuid::new_v4();
        {
            let mut session = self.session.lock().expect("session mutex poisoned");
            session.incognito = true;
            session.session_id = Some(session_id);
            session.clear_lists();
        }
        self.metrics.inc_incognito_session();
        self.events.publish(SafetyEvent::IncognitoSessionStarted);
        info!(session_id = %session_id, "incognito session started");
    }

    /// End the incognito session, dropping its in-memory lists so nothing
    /// carries over into non-incognito behaviour.
    ///
    /// # Panics
    ///
    /// Panics if the session mutex has been poisoned.
    pub fn end_incognito_session(&self) {
        let ended = {
            let mut session = self.session.lock().expect("session mutex poisoned");
            let ended = session.session_id.take();
            session.incognito = false;
            session.clear_lists();
            ended
        };
        if let Some(session_id) = ended {
            self.events.publish(SafetyEvent::IncognitoSessionEnded);
            info!(session_id = %session_id, "incognito session ended");
        }
    }

    // ---- history ---------------------------------------------------------

    /// Record a viewed program, in the session list during an incognito
    /// session and the persisted list otherwise.
    pub async fn add_recent_program(&self, program_id: &str) {
        let recorded_in_session = {
            let mut session = self.session.lock().expect("session mutex poisoned");
            if session.incognito {
                session.recent_programs.record(program_id);
                true
            } else {
                false
            }
        };
        if !recorded_in_session {
            self.record_persisted(keys::RECENT_PROGRAMS, program_id).await;
        }
    }

    /// Record a search query, routed the same way as programs.
    pub async fn add_search_query(&self, query: &str) {
        let recorded_in_session = {
            let mut session = self.session.lock().expect("session mutex poisoned");
            if session.incognito {
                session.search_queries.record(query);
                true
            } else {
                false
            }
        };
        if !recorded_in_session {
            self.record_persisted(keys::SEARCH_HISTORY, query).await;
        }
    }

    /// Copy of the relevant recent-program list, most recent first.
    pub async fn recent_programs(&self) -> Vec<String> {
        {
            let session = self.session.lock().expect("session mutex poisoned");
            if session.incognito {
                return session.recent_programs.entries();
            }
        }
        self.read_persisted_list(keys::RECENT_PROGRAMS).await
    }

    /// Copy of the relevant search-history list, most recent first.
    pub async fn search_history(&self) -> Vec<String> {
        {
            let session = self.session.lock().expect("session mutex poisoned");
            if session.incognito {
                return session.search_queries.entries();
            }
        }
        self.read_persisted_list(keys::SEARCH_HISTORY).await
    }

    /// Purge both persisted lists and both session lists unconditionally.
    pub async fn clear_all_history(&self) {
        {
            let mut session = self.session.lock().expect("session mutex poisoned");
            session.clear_lists();
        }
        self.remove_key(keys::RECENT_PROGRAMS).await;
        self.remove_key(keys::SEARCH_HISTORY).await;
        self.metrics.inc_history_purge();
        self.events.publish(SafetyEvent::HistoryCleared {
            scope: HistoryScope::All,
        });
        info!("all history cleared");
    }

    // ---- safety tips and warnings ---------------------------------------

    /// Whether safety tips are shown. Defaults to true.
    pub async fn should_show_safety_tips(&self) -> bool {
        self.read_bool(keys::SHOW_SAFETY_TIPS, true).await
    }

    /// Persist the safety-tips toggle.
    pub async fn set_show_safety_tips(&self, enabled: bool) {
        self.write_bool(keys::SHOW_SAFETY_TIPS, enabled).await;
        self.publish_setting_changed(keys::SHOW_SAFETY_TIPS);
    }

    /// Whether network privacy warnings are shown. Defaults to true.
    pub async fn is_network_warnings_enabled(&self) -> bool {
        self.read_bool(keys::NETWORK_WARNINGS, true).await
    }

    /// Persist the network-warnings toggle.
    pub async fn set_network_warnings_enabled(&self, enabled: bool) {
        self.write_bool(keys::NETWORK_WARNINGS, enabled).await;
        self.publish_setting_changed(keys::NETWORK_WARNINGS);
    }

    // ---- network privacy -------------------------------------------------

    /// Classify the current connectivity reading. A failed query yields the
    /// unknown status, never an error.
    pub async fn network_privacy_status(&self) -> NetworkPrivacyStatus {
        let status = match self.connectivity.current().await {
            Ok(reading) => classify_transports(&reading),
            Err(err) => {
                warn!(error = ?err, "connectivity query failed");
                NetworkPrivacyStatus::unknown()
            }
        };
        self.metrics.set_privacy_level(status.level.ordinal());
        status
    }

    /// Stream that re-evaluates the privacy status on every connectivity
    /// change notification.
    #[must_use]
    pub fn watch_network_privacy(&self) -> NetworkPrivacyStream {
        NetworkPrivacyStream {
            receiver: self.connectivity.subscribe(),
            events: self.events.clone(),
            metrics: self.metrics.clone(),
        }
    }

    // ---- disguised mode --------------------------------------------------

    /// Whether the disguised app identity is active. Defaults to false.
    pub async fn is_disguised_mode_enabled(&self) -> bool {
        self.read_bool(keys::DISGUISED_MODE, false).await
    }

    /// Persist the disguise toggle without changing the stored icon.
    pub async fn set_disguised_mode_enabled(&self, enabled: bool) {
        self.write_bool(keys::DISGUISED_MODE, enabled).await;
        self.publish_setting_changed(keys::DISGUISED_MODE);
    }

    /// Stored disguise icon id, if any.
    pub async fn disguised_icon_id(&self) -> Option<String> {
        self.read_string(keys::DISGUISED_ICON).await
    }

    /// Persist a disguise icon id without toggling the disguise flag.
    pub async fn set_disguised_icon(&self, icon_id: &str) {
        self.write_string(keys::DISGUISED_ICON, icon_id).await;
        self.events.publish(SafetyEvent::DisguiseChanged {
            icon_id: Some(icon_id.to_string()),
        });
    }

    /// Resolve the stored icon id against the catalog. An unrecognised id
    /// falls back to the catalog's first entry; absent means none chosen.
    pub async fn current_disguised_icon(&self) -> Option<DisguisedAppIcon> {
        let icon_id = self.disguised_icon_id().await?;
        Some(
            catalog::icon_by_id(&icon_id)
                .copied()
                .unwrap_or(catalog::DISGUISED_ICONS[0]),
        )
    }

    /// Persist an icon selection and enable the disguise flag.
    ///
    /// The OS-level icon swap is delegated to the platform integration
    /// layer; the result carries advisory text for the settings UI. A
    /// persistence failure yields `success: false`, never an error.
    pub async fn apply_disguised_icon(&self, icon_id: &str) -> DisguiseResult {
        let icon = catalog::icon_by_id(icon_id)
            .copied()
            .unwrap_or(catalog::DISGUISED_ICONS[0]);

        if let Err(err) = self.prefs.set_string(keys::DISGUISED_ICON, icon.id).await {
            warn!(icon_id = icon.id, error = ?err, "failed to persist disguise icon");
            self.metrics.inc_pref_write_failure();
            return DisguiseResult::failed("Could not save the disguised icon.");
        }
        if let Err(err) = self.prefs.set_bool(keys::DISGUISED_MODE, true).await {
            warn!(icon_id = icon.id, error = ?err, "failed to enable disguised mode");
            self.metrics.inc_pref_write_failure();
            return DisguiseResult::failed("Could not enable disguised mode.");
        }

        self.events.publish(SafetyEvent::DisguiseChanged {
            icon_id: Some(icon.id.to_string()),
        });
        debug!(icon_id = icon.id, "disguise icon applied");
        DisguiseResult::applied(format!(
            "App icon set to {}. The change may not be visible until the app is reopened.",
            icon.name
        ))
    }

    /// Disable the disguise flag and clear the stored icon id.
    pub async fn reset_to_default_icon(&self) -> DisguiseResult {
        if let Err(err) = self.prefs.set_bool(keys::DISGUISED_MODE, false).await {
            warn!(error = ?err, "failed to disable disguised mode");
            self.metrics.inc_pref_write_failure();
            return DisguiseResult::failed("Could not disable disguised mode.");
        }
        if let Err(err) = self.prefs.remove(keys::DISGUISED_ICON).await {
            warn!(error = ?err, "failed to clear disguise icon");
            self.metrics.inc_pref_write_failure();
            return DisguiseResult::failed("Could not clear the disguised icon.");
        }

        self.events
            .publish(SafetyEvent::DisguiseChanged { icon_id: None });
        DisguiseResult::applied("Default app icon restored.".to_string())
    }

    // ---- snapshots -------------------------------------------------------

    /// Load every persisted setting, substituting defaults for failed reads.
    pub async fn settings(&self) -> SafetySettings {
        SafetySettings {
            quick_exit_enabled: self.is_quick_exit_enabled().await,
            quick_exit_url: self.quick_exit_url().await,
            incognito_mode_enabled: self.is_incognito_mode_enabled().await,
            show_safety_tips: self.should_show_safety_tips().await,
            network_warnings_enabled: self.is_network_warnings_enabled().await,
            disguised_mode_enabled: self.is_disguised_mode_enabled().await,
            disguised_icon_id: self.disguised_icon_id().await,
        }
    }

    // ---- internals -------------------------------------------------------

    async fn record_persisted(&self, key: &'static str, value: &str) {
        let stored = self.read_persisted_list(key).await;
        let mut list = HistoryList::from_entries(PERSISTED_HISTORY_CAP, stored);
        list.record(value);
        self.write_list(key, &list.entries()).await;
    }

    async fn read_persisted_list(&self, key: &'static str) -> Vec<String> {
        match self.prefs.get_string_list(key).await {
            Ok(Some(entries)) => {
                HistoryList::from_entries(PERSISTED_HISTORY_CAP, entries).entries()
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key, error = ?err, "preference read failed; treating as absent");
                Vec::new()
            }
        }
    }

    async fn purge_persisted_history(&self) {
        self.remove_key(keys::RECENT_PROGRAMS).await;
        self.remove_key(keys::SEARCH_HISTORY).await;
        self.metrics.inc_history_purge();
        self.events.publish(SafetyEvent::HistoryCleared {
            scope: HistoryScope::Persisted,
        });
    }

    async fn read_bool(&self, key: &'static str, default: bool) -> bool {
        match self.prefs.get_bool(key).await {
            Ok(value) => value.unwrap_or(default),
            Err(err) => {
                warn!(key, error = ?err, "preference read failed; using default");
                default
            }
        }
    }

    async fn read_string(&self, key: &'static str) -> Option<String> {
        match self.prefs.get_string(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = ?err, "preference read failed; treating as absent");
                None
            }
        }
    }

    async fn write_bool(&self, key: &'static str, value: bool) {
        if let Err(err) = self.prefs.set_bool(key, value).await {
            warn!(key, error = ?err, "preference write failed; continuing");
            self.metrics.inc_pref_write_failure();
        }
    }

    async fn write_string(&self, key: &'static str, value: &str) {
        if let Err(err) = self.prefs.set_string(key, value).await {
            warn!(key, error = ?err, "preference write failed; continuing");
            self.metrics.inc_pref_write_failure();
        }
    }

    async fn write_list(&self, key: &'static str, entries: &[String]) {
        if let Err(err) = self.prefs.set_string_list(key, entries).await {
            warn!(key, error = ?err, "preference write failed; continuing");
            self.metrics.inc_pref_write_failure();
        }
    }

    async fn remove_key(&self, key: &'static str) {
        if let Err(err) = self.prefs.remove(key).await {
            warn!(key, error = ?err, "preference removal failed; continuing");
            self.metrics.inc_pref_write_failure();
        }
    }

    fn publish_setting_changed(&self, key: &'static str) {
        self.events.publish(SafetyEvent::SettingsChanged {
            setting: key.to_string(),
        });
    }
}

/// Stream of privacy statuses, re-evaluated on connectivity changes.
pub struct NetworkPrivacyStream {
    receiver: broadcast::Receiver<Vec<Transport>>,
    events: EventBus,
    metrics: Metrics,
}

impl NetworkPrivacyStream {
    /// Receive the next status, skipping over lagged notifications.
    pub async fn next(&mut self) -> Option<NetworkPrivacyStatus> {
        loop {
            match self.receiver.recv().await {
                Ok(reading) => {
                    let status = classify_transports(&reading);
                    self.metrics.inc_network_status_change();
                    self.metrics.set_privacy_level(status.level.ordinal());
                    self.events.publish(SafetyEvent::NetworkStatusChanged {
                        level: status.level,
                        connection_type: status.connection_type.clone(),
                    });
                    return Some(status);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "connectivity notifications lagged; catching up");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
