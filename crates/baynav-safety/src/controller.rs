//! Lifecycle-sequenced facade over the engine for reactive UI.
//!
//! # Design
//! - UI subscribes to a watch channel of immutable [`SafetyViewState`]
//!   snapshots; every mutation publishes a fresh snapshot, including when
//!   the underlying durable write failed (the cache is optimistic and is
//!   not rolled back).
//! - Initialisation is idempotent and performs the load sequence once.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::info;

use baynav_platform::Haptics;

use crate::model::{DisguiseResult, DisguisedAppIcon, NetworkPrivacyStatus};
use crate::service::SafetyService;

/// Immutable snapshot of safety state rendered by the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyViewState {
    /// Whether the facade has completed its load sequence.
    pub initialized: bool,
    /// Mirror of the persisted quick-exit toggle.
    pub quick_exit_enabled: bool,
    /// Mirror of the persisted quick-exit destination.
    pub quick_exit_url: String,
    /// Mirror of the persisted incognito preference.
    pub incognito_mode_enabled: bool,
    /// Whether an incognito session is active right now.
    pub incognito_session_active: bool,
    /// Mirror of the persisted safety-tips toggle.
    pub show_safety_tips: bool,
    /// Mirror of the persisted network-warnings toggle.
    pub network_warnings_enabled: bool,
    /// Mirror of the persisted disguise toggle.
    pub disguised_mode_enabled: bool,
    /// Resolved disguise icon, when one is stored.
    pub disguised_icon: Option<DisguisedAppIcon>,
    /// Latest network privacy assessment.
    pub network: NetworkPrivacyStatus,
}

impl Default for SafetyViewState {
    fn default() -> Self {
        Self {
            initialized: false,
            quick_exit_enabled: false,
            quick_exit_url: crate::catalog::default_quick_exit_url().to_string(),
            incognito_mode_enabled: false,
            incognito_session_active: false,
            show_safety_tips: true,
            network_warnings_enabled: true,
            disguised_mode_enabled: false,
            disguised_icon: None,
            network: NetworkPrivacyStatus::unknown(),
        }
    }
}

struct Lifecycle {
    initialized: bool,
    network_task: Option<JoinHandle<()>>,
}

/// Notification-emitting wrapper around [`SafetyService`] for UI consumption.
pub struct SafetyController {
    engine: Arc<SafetyService>,
    haptics: Arc<dyn Haptics>,
    state: Arc<watch::Sender<SafetyViewState>>,
    lifecycle: Mutex<Lifecycle>,
}

impl SafetyController {
    /// Construct the facade. No IO happens until [`Self::initialize`].
    #[must_use]
    pub fn new(engine: Arc<SafetyService>, haptics: Arc<dyn Haptics>) -> Self {
        let (state, _) = watch::channel(SafetyViewState::default());
        Self {
            engine,
            haptics,
            state: Arc::new(state),
            lifecycle: Mutex::new(Lifecycle {
                initialized: false,
                network_task: None,
            }),
        }
    }

    /// Subscribe to state snapshots. The receiver immediately holds the
    /// current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SafetyViewState> {
        self.state.subscribe()
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn current(&self) -> SafetyViewState {
        self.state.borrow().clone()
    }

    /// Perform the one-time load sequence.
    ///
    /// Loads persisted settings into the snapshot, fetches the initial
    /// network status, starts the network-watch task, and auto-starts an
    /// incognito session when the persisted preference is on, so the
    /// session flag matches reality before any UI renders. Idempotent: a
    /// second call returns immediately. Exactly one snapshot is published,
    /// even when underlying reads failed and defaults were substituted.
    pub async fn initialize(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.initialized {
            return;
        }

        let settings = self.engine.settings().await;
        if settings.incognito_mode_enabled && !self.engine.is_incognito_session() {
            self.engine.start_incognito_session();
        }
        let network = self.engine.network_privacy_status().await;
        let disguised_icon = self.engine.current_disguised_icon().await;

        let mut stream = self.engine.watch_network_privacy();
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            while let Some(status) = stream.next().await {
                state.send_modify(|view| view.network = status.clone());
            }
        });

        self.state.send_replace(SafetyViewState {
            initialized: true,
            quick_exit_enabled: settings.quick_exit_enabled,
            quick_exit_url: settings.quick_exit_url,
            incognito_mode_enabled: settings.incognito_mode_enabled,
            incognito_session_active: self.engine.is_incognito_session(),
            show_safety_tips: settings.show_safety_tips,
            network_warnings_enabled: settings.network_warnings_enabled,
            disguised_mode_enabled: settings.disguised_mode_enabled,
            disguised_icon,
            network,
        });

        lifecycle.initialized = true;
        lifecycle.network_task = Some(task);
        info!("safety controller initialised");
    }

    /// Stop the network-watch task. Call once when the facade is dropped
    /// from the composition root; without it the subscription task leaks.
    pub async fn shutdown(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if let Some(task) = lifecycle.network_task.take() {
            task.abort();
        }
    }

    /// Toggle the quick-exit button.
    pub async fn set_quick_exit_enabled(&self, enabled: bool) {
        self.state
            .send_modify(|view| view.quick_exit_enabled = enabled);
        self.engine.set_quick_exit_enabled(enabled).await;
    }

    /// Change the quick-exit destination.
    pub async fn set_quick_exit_url(&self, url: &str) {
        self.state
            .send_modify(|view| view.quick_exit_url = url.to_string());
        self.engine.set_quick_exit_url(url).await;
    }

    /// Toggle the durable incognito preference.
    pub async fn set_incognito_mode_enabled(&self, enabled: bool) {
        self.state.send_modify(|view| {
            view.incognito_mode_enabled = enabled;
            view.incognito_session_active = enabled;
        });
        self.engine.set_incognito_mode_enabled(enabled).await;
    }

    /// Start a temporary incognito session without touching the preference.
    pub fn start_incognito_session(&self) {
        self.haptics.tap();
        self.state
            .send_modify(|view| view.incognito_session_active = true);
        self.engine.start_incognito_session();
    }

    /// End the incognito session without touching the preference.
    pub fn end_incognito_session(&self) {
        self.haptics.tap();
        self.state
            .send_modify(|view| view.incognito_session_active = false);
        self.engine.end_incognito_session();
    }

    /// Toggle safety tips.
    pub async fn set_show_safety_tips(&self, enabled: bool) {
        self.state
            .send_modify(|view| view.show_safety_tips = enabled);
        self.engine.set_show_safety_tips(enabled).await;
    }

    /// Toggle network privacy warnings.
    pub async fn set_network_warnings_enabled(&self, enabled: bool) {
        self.state
            .send_modify(|view| view.network_warnings_enabled = enabled);
        self.engine.set_network_warnings_enabled(enabled).await;
    }

    /// Execute the panic flow and refresh the snapshot afterwards.
    pub async fn execute_quick_exit(&self) {
        self.haptics.tap();
        self.engine.execute_quick_exit().await;
        // History lives in the engine; publish so history views refetch.
        self.state.send_modify(|_| {});
    }

    /// Purge all history and notify.
    pub async fn clear_all_history(&self) {
        self.engine.clear_all_history().await;
        self.state.send_modify(|_| {});
    }

    /// Apply a disguise icon, then mirror the engine's resulting state.
    pub async fn apply_disguised_icon(&self, icon_id: &str) -> DisguiseResult {
        let result = self.engine.apply_disguised_icon(icon_id).await;
        let disguised_icon = self.engine.current_disguised_icon().await;
        let enabled = self.engine.is_disguised_mode_enabled().await;
        self.state.send_modify(|view| {
            view.disguised_mode_enabled = enabled;
            view.disguised_icon = disguised_icon;
        });
        result
    }

    /// Restore the default icon, then mirror the engine's resulting state.
    pub async fn reset_to_default_icon(&self) -> DisguiseResult {
        let result = self.engine.reset_to_default_icon().await;
        let disguised_icon = self.engine.current_disguised_icon().await;
        let enabled = self.engine.is_disguised_mode_enabled().await;
        self.state.send_modify(|view| {
            view.disguised_mode_enabled = enabled;
            view.disguised_icon = disguised_icon;
        });
        result
    }

    /// Re-query the connectivity signal and publish the fresh status.
    pub async fn refresh_network_status(&self) {
        let network = self.engine.network_privacy_status().await;
        self.state.send_modify(|view| view.network = network.clone());
    }

    /// Engine reference for read paths the facade does not cache (history
    /// lists, tips, catalogs).
    #[must_use]
    pub fn engine(&self) -> &Arc<SafetyService> {
        &self.engine
    }
}
