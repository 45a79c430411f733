//! Scriptable fakes for the engine's collaborator seams.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::broadcast;

use baynav_platform::{AppConcealer, ConnectivityMonitor, Transport, UrlLauncher};
use baynav_prefs::{PrefValue, PreferenceStore};

use crate::log::InvocationLog;

/// In-memory preference store with failure injection and call recording.
#[derive(Debug, Default)]
pub struct ScriptedPrefs {
    values: Mutex<HashMap<String, PrefValue>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    log: InvocationLog,
}

impl ScriptedPrefs {
    /// Construct an empty store with its own log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty store recording into a shared log.
    #[must_use]
    pub fn with_log(log: InvocationLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Make every read fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write (and removal) fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a boolean without recording an invocation.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    pub fn seed_bool(&self, key: &str, value: bool) {
        self.seed(key, PrefValue::Bool(value));
    }

    /// Seed a string without recording an invocation.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    pub fn seed_string(&self, key: &str, value: &str) {
        self.seed(key, PrefValue::Text(value.to_string()));
    }

    /// Seed a string list without recording an invocation.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    pub fn seed_list(&self, key: &str, values: &[&str]) {
        self.seed(
            key,
            PrefValue::List(values.iter().map(ToString::to_string).collect()),
        );
    }

    /// Inspect a stored list directly, bypassing failure injection.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    #[must_use]
    pub fn stored_list(&self, key: &str) -> Option<Vec<String>> {
        match self.values.lock().expect("prefs mutex poisoned").get(key) {
            Some(PrefValue::List(values)) => Some(values.clone()),
            _ => None,
        }
    }

    /// Inspect a stored boolean directly, bypassing failure injection.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    #[must_use]
    pub fn stored_bool(&self, key: &str) -> Option<bool> {
        match self.values.lock().expect("prefs mutex poisoned").get(key) {
            Some(PrefValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Whether any value is stored under the key.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values
            .lock()
            .expect("prefs mutex poisoned")
            .contains_key(key)
    }

    /// The invocation log this store records into.
    #[must_use]
    pub fn log(&self) -> &InvocationLog {
        &self.log
    }

    fn seed(&self, key: &str, value: PrefValue) {
        self.values
            .lock()
            .expect("prefs mutex poisoned")
            .insert(key.to_string(), value);
    }

    fn read(&self, operation: &str, key: &str) -> anyhow::Result<Option<PrefValue>> {
        self.log.record(format!("{operation} {key}"));
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("scripted read failure for '{key}'");
        }
        Ok(self
            .values
            .lock()
            .expect("prefs mutex poisoned")
            .get(key)
            .cloned())
    }

    fn write(&self, operation: &str, key: &str, value: PrefValue) -> anyhow::Result<()> {
        self.log.record(format!("{operation} {key}"));
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("scripted write failure for '{key}'");
        }
        self.seed(key, value);
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for ScriptedPrefs {
    async fn get_bool(&self, key: &str) -> anyhow::Result<Option<bool>> {
        Ok(match self.read("prefs.get_bool", key)? {
            Some(PrefValue::Bool(value)) => Some(value),
            _ => None,
        })
    }

    async fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()> {
        self.write("prefs.set_bool", key, PrefValue::Bool(value))
    }

    async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(match self.read("prefs.get_string", key)? {
            Some(PrefValue::Text(value)) => Some(value),
            _ => None,
        })
    }

    async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.write("prefs.set_string", key, PrefValue::Text(value.to_string()))
    }

    async fn get_string_list(&self, key: &str) -> anyhow::Result<Option<Vec<String>>> {
        Ok(match self.read("prefs.get_string_list", key)? {
            Some(PrefValue::List(value)) => Some(value),
            _ => None,
        })
    }

    async fn set_string_list(&self, key: &str, value: &[String]) -> anyhow::Result<()> {
        self.write("prefs.set_string_list", key, PrefValue::List(value.to_vec()))
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.log.record(format!("prefs.remove {key}"));
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("scripted removal failure for '{key}'");
        }
        self.values
            .lock()
            .expect("prefs mutex poisoned")
            .remove(key);
        Ok(())
    }
}

/// Programmable connectivity signal with failure injection.
#[derive(Debug)]
pub struct ScriptedConnectivity {
    reading: Mutex<Vec<Transport>>,
    fail: AtomicBool,
    changes: broadcast::Sender<Vec<Transport>>,
}

impl ScriptedConnectivity {
    /// Construct with an initial reading.
    #[must_use]
    pub fn new(reading: Vec<Transport>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            reading: Mutex::new(reading),
            fail: AtomicBool::new(false),
            changes,
        }
    }

    /// Replace the reading and push a change notification.
    ///
    /// # Panics
    ///
    /// Panics if the reading mutex has been poisoned.
    pub fn set_reading(&self, reading: Vec<Transport>) {
        *self.reading.lock().expect("connectivity mutex poisoned") = reading.clone();
        let _ = self.changes.send(reading);
    }

    /// Make `current` queries fail until reset.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectivityMonitor for ScriptedConnectivity {
    async fn current(&self) -> anyhow::Result<Vec<Transport>> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("scripted connectivity failure");
        }
        Ok(self
            .reading
            .lock()
            .expect("connectivity mutex poisoned")
            .clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<Transport>> {
        self.changes.subscribe()
    }
}

/// URL launcher that records invocations and can be forced to fail.
#[derive(Debug)]
pub struct RecordingLauncher {
    openable: AtomicBool,
    fail_open: AtomicBool,
    log: InvocationLog,
}

impl RecordingLauncher {
    /// Construct a launcher recording into the shared log.
    #[must_use]
    pub fn new(log: InvocationLog) -> Self {
        Self {
            openable: AtomicBool::new(true),
            fail_open: AtomicBool::new(false),
            log,
        }
    }

    /// Control what `can_open` reports.
    pub fn set_openable(&self, openable: bool) {
        self.openable.store(openable, Ordering::SeqCst);
    }

    /// Make `open` fail until reset.
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UrlLauncher for RecordingLauncher {
    async fn can_open(&self, url: &str) -> bool {
        self.log.record(format!("launcher.can_open {url}"));
        self.openable.load(Ordering::SeqCst)
    }

    async fn open(&self, url: &str) -> anyhow::Result<()> {
        self.log.record(format!("launcher.open {url}"));
        if self.fail_open.load(Ordering::SeqCst) {
            bail!("scripted launch failure for '{url}'");
        }
        Ok(())
    }
}

/// Concealer that records its single fire-and-forget invocation.
#[derive(Debug)]
pub struct RecordingConcealer {
    log: InvocationLog,
}

impl RecordingConcealer {
    /// Construct a concealer recording into the shared log.
    #[must_use]
    pub fn new(log: InvocationLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl AppConcealer for RecordingConcealer {
    async fn conceal(&self) {
        self.log.record("concealer.conceal");
    }
}
