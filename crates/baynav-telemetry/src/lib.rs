//! Telemetry primitives shared across the Bay Navigator safety workspace.
//!
//! This crate centralises logging setup and the metrics registry so the
//! engine, facade, and diagnostic binary adopt a consistent observability
//! story.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

/// Default logging target when `RUST_LOG` is not provided.
const DEFAULT_LOG_LEVEL: &str = "info";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for
/// example, because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    BUILD_SHA
        .set(config.build_sha.to_string())
        .ok()
        .or(Some(()));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level));

    let install = |format: LogFormat| {
        let builder = fmt::fmt()
            .with_env_filter(env_filter.clone())
            .with_target(false)
            .with_thread_ids(false);

        match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        }
    };

    install(config.format).map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(())
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Build identifier recorded in structured logs.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable, pretty-printed logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(anyhow!("unknown log format '{other}'")),
        }
    }
}

/// Access the build SHA recorded during logging initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Prometheus-backed metrics registry for the safety subsystem.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    quick_exits_total: IntCounter,
    incognito_sessions_total: IntCounter,
    history_purges_total: IntCounter,
    pref_write_failures_total: IntCounter,
    network_status_changes_total: IntCounter,
    privacy_level: IntGauge,
}

/// Snapshot of the registry's counters and gauges for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Quick exits executed since start.
    pub quick_exits_total: u64,
    /// Incognito sessions started since start.
    pub incognito_sessions_total: u64,
    /// Persisted-history purges since start.
    pub history_purges_total: u64,
    /// Preference writes that failed and were absorbed.
    pub pref_write_failures_total: u64,
    /// Network status re-evaluations triggered by connectivity changes.
    pub network_status_changes_total: u64,
    /// Ordinal of the most recent privacy level (0 = good .. 4 = unknown).
    pub privacy_level: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let quick_exits_total = IntCounter::with_opts(Opts::new(
            "safety_quick_exits_total",
            "Quick exits executed",
        ))?;
        let incognito_sessions_total = IntCounter::with_opts(Opts::new(
            "safety_incognito_sessions_total",
            "Incognito sessions started",
        ))?;
        let history_purges_total = IntCounter::with_opts(Opts::new(
            "safety_history_purges_total",
            "Persisted history purges",
        ))?;
        let pref_write_failures_total = IntCounter::with_opts(Opts::new(
            "safety_pref_write_failures_total",
            "Preference writes that failed and were absorbed",
        ))?;
        let network_status_changes_total = IntCounter::with_opts(Opts::new(
            "safety_network_status_changes_total",
            "Network privacy status re-evaluations",
        ))?;
        let privacy_level = IntGauge::with_opts(Opts::new(
            "safety_privacy_level",
            "Ordinal of the current network privacy level (0 good .. 4 unknown)",
        ))?;

        registry.register(Box::new(quick_exits_total.clone()))?;
        registry.register(Box::new(incognito_sessions_total.clone()))?;
        registry.register(Box::new(history_purges_total.clone()))?;
        registry.register(Box::new(pref_write_failures_total.clone()))?;
        registry.register(Box::new(network_status_changes_total.clone()))?;
        registry.register(Box::new(privacy_level.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                quick_exits_total,
                incognito_sessions_total,
                history_purges_total,
                pref_write_failures_total,
                network_status_changes_total,
                privacy_level,
            }),
        })
    }

    /// Increment the executed quick-exit counter.
    pub fn inc_quick_exit(&self) {
        self.inner.quick_exits_total.inc();
    }

    /// Increment the started incognito session counter.
    pub fn inc_incognito_session(&self) {
        self.inner.incognito_sessions_total.inc();
    }

    /// Increment the persisted-history purge counter.
    pub fn inc_history_purge(&self) {
        self.inner.history_purges_total.inc();
    }

    /// Increment the absorbed preference write failure counter.
    pub fn inc_pref_write_failure(&self) {
        self.inner.pref_write_failures_total.inc();
    }

    /// Increment the network status re-evaluation counter.
    pub fn inc_network_status_change(&self) {
        self.inner.network_status_changes_total.inc();
    }

    /// Record the ordinal of the current privacy level.
    pub fn set_privacy_level(&self, ordinal: i64) {
        self.inner.privacy_level.set(ordinal);
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the registry.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            quick_exits_total: self.inner.quick_exits_total.get(),
            incognito_sessions_total: self.inner.incognito_sessions_total.get(),
            history_purges_total: self.inner.history_purges_total.get(),
            pref_write_failures_total: self.inner.pref_write_failures_total.get(),
            network_status_changes_total: self.inner.network_status_changes_total.get(),
            privacy_level: self.inner.privacy_level.get(),
        }
    }
}
