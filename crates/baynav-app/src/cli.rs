//! Command-line surface for the safety diagnostic tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use baynav_platform::Transport;

/// Bay Navigator safety state diagnostics.
#[derive(Debug, Parser)]
#[command(name = "baynav", version, about = "Inspect and drive the Bay Navigator safety state")]
pub struct Cli {
    /// Path of the JSON preference document.
    #[arg(long, env = "BAYNAV_PREFS", default_value = "baynav-prefs.json")]
    pub prefs: PathBuf,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format (`json` or `pretty`); inferred from the build
    /// profile when omitted.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Transport reported by the injected connectivity signal.
    #[arg(long, value_enum, default_value = "wifi")]
    pub transport: TransportArg,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Transport selection for the injected connectivity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    /// Local wireless network.
    Wifi,
    /// Carrier mobile data.
    Cellular,
    /// Tunnelled transport.
    Vpn,
    /// Wired network.
    Ethernet,
    /// No transport available.
    Offline,
}

impl TransportArg {
    /// Connectivity reading represented by this selection.
    #[must_use]
    pub fn to_reading(self) -> Vec<Transport> {
        match self {
            Self::Wifi => vec![Transport::Wifi],
            Self::Cellular => vec![Transport::Cellular],
            Self::Vpn => vec![Transport::Vpn],
            Self::Ethernet => vec![Transport::Ethernet],
            Self::Offline => vec![Transport::None],
        }
    }
}

/// Diagnostic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Render the current safety view state as JSON.
    Status,
    /// Execute the panic flow against the desktop launcher.
    QuickExit,
    /// List recent programs and search queries.
    History,
    /// Purge persisted and session history.
    ClearHistory,
    /// Render telemetry counters in Prometheus text format.
    Metrics,
}
