//! Network transport model and the connectivity seam.

use std::str::FromStr;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the change-notification channel for connectivity readings.
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Active network transport reported by the host.
///
/// A reading is a set of transports; hosts with several interfaces up report
/// all of them. `None` is an explicit "no transport" report, distinct from an
/// empty or unrecognised reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Local wireless network.
    Wifi,
    /// Carrier mobile data.
    Cellular,
    /// Tunnelled transport.
    Vpn,
    /// Wired network.
    Ethernet,
    /// Bluetooth tethering.
    Bluetooth,
    /// Explicit no-transport report.
    None,
}

impl Transport {
    /// Render the transport as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::Cellular => "cellular",
            Self::Vpn => "vpn",
            Self::Ethernet => "ethernet",
            Self::Bluetooth => "bluetooth",
            Self::None => "none",
        }
    }
}

impl FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wifi" => Ok(Self::Wifi),
            "cellular" | "mobile" => Ok(Self::Cellular),
            "vpn" => Ok(Self::Vpn),
            "ethernet" => Ok(Self::Ethernet),
            "bluetooth" => Ok(Self::Bluetooth),
            "none" => Ok(Self::None),
            other => Err(anyhow!("unknown transport '{other}'")),
        }
    }
}

/// Source of network transport readings and change notifications.
#[async_trait]
pub trait ConnectivityMonitor: Send + Sync {
    /// Query the current reading; may fail when the host cannot report.
    async fn current(&self) -> anyhow::Result<Vec<Transport>>;

    /// Subscribe to change notifications carrying the new reading.
    fn subscribe(&self) -> broadcast::Receiver<Vec<Transport>>;
}

/// Connectivity signal with an externally driven reading.
///
/// Hosts without native transport detection (the desktop diagnostic binary,
/// tests) construct one with a known reading and push updates explicitly.
#[derive(Debug)]
pub struct FixedConnectivity {
    reading: Mutex<Vec<Transport>>,
    changes: broadcast::Sender<Vec<Transport>>,
}

impl FixedConnectivity {
    /// Construct with an initial reading.
    #[must_use]
    pub fn new(reading: Vec<Transport>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            reading: Mutex::new(reading),
            changes,
        }
    }

    /// Replace the reading and notify subscribers.
    ///
    /// # Panics
    ///
    /// Panics if the reading mutex has been poisoned.
    pub fn set_reading(&self, reading: Vec<Transport>) {
        *self.reading.lock().expect("connectivity mutex poisoned") = reading.clone();
        let _ = self.changes.send(reading);
    }
}

impl Default for FixedConnectivity {
    fn default() -> Self {
        Self::new(vec![Transport::Wifi])
    }
}

#[async_trait]
impl ConnectivityMonitor for FixedConnectivity {
    async fn current(&self) -> anyhow::Result<Vec<Transport>> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_parse_round_trips() {
        for transport in [
            Transport::Wifi,
            Transport::Cellular,
            Transport::Vpn,
            Transport::Ethernet,
            Transport::Bluetooth,
            Transport::None,
        ] {
            assert_eq!(transport.as_str().parse::<Transport>().unwrap(), transport);
        }
        assert_eq!("Mobile".parse::<Transport>().unwrap(), Transport::Cellular);
        assert!("carrier-pigeon".parse::<Transport>().is_err());
    }

    #[tokio::test]
    async fn fixed_connectivity_reports_and_notifies() -> anyhow::Result<()> {
        let monitor = FixedConnectivity::new(vec![Transport::Wifi]);
        assert_eq!(monitor.current().await?, vec![Transport::Wifi]);

        let mut changes = monitor.subscribe();
        monitor.set_reading(vec![Transport::Vpn]);

        assert_eq!(monitor.current().await?, vec![Transport::Vpn]);
        assert_eq!(changes.recv().await?, vec![Transport::Vpn]);
        Ok(())
    }
}
