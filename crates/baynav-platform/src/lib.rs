//! Platform capability seams consumed by the safety engine.
//!
//! Layout: `connectivity.rs` (transport model + `ConnectivityMonitor`),
//! `launcher.rs` (`UrlLauncher` + desktop implementation), `conceal.rs`
//! (`AppConcealer` / `Haptics` fire-and-forget primitives).

pub mod conceal;
pub mod connectivity;
pub mod launcher;

pub use conceal::{AppConcealer, Haptics, NoopConcealer, NoopHaptics};
pub use connectivity::{ConnectivityMonitor, FixedConnectivity, Transport};
pub use launcher::{DesktopLauncher, UrlLauncher};
