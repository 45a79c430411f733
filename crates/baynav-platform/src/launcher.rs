//! External URL launching seam.

use std::env;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Best-effort launcher that opens a URL in an external context.
///
/// `open` must not block on the external context actually rendering the URL;
/// implementations start the handoff and return.
#[async_trait]
pub trait UrlLauncher: Send + Sync {
    /// Whether the host has a handler for the URL. Advisory only.
    async fn can_open(&self, url: &str) -> bool;

    /// Hand the URL to the external context.
    async fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Opener command used on the current desktop platform.
const OPEN_COMMAND: &str = if cfg!(target_os = "macos") {
    "open"
} else {
    "xdg-open"
};

/// Desktop implementation that shells out to the platform opener.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopLauncher;

impl DesktopLauncher {
    /// Construct the launcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn opener_on_path() -> bool {
        env::var_os("PATH")
            .map(|path| {
                env::split_paths(&path).any(|dir| Path::new(&dir).join(OPEN_COMMAND).is_file())
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl UrlLauncher for DesktopLauncher {
    async fn can_open(&self, url: &str) -> bool {
        !url.trim().is_empty() && Self::opener_on_path()
    }

    async fn open(&self, url: &str) -> anyhow::Result<()> {
        // Spawn without waiting: the handoff is fire-and-forget.
        let child = Command::new(OPEN_COMMAND)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(%url, pid = child.id(), "handed url to platform opener");
        drop(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_urls_are_never_openable() {
        let launcher = DesktopLauncher::new();
        assert!(!launcher.can_open("").await);
        assert!(!launcher.can_open("   ").await);
    }
}
