//! Fire-and-forget platform primitives: app concealment and haptics.

use async_trait::async_trait;
use tracing::debug;

/// Backgrounds or terminates the foreground application context.
///
/// Invoked as the last step of a quick exit; implementations must be
/// best-effort and must never fail the caller.
#[async_trait]
pub trait AppConcealer: Send + Sync {
    /// Move the app out of the foreground.
    async fn conceal(&self);
}

/// Concealer for hosts without a foreground concept; only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopConcealer;

impl NoopConcealer {
    /// Construct the concealer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AppConcealer for NoopConcealer {
    async fn conceal(&self) {
        debug!("conceal requested; host has no foreground context");
    }
}

/// Haptic feedback primitive. Fire-and-forget; the default is silent.
pub trait Haptics: Send + Sync {
    /// Emit a short confirmation tap.
    fn tap(&self) {}
}

/// Haptics for hosts without an actuator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl NoopHaptics {
    /// Construct the haptics stub.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Haptics for NoopHaptics {}
