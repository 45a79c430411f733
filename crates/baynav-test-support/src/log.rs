//! Ordered invocation recording shared between collaborator fakes.

use std::sync::{Arc, Mutex};

/// Append-only record of collaborator invocations, shared by every fake
/// wired into one engine so tests can assert cross-collaborator ordering.
#[derive(Debug, Clone, Default)]
pub struct InvocationLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl InvocationLog {
    /// Construct an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex has been poisoned.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .expect("invocation log mutex poisoned")
            .push(entry.into());
    }

    /// Copy of the recorded entries, in invocation order.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex has been poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("invocation log mutex poisoned")
            .clone()
    }

    /// Position of the first entry matching the predicate, if any.
    #[must_use]
    pub fn position_of(&self, needle: &str) -> Option<usize> {
        self.entries()
            .iter()
            .position(|entry| entry.starts_with(needle))
    }

    /// Whether any entry starts with the given prefix.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.position_of(needle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let log = InvocationLog::new();
        log.record("first");
        log.record("second");
        assert_eq!(log.entries(), vec!["first", "second"]);
        assert_eq!(log.position_of("second"), Some(1));
        assert!(log.contains("fir"));
        assert!(!log.contains("third"));
    }
}
