//! The `PreferenceStore` trait and its value model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Typed value held under a preference key.
///
/// The untagged representation keeps the backing JSON document human-readable
/// (`true`, `"https://..."`, `["a", "b"]`) while remaining unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    /// Boolean toggle.
    Bool(bool),
    /// Free-form string.
    Text(String),
    /// Ordered list of strings.
    List(Vec<String>),
}

/// Asynchronous key-value store for durable safety settings.
///
/// Every method may fail; callers treat failed reads as value-absent and
/// failed writes as best-effort. Implementations must never block the caller
/// beyond the single underlying IO operation.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a boolean value, `None` when the key is absent.
    async fn get_bool(&self, key: &str) -> anyhow::Result<Option<bool>>;

    /// Persist a boolean value.
    async fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()>;

    /// Read a string value, `None` when the key is absent.
    async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Persist a string value.
    async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Read an ordered string list, `None` when the key is absent.
    async fn get_string_list(&self, key: &str) -> anyhow::Result<Option<Vec<String>>>;

    /// Persist an ordered string list.
    async fn set_string_list(&self, key: &str, value: &[String]) -> anyhow::Result<()>;

    /// Remove a key; removing an absent key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
