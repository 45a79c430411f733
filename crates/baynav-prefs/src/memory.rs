//! In-memory preference store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::PrefsError;
use crate::store::{PrefValue, PreferenceStore};

/// Volatile store used by hosts without durable storage and by examples.
///
/// Values live only as long as the process; the safety engine treats that the
/// same way it treats a store whose reads fail: documented defaults apply.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, PrefValue>>,
}

impl MemoryPrefs {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, replacing any existing entry under the key.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    pub fn insert(&self, key: &str, value: PrefValue) {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .insert(key.to_string(), value);
    }

    /// Snapshot the current contents, primarily for diagnostics.
    ///
    /// # Panics
    ///
    /// Panics if the value mutex has been poisoned.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, PrefValue> {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .clone()
    }

    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: PrefValue) {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .insert(key.to_string(), value);
    }
}

#[async_trait]
impl PreferenceStore for MemoryPrefs {
    async fn get_bool(&self, key: &str) -> anyhow::Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(PrefValue::Bool(value)) => Ok(Some(value)),
            Some(_) => Err(PrefsError::WrongType {
                key: key.to_string(),
                expected: "bool",
            }
            .into()),
        }
    }

    async fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()> {
        self.put(key, PrefValue::Bool(value));
        Ok(())
    }

    async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(PrefValue::Text(value)) => Ok(Some(value)),
            Some(_) => Err(PrefsError::WrongType {
                key: key.to_string(),
                expected: "string",
            }
            .into()),
        }
    }

    async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.put(key, PrefValue::Text(value.to_string()));
        Ok(())
    }

    async fn get_string_list(&self, key: &str) -> anyhow::Result<Option<Vec<String>>> {
        match self.get(key) {
            None => Ok(None),
            Some(PrefValue::List(value)) => Ok(Some(value)),
            Some(_) => Err(PrefsError::WrongType {
                key: key.to_string(),
                expected: "string list",
            }
            .into()),
        }
    }

    async fn set_string_list(&self, key: &str, value: &[String]) -> anyhow::Result<()> {
        self.put(key, PrefValue::List(value.to_vec()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_each_value_type() -> anyhow::Result<()> {
        let prefs = MemoryPrefs::new();

        prefs.set_bool("flag", true).await?;
        prefs.set_string("url", "https://www.weather.gov").await?;
        prefs
            .set_string_list("list", &["a".to_string(), "b".to_string()])
            .await?;

        assert_eq!(prefs.get_bool("flag").await?, Some(true));
        assert_eq!(
            prefs.get_string("url").await?.as_deref(),
            Some("https://www.weather.gov")
        );
        assert_eq!(
            prefs.get_string_list("list").await?,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        Ok(())
    }

    #[tokio::test]
    async fn absent_keys_read_as_none() -> anyhow::Result<()> {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.get_bool("missing").await?, None);
        assert_eq!(prefs.get_string("missing").await?, None);
        assert_eq!(prefs.get_string_list("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_types_error() -> anyhow::Result<()> {
        let prefs = MemoryPrefs::new();
        prefs.set_string("key", "text").await?;
        assert!(prefs.get_bool("key").await.is_err());
        assert!(prefs.get_string_list("key").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn seeded_values_are_visible_through_the_trait() -> anyhow::Result<()> {
        let prefs = MemoryPrefs::new();
        prefs.insert("incognito_mode", PrefValue::Bool(true));

        assert_eq!(prefs.get_bool("incognito_mode").await?, Some(true));
        let snapshot = prefs.snapshot();
        assert_eq!(snapshot.get("incognito_mode"), Some(&PrefValue::Bool(true)));
        Ok(())
    }

    #[tokio::test]
    async fn remove_is_idempotent() -> anyhow::Result<()> {
        let prefs = MemoryPrefs::new();
        prefs.set_bool("key", true).await?;
        prefs.remove("key").await?;
        prefs.remove("key").await?;
        assert_eq!(prefs.get_bool("key").await?, None);
        Ok(())
    }
}
