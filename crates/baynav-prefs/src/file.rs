//! JSON-file-backed preference store for desktop hosts.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::error::{PrefsError, PrefsResult};
use crate::store::{PrefValue, PreferenceStore};

/// Durable store that mirrors its contents into a single JSON document.
///
/// The whole document is loaded at open time and rewritten on every mutation
/// via a temp-file-then-rename sequence, so a crash mid-write never leaves a
/// truncated document behind.
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    values: Mutex<HashMap<String, PrefValue>>,
}

impl JsonFilePrefs {
    /// Open the store, creating an empty one when the document is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> PrefsResult<Self> {
        let path = path.into();
        let values = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| PrefsError::Document {
                operation: "prefs.load",
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "preference document absent; starting empty");
                HashMap::new()
            }
            Err(source) => {
                return Err(PrefsError::Io {
                    operation: "prefs.read",
                    path,
                    source,
                });
            }
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .get(key)
            .cloned()
    }

    fn render(&self) -> PrefsResult<String> {
        let values = self.values.lock().expect("preference mutex poisoned");
        serde_json::to_string_pretty(&*values).map_err(|source| PrefsError::Document {
            operation: "prefs.render",
            source,
        })
    }

    async fn persist(&self) -> PrefsResult<()> {
        let payload = self.render()?;
        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, payload.as_bytes())
            .await
            .map_err(|source| PrefsError::Io {
                operation: "prefs.write",
                path: staging.clone(),
                source,
            })?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|source| PrefsError::Io {
                operation: "prefs.commit",
                path: self.path.clone(),
                source,
            })
    }

    async fn put(&self, key: &str, value: PrefValue) -> PrefsResult<()> {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .insert(key.to_string(), value);
        self.persist().await
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePrefs {
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
        self.put(key, PrefValue::Bool(value)).await?;
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
        self.put(key, PrefValue::Text(value.to_string())).await?;
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
        self.put(key, PrefValue::List(value.to_vec())).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .expect("preference mutex poisoned")
            .remove(key);
        self.persist().await?;
        Ok(())
    }
}
