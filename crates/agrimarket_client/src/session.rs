//! Persistent credential and language preference storage.
//!
//! The backend credential is stored under [`CREDENTIAL_KEY`] either as a JSON
//! object carrying `accessToken` or as a bare token string. Both shapes are
//! accepted when reading.

use agrimarket_common::{storage_error, AgriError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

pub const CREDENTIAL_KEY: &str = "auth_token";
pub const LANGUAGE_KEY: &str = "language";

/// A string key-value store with browser local-storage semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AgriError>;
    fn remove(&self, key: &str) -> Result<(), AgriError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AgriError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), AgriError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AgriError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| storage_error("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AgriError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| storage_error("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// A store persisted as one flat JSON object on disk.
///
/// The file is re-read on every `get` so that writes made by another process
/// (or another `FileStore` on the same path) are picked up.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, AgriError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(storage_error(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), AgriError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.write_lock.read().ok()?;
        match self.read_all() {
            Ok(entries) => entries.get(key).and_then(Value::as_str).map(str::to_string),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read storage file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AgriError> {
        let _guard = self
            .write_lock
            .write()
            .map_err(|_| storage_error("file store lock poisoned"))?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AgriError> {
        let _guard = self
            .write_lock
            .write()
            .map_err(|_| storage_error("file store lock poisoned"))?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// The stored credential in either of its two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialRecord {
    Structured {
        access_token: String,
        extra: Map<String, Value>,
    },
    Raw(String),
}

impl CredentialRecord {
    /// Interprets a stored value. Never fails: anything that is not an object
    /// with a string `accessToken` is kept verbatim as a raw token.
    pub fn parse(stored: &str) -> Self {
        if let Ok(Value::Object(mut map)) = serde_json::from_str::<Value>(stored) {
            if let Some(Value::String(token)) = map.remove("accessToken") {
                return CredentialRecord::Structured {
                    access_token: token,
                    extra: map,
                };
            }
        }
        CredentialRecord::Raw(stored.to_string())
    }

    pub fn bearer_token(&self) -> &str {
        match self {
            CredentialRecord::Structured { access_token, .. } => access_token,
            CredentialRecord::Raw(token) => token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePreference {
    pub name: String,
    pub lang_code: String,
}

impl LanguagePreference {
    pub fn new(name: impl Into<String>, lang_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang_code: lang_code.into(),
        }
    }
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self::new("English", "en")
    }
}

/// Supplies the bearer token for outgoing requests.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, for tests and one-off scripts.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Session state backed by a [`KeyValueStore`].
///
/// Nothing is cached: every lookup goes back to the store, so a credential
/// written by a login is used by the very next request.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn credential(&self) -> Option<CredentialRecord> {
        self.store
            .get(CREDENTIAL_KEY)
            .filter(|stored| !stored.is_empty())
            .map(|stored| CredentialRecord::parse(&stored))
    }

    /// Persists the login payload. Strings are stored verbatim, anything
    /// else as serialized JSON.
    pub fn save_credential(&self, payload: &Value) -> Result<(), AgriError> {
        let stored = match payload {
            Value::String(token) => token.clone(),
            other => serde_json::to_string(other)?,
        };
        debug!("storing credential record");
        self.store.set(CREDENTIAL_KEY, &stored)
    }

    pub fn clear_credential(&self) -> Result<(), AgriError> {
        debug!("clearing credential record");
        self.store.remove(CREDENTIAL_KEY)
    }

    pub fn language(&self) -> Option<LanguagePreference> {
        let stored = self.store.get(LANGUAGE_KEY)?;
        match serde_json::from_str(&stored) {
            Ok(preference) => Some(preference),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable language preference");
                None
            }
        }
    }

    pub fn save_language(&self, preference: &LanguagePreference) -> Result<(), AgriError> {
        let stored = serde_json::to_string(preference)?;
        self.store.set(LANGUAGE_KEY, &stored)
    }
}

impl<S: KeyValueStore> TokenProvider for SessionStore<S> {
    fn bearer_token(&self) -> Option<String> {
        self.credential()
            .map(|record| record.bearer_token().to_string())
            .filter(|token| !token.is_empty())
    }
}

/// Storage operations the service layer needs, independent of the backing store.
pub trait SessionWriter: TokenProvider {
    fn save_credential(&self, payload: &Value) -> Result<(), AgriError>;
    fn clear_credential(&self) -> Result<(), AgriError>;
    fn language(&self) -> Option<LanguagePreference>;
    fn save_language(&self, preference: &LanguagePreference) -> Result<(), AgriError>;
}

impl<S: KeyValueStore> SessionWriter for SessionStore<S> {
    fn save_credential(&self, payload: &Value) -> Result<(), AgriError> {
        SessionStore::save_credential(self, payload)
    }

    fn clear_credential(&self) -> Result<(), AgriError> {
        SessionStore::clear_credential(self)
    }

    fn language(&self) -> Option<LanguagePreference> {
        SessionStore::language(self)
    }

    fn save_language(&self, preference: &LanguagePreference) -> Result<(), AgriError> {
        SessionStore::save_language(self, preference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_record_yields_access_token() {
        let record = CredentialRecord::parse(r#"{"accessToken":"abc","userId":7}"#);
        assert_eq!(record.bearer_token(), "abc");
        match record {
            CredentialRecord::Structured { extra, .. } => assert_eq!(extra["userId"], 7),
            other => panic!("expected structured record, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_record_is_used_verbatim() {
        assert_eq!(CredentialRecord::parse("plain-token").bearer_token(), "plain-token");
        // An object without accessToken is not a structured record either.
        let stored = r#"{"token":"x"}"#;
        assert_eq!(CredentialRecord::parse(stored).bearer_token(), stored);
    }

    #[test]
    fn absent_credential_yields_no_token() {
        let session = SessionStore::new(MemoryStore::new());
        assert_eq!(session.bearer_token(), None);
    }

    #[test]
    fn saved_credential_is_read_back_immediately() {
        let session = SessionStore::new(MemoryStore::new());
        session.save_credential(&json!({"accessToken": "first"})).unwrap();
        assert_eq!(session.bearer_token().as_deref(), Some("first"));
        session.save_credential(&json!("second")).unwrap();
        assert_eq!(session.bearer_token().as_deref(), Some("second"));
        session.clear_credential().unwrap();
        assert_eq!(session.bearer_token(), None);
    }

    #[test]
    fn language_preference_uses_camel_case() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::new(store.clone());
        session.save_language(&LanguagePreference::new("Hindi", "hi")).unwrap();
        assert_eq!(
            store.get(LANGUAGE_KEY).as_deref(),
            Some(r#"{"name":"Hindi","langCode":"hi"}"#)
        );
        assert_eq!(session.language(), Some(LanguagePreference::new("Hindi", "hi")));
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");

        let first = FileStore::new(&path);
        first.set(CREDENTIAL_KEY, "token-1").unwrap();

        let second = FileStore::new(&path);
        assert_eq!(second.get(CREDENTIAL_KEY).as_deref(), Some("token-1"));
        second.remove(CREDENTIAL_KEY).unwrap();
        assert_eq!(first.get(CREDENTIAL_KEY), None);
    }
}
