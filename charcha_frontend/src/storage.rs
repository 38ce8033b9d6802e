//! Persisted client session: `token`, `refreshToken` and `userInfo`.
//!
//! Kept as a flat key/value JSON file so it mirrors the browser's local
//! storage layout the API's other clients use.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::models::{UserId, UserInfo};

pub const SESSION_FILE_NAME: &str = "session.json";
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_INFO_KEY: &str = "userInfo";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl SessionStore {
    /// Opens the store inside `dir`, loading any existing session.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(SESSION_FILE_NAME);
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// A store that is never written to disk. Used when the data dir is unusable.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    pub fn save_login(
        &mut self,
        token: &str,
        refresh_token: &str,
        user_info: &UserInfo,
    ) -> Result<(), StorageError> {
        self.entries
            .insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.entries.insert(
            REFRESH_TOKEN_KEY.to_string(),
            Value::String(refresh_token.to_string()),
        );
        self.entries
            .insert(USER_INFO_KEY.to_string(), serde_json::to_value(user_info)?);
        self.persist()
    }

    pub fn save_user_info(&mut self, user_info: &UserInfo) -> Result<(), StorageError> {
        self.set(USER_INFO_KEY, serde_json::to_value(user_info)?)
    }

    pub fn token(&self) -> Option<&str> {
        self.get_str(TOKEN_KEY)
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.entries
            .get(USER_INFO_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_info().and_then(|info| info.id)
    }

    fn persist(&self) -> Result<(), StorageError> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!("session store written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_user() -> UserInfo {
        UserInfo {
            id: Some(3),
            first_name: Some("Asha".into()),
            last_name: Some("Verma".into()),
            email: Some("a@b.com".into()),
            ..UserInfo::default()
        }
    }

    #[test]
    fn login_survives_reopen() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::open(dir.path()).unwrap();
        store.save_login("tok", "refresh", &sample_user()).unwrap();

        let reopened = SessionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.token(), Some("tok"));
        assert_eq!(reopened.get_str(REFRESH_TOKEN_KEY), Some("refresh"));
        assert_eq!(reopened.user_info(), Some(sample_user()));
        assert_eq!(reopened.user_id(), Some(3));
    }

    #[test]
    fn registration_only_writes_user_info() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::open(dir.path()).unwrap();
        store.save_user_info(&sample_user()).unwrap();
        assert_eq!(store.token(), None);
        assert!(store.get(USER_INFO_KEY).is_some());
    }

    #[test]
    fn clear_and_remove() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::open(dir.path()).unwrap();
        store.save_login("tok", "refresh", &sample_user()).unwrap();
        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.token(), None);
        store.clear().unwrap();
        let reopened = SessionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.user_info(), None);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE_NAME), "not json").unwrap();
        assert!(matches!(
            SessionStore::open(dir.path()),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn in_memory_store_never_touches_disk() {
        let mut store = SessionStore::in_memory();
        store.set(TOKEN_KEY, Value::String("tok".into())).unwrap();
        assert_eq!(store.token(), Some("tok"));
        assert!(store.path().as_os_str().is_empty());
    }
}
