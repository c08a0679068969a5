//! # Session
//!
//! No real auth. A user "logs in" by typing a display name, which is kept in local storage
//! under [`USER_NAME_KEY`] until they log out.
//!
//! - Dashboard requires a name, otherwise back to login
//! - Login with a name already stored goes straight to the dashboard
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing::info;

pub const USER_NAME_KEY: &str = "puff_user_name";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Name is required")]
    BlankName,

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage: {0}")]
    Json(#[from] serde_json::Error),
}

/// Browser-local-storage-like string map.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

fn lock(
    items: &Mutex<HashMap<String, String>>,
) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    items.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Storage persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> Result<HashMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, items: &HashMap<String, String>) -> Result<(), SessionError> {
        fs::write(&self.path, serde_json::to_vec_pretty(items)?)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self.read()?;
        items.insert(key.to_string(), value.to_string());
        self.write(&items)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.read()?;
        if items.remove(key).is_some() {
            self.write(&items)?;
        }
        Ok(())
    }
}

pub struct Session<S: Storage> {
    storage: S,
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn user_name(&self) -> Result<Option<String>, SessionError> {
        self.storage.get(USER_NAME_KEY)
    }

    pub fn is_logged_in(&self) -> Result<bool, SessionError> {
        Ok(self.user_name()?.is_some())
    }

    /// Stores the trimmed name. Blank names are refused.
    pub fn login(&self, name: &str) -> Result<String, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::BlankName);
        }

        self.storage.set(USER_NAME_KEY, name)?;
        info!("Logged in as {name}");

        Ok(name.to_string())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.storage.remove(USER_NAME_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_trims_name() {
        let session = Session::new(MemoryStorage::default());

        assert_eq!(session.login("  Patrick  ").unwrap(), "Patrick");
        assert_eq!(session.user_name().unwrap().as_deref(), Some("Patrick"));
        assert!(session.is_logged_in().unwrap());
    }

    #[test]
    fn test_blank_name() {
        let session = Session::new(MemoryStorage::default());

        assert!(matches!(session.login("   "), Err(SessionError::BlankName)));
        assert_eq!(session.user_name().unwrap(), None);
    }

    #[test]
    fn test_logout() {
        let session = Session::new(MemoryStorage::default());
        session.login("Patrick").unwrap();

        session.logout().unwrap();

        assert!(!session.is_logged_in().unwrap());
        session.logout().unwrap();
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        Session::new(FileStorage::new(&path)).login("Sandy").unwrap();

        let session = Session::new(FileStorage::new(&path));
        assert_eq!(session.user_name().unwrap().as_deref(), Some("Sandy"));

        session.logout().unwrap();
        assert_eq!(
            Session::new(FileStorage::new(&path)).user_name().unwrap(),
            None
        );
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        storage.set("theme", "dark").unwrap();

        let session = Session::new(storage.clone());
        session.login("Sandy").unwrap();
        session.logout().unwrap();

        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let session = Session::new(FileStorage::new(&path));
        assert!(matches!(session.user_name(), Err(SessionError::Json(_))));
    }
}
