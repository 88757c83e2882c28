use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use crate::models::user::UserSummary;

pub const USER_ID_KEY: &str = "userId";
pub const USERNAME_KEY: &str = "username";
/// Offline copy of the entry list, written by the UI layer.
pub const ENTRIES_CACHE_KEY: &str = "wellnessTrackerData";

/// Key-value device storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> io::Result<HashMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, values: &HashMap<String, String>) -> io::Result<()> {
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, bytes)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// The signed-in user, passed explicitly to every client call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<i32>,
    pub username: Option<String>,
}

impl Session {
    /// Reload whatever a previous login persisted. Unparseable ids are ignored.
    pub fn restore(storage: &dyn Storage) -> io::Result<Self> {
        let user_id = storage
            .get(USER_ID_KEY)?
            .and_then(|raw| raw.trim().parse().ok());
        let username = storage.get(USERNAME_KEY)?;
        Ok(Self { user_id, username })
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Record a successful login and mirror it to storage.
    pub fn remember(&mut self, user: &UserSummary, storage: &dyn Storage) -> io::Result<()> {
        self.user_id = Some(user.id);
        self.username = Some(user.username.clone());
        storage.set(USER_ID_KEY, &user.id.to_string())?;
        storage.set(USERNAME_KEY, &user.username)
    }

    pub fn clear(&mut self, storage: &dyn Storage) -> io::Result<()> {
        *self = Session::default();
        storage.remove(USER_ID_KEY)?;
        storage.remove(USERNAME_KEY)
    }
}
