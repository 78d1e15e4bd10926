//! Auth token storage
//!
//! The session token returned by login is kept under a single storage key
//! and read back on every outgoing request.
//!
//! # Backends
//!
//! - `FileTokenStore`: JSON object file, one entry per storage key (default)
//! - `KeyringTokenStore`: OS-native secure storage
//! - `MemoryTokenStore`: process-local, nothing survives exit
//!
//! # Example
//!
//! ```no_run
//! use libsixcities::token::{create_token_store, TokenConfig};
//!
//! # fn example() -> libsixcities::Result<()> {
//! let store = create_token_store(&TokenConfig::default())?;
//!
//! store.save("T2xpdmVyLmNvbm5lckBnbWFpbC5jb20=")?;
//! assert!(store.load()?.is_some());
//!
//! store.clear()?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Result, TokenError};

pub const DEFAULT_TOKEN_KEY: &str = "six-cities-token";

const KEYRING_SERVICE: &str = "six-cities";

/// Storage for the session token
pub trait TokenStore: Send + Sync {
    /// Read the token, `None` when no session is stored
    fn load(&self) -> Result<Option<String>>;

    /// Persist the token, replacing any previous one
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the token. Clearing a missing token is not an error.
    fn clear(&self) -> Result<()>;

    /// Backend identifier used in logs
    fn backend_name(&self) -> &str;
}

/// Token backend type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

/// Token storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default)]
    pub backend: TokenBackend,

    /// File path for the file backend
    #[serde(default = "default_token_path")]
    pub path: String,

    /// Storage key the token lives under
    #[serde(default = "default_token_key")]
    pub key: String,
}

fn default_token_path() -> String {
    "~/.local/share/six-cities/token.json".to_string()
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            backend: TokenBackend::File,
            path: default_token_path(),
            key: default_token_key(),
        }
    }
}

impl TokenConfig {
    /// Expand ~ and environment variables in the token path
    pub fn expand_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }
}

/// Build the configured backend
pub fn create_token_store(config: &TokenConfig) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.backend {
        TokenBackend::File => Arc::new(FileTokenStore::new(config.expand_path(), &config.key)),
        TokenBackend::Keyring => Arc::new(KeyringTokenStore::new(&config.key)?),
        TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
    };
    tracing::debug!("Using {} token store", store.backend_name());
    Ok(store)
}

/// File-backed store
///
/// The file holds a JSON object so several keys can share one file, the
/// same way browser local storage does.
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: PathBuf, key: &str) -> Self {
        Self {
            path,
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content).map_err(TokenError::Parse)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(TokenError::Io(e).into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(TokenError::Io)?;
        }

        let content = serde_json::to_string_pretty(entries).map_err(TokenError::Parse)?;
        std::fs::write(&self.path, content).map_err(TokenError::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions).map_err(TokenError::Io)?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries.get(&self.key).filter(|token| !token.is_empty()).cloned())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries)?;
        tracing::debug!("Stored token under '{}' in {}", self.key, self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_none() {
            tracing::debug!("Token '{}' not found (already cleared)", self.key);
            return Ok(());
        }
        self.write_entries(&entries)
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}

/// OS-native keyring store
///
/// - **macOS**: Keychain
/// - **Windows**: Credential Manager
/// - **Linux**: Secret Service via D-Bus
pub struct KeyringTokenStore {
    key: String,
}

impl KeyringTokenStore {
    /// Create a keyring store
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Keyring` if the OS keyring cannot be accessed.
    pub fn new(key: &str) -> Result<Self> {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .map_err(|e| TokenError::Keyring(format!("OS keyring not accessible: {}", e)))?;
        Ok(Self {
            key: key.to_string(),
        })
    }

    fn entry(&self) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, &self.key)
            .map_err(|e| TokenError::Keyring(e.to_string()))?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(TokenError::Keyring(e.to_string()).into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(|e| TokenError::Keyring(e.to_string()))?;
        tracing::debug!("Stored token under '{}' in OS keyring", self.key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TokenError::Keyring(e.to_string()).into()),
        }
    }

    fn backend_name(&self) -> &str {
        "keyring"
    }
}

/// Process-local store
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
