//! Credential storage seam.
//!
//! The client never owns credentials. It reads the token before each
//! request and, on an expired session, asks the store to forget both keys.
//! Hosts plug in their own persistent store; `MemoryCredentialStore` covers
//! tests and hosts without persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub username: String,
}

/// Synchronous key/value storage owned by the host.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Current token, if any. An empty string counts as absent.
pub fn load_token(store: &dyn CredentialStore) -> Option<String> {
    store.get(TOKEN_KEY).filter(|token| !token.is_empty())
}

pub fn load_credential(store: &dyn CredentialStore) -> Option<Credential> {
    let token = load_token(store)?;
    let username = store.get(USERNAME_KEY).unwrap_or_default();
    Some(Credential { token, username })
}

pub fn save_credential(store: &dyn CredentialStore, credential: &Credential) {
    store.set(TOKEN_KEY, &credential.token);
    store.set(USERNAME_KEY, &credential.username);
}

pub fn clear_credential(store: &dyn CredentialStore) {
    store.remove(TOKEN_KEY);
    store.remove(USERNAME_KEY);
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: &Credential) -> Self {
        let store = Self::new();
        save_credential(&store, credential);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        // Entries are independent, so a poisoned lock is still readable.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}
