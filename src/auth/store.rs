use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    auth::password::{hash_password, verify_password},
    error::{AppError, AppResult},
};

/// Username → password-hash storage.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a user. Username and password are trimmed first.
    async fn register(&self, username: &str, password: &str) -> AppResult<()>;
    /// True only if the user exists and the password matches.
    async fn verify(&self, username: &str, password: &str) -> AppResult<bool>;
}

/// Process-local store; contents are lost on restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn register(&self, username: &str, password: &str) -> AppResult<()> {
        let (username, password) = (username.trim(), password.trim());
        if username.is_empty() || password.is_empty() {
            return Err(AppError::invalid("Username and password are required."));
        }

        if self.users.read().await.contains_key(username) {
            return Err(AppError::AlreadyExists);
        }

        let hash = hash_password(password)?;

        // Re-check under the write lock: another registration may have won while we hashed.
        match self.users.write().await.entry(username.to_owned()) {
            Entry::Occupied(_) => Err(AppError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(hash);
                debug!(username, "credentials stored");
                Ok(())
            }
        }
    }

    async fn verify(&self, username: &str, password: &str) -> AppResult<bool> {
        let stored = self.users.read().await.get(username.trim()).cloned();
        match stored {
            Some(hash) => Ok(verify_password(password.trim(), &hash)?),
            None => Ok(false),
        }
    }
}
