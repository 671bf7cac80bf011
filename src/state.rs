use std::sync::Arc;

use crate::auth::store::{CredentialStore, MemoryCredentialStore};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        if config.session.secret_generated {
            tracing::warn!("SECRET_KEY not set; generated a random one, sessions will not survive a restart");
        }
        let store = Arc::new(MemoryCredentialStore::new()) as Arc<dyn CredentialStore>;
        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn CredentialStore>) -> Self {
        Self { config, store }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::fake()),
            Arc::new(MemoryCredentialStore::new()),
        )
    }
}
