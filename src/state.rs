use std::sync::Arc;

use tokio::sync::RwLock;

use super::{config::Config, store::Store};

pub struct AppState {
    pub config: Config,
    pub store: RwLock<Store>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let store = if config.seed_users {
            Store::seeded()
        } else {
            Store::new()
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self {
            config,
            store: RwLock::new(store),
        })
    }
}
