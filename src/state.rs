use std::sync::{Arc, Mutex};

use crate::{
    cards::CardStore,
    config::Config,
    database::{init_redis, RedisCardStore},
    datos::DatoList,
};

pub struct AppState {
    pub config: Config,
    pub cards: Arc<dyn CardStore>,
    pub datos: Mutex<DatoList>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let connection = init_redis(&config.redis_url).await;
        let cards = Arc::new(RedisCardStore::new(connection));

        Self::with_store(config, cards)
    }

    /// Builds state around an arbitrary store binding. Tests use this with
    /// the in-memory store; [`AppState::new`] uses it with Redis.
    pub fn with_store(config: Config, cards: Arc<dyn CardStore>) -> Arc<Self> {
        Arc::new(Self {
            config,
            cards,
            datos: Mutex::new(DatoList::default()),
        })
    }
}
