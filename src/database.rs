//! # Redis
//!
//! Document store for cards.
//!
//! ## Layout
//!
//! - `cards:seq`: integer sequence, `INCR`-ed to mint card ids
//! - `cards`: hash of id to JSON document
//! - `cards:ids`: list of ids in insertion order, drives `find_all`
//!
//! Unknown or malformed ids simply miss the hash lookup, so a bad id costs
//! one round trip and surfaces as a not-found, never a decode failure.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};

use crate::{
    cards::{Card, CardDraft, CardStore},
    error::AppError,
};

const CARDS_KEY: &str = "cards";
const CARD_IDS_KEY: &str = "cards:ids";
const CARD_SEQ_KEY: &str = "cards:seq";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();

    client
        .get_connection_manager_with_config(config)
        .await
        .unwrap()
}

/// Production [`CardStore`] binding over the process-wide connection.
pub struct RedisCardStore {
    connection: ConnectionManager,
}

impl RedisCardStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CardStore for RedisCardStore {
    async fn insert(&self, draft: CardDraft) -> Result<Card, AppError> {
        let mut conn = self.connection.clone();

        let id: u64 = conn.incr(CARD_SEQ_KEY, 1).await?;
        let card = Card::new(id.to_string(), draft);

        let doc = serde_json::to_string(&card)?;
        conn.hset::<_, _, _, ()>(CARDS_KEY, &card.id, doc).await?;
        conn.rpush::<_, _, ()>(CARD_IDS_KEY, &card.id).await?;

        Ok(card)
    }

    async fn find_all(&self) -> Result<Vec<Card>, AppError> {
        let mut conn = self.connection.clone();

        let ids: Vec<String> = conn.lrange(CARD_IDS_KEY, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let docs: HashMap<String, String> = conn.hgetall(CARDS_KEY).await?;

        let mut cards = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(doc) = docs.get(&id) {
                cards.push(serde_json::from_str(doc)?);
            }
        }

        Ok(cards)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Card>, AppError> {
        let mut conn = self.connection.clone();

        let doc: Option<String> = conn.hget(CARDS_KEY, id).await?;

        doc.map(|doc| serde_json::from_str(&doc))
            .transpose()
            .map_err(AppError::from)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Card>, AppError> {
        let mut conn = self.connection.clone();

        let doc: Option<String> = conn.hget(CARDS_KEY, id).await?;
        let Some(doc) = doc else {
            return Ok(None);
        };

        conn.hdel::<_, _, ()>(CARDS_KEY, id).await?;
        conn.lrem::<_, _, ()>(CARD_IDS_KEY, 0, id).await?;

        Ok(Some(serde_json::from_str(&doc)?))
    }

    async fn save(&self, card: &Card) -> Result<(), AppError> {
        let mut conn = self.connection.clone();

        let doc = serde_json::to_string(card)?;
        conn.hset::<_, _, _, ()>(CARDS_KEY, &card.id, doc).await?;

        Ok(())
    }
}
