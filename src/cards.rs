//! Card domain model and the store seam.
//!
//! A card is a small JSON document: a title, a link, an optional blurb and a
//! like counter. Identifiers are minted by the store at creation and treated
//! as opaque strings everywhere else.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub likes: u32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(id: String, draft: CardDraft) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: draft.name,
            link: draft.link,
            description: draft.description,
            likes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a like action to the counter. Unlike saturates at zero.
    pub fn apply(&mut self, action: LikeAction) {
        self.likes = match action {
            LikeAction::Like => self.likes.saturating_add(1),
            LikeAction::Unlike => self.likes.saturating_sub(1),
        };
        self.updated_at = Utc::now();
    }
}

/// Raw creation payload as it arrives on the wire. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCard {
    pub name: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl CreateCard {
    /// Trims all fields and enforces that `name` and `link` are present and
    /// non-empty. Runs before any store call.
    pub fn validate(self) -> Result<CardDraft, AppError> {
        let name = required(self.name)?;
        let link = required(self.link)?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(CardDraft {
            name,
            link,
            description,
        })
    }
}

fn required(field: Option<String>) -> Result<String, AppError> {
    field
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or(AppError::MissingFields)
}

/// A validated card waiting for the store to assign its identity.
#[derive(Debug, Clone)]
pub struct CardDraft {
    pub name: String,
    pub link: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

impl FromStr for LikeAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(LikeAction::Like),
            "unlike" => Ok(LikeAction::Unlike),
            _ => Err(AppError::InvalidAction),
        }
    }
}

/// The document store seam for cards.
///
/// The production binding lives in [`crate::database`]; tests run against
/// [`MemoryCardStore`]. `find_all` returns cards in insertion order.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn insert(&self, draft: CardDraft) -> Result<Card, AppError>;
    async fn find_all(&self) -> Result<Vec<Card>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Card>, AppError>;
    async fn delete_by_id(&self, id: &str) -> Result<Option<Card>, AppError>;
    async fn save(&self, card: &Card) -> Result<(), AppError>;
}

/// In-memory card store with the same sequence/ordering semantics as the
/// Redis binding.
#[derive(Debug, Default)]
pub struct MemoryCardStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    seq: u64,
    cards: HashMap<String, Card>,
    order: Vec<String>,
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn insert(&self, draft: CardDraft) -> Result<Card, AppError> {
        let mut inner = self.inner.lock().unwrap();

        inner.seq += 1;
        let card = Card::new(inner.seq.to_string(), draft);

        inner.order.push(card.id.clone());
        inner.cards.insert(card.id.clone(), card.clone());

        Ok(card)
    }

    async fn find_all(&self) -> Result<Vec<Card>, AppError> {
        let inner = self.inner.lock().unwrap();

        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.cards.get(id).cloned())
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Card>, AppError> {
        let inner = self.inner.lock().unwrap();

        Ok(inner.cards.get(id).cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Card>, AppError> {
        let mut inner = self.inner.lock().unwrap();

        let card = inner.cards.remove(id);
        if card.is_some() {
            inner.order.retain(|stored| stored != id);
        }

        Ok(card)
    }

    async fn save(&self, card: &Card) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();

        inner.cards.insert(card.id.clone(), card.clone());

        Ok(())
    }
}
