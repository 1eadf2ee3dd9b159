use crate::card::types::Card;
use crate::combos::canon_fold;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("Invalid pool data: {0}")]
    InvalidPool(String),
}

/// Ordered, read-only collection of candidate cards.
///
/// Order matters: selection walks the pool in its supplied order, so the
/// same pool file always presents candidates the same way to a seeded draw.
pub struct CandidatePool {
    cards: Vec<Card>,
    by_name: HashMap<String, usize>,
}

impl CandidatePool {
    /// Build a pool from an in-memory card list, rejecting duplicates
    /// (compared after canonicalization) and empty pools.
    pub fn new(cards: Vec<Card>) -> Result<Self, PoolError> {
        if cards.is_empty() {
            return Err(PoolError::InvalidPool("no cards in pool".to_string()));
        }

        let mut by_name = HashMap::new();
        for (idx, card) in cards.iter().enumerate() {
            let key = canon_fold(&card.name);
            if key.is_empty() {
                return Err(PoolError::InvalidPool(format!(
                    "card at index {} has a blank name",
                    idx
                )));
            }
            if by_name.insert(key, idx).is_some() {
                return Err(PoolError::InvalidPool(format!(
                    "duplicate card name: {}",
                    card.name
                )));
            }
        }

        Ok(CandidatePool { cards, by_name })
    }

    /// Load a pool from a JSON file (an array of card records).
    pub fn from_file(path: &str) -> Result<Self, PoolError> {
        let content = std::fs::read_to_string(path)?;
        let cards: Vec<Card> = serde_json::from_str(&content)?;
        Self::new(cards)
    }

    /// Get a card by name (canonicalized, case-insensitive).
    pub fn get_card(&self, name: &str) -> Result<&Card, PoolError> {
        self.by_name
            .get(&canon_fold(name))
            .map(|&idx| &self.cards[idx])
            .ok_or_else(|| PoolError::CardNotFound(name.to_string()))
    }

    /// All cards in pool order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Total number of cards.
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Whether any card in the pool carries the given canon-folded theme.
    pub fn knows_theme(&self, folded_theme: &str) -> bool {
        self.cards.iter().any(|c| c.has_theme(folded_theme))
    }
}
