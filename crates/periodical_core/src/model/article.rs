//! Article domain model.
//!
//! # Invariants
//! - `title` is 5..=255 characters; `content` may be empty.
//! - `author_id` and `magazine_id` are fixed at construction. Re-parenting
//!   an article means deleting it and creating a new one.
//! - Foreign keys are not range- or existence-checked here; `save` reports a
//!   missing referenced row.

use super::{char_len, validate_id, EntityId, EntityState, ValidationError};
use serde::Serialize;

const TITLE_LEN: std::ops::RangeInclusive<usize> = 5..=255;

/// One row of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    #[serde(rename = "id")]
    state: EntityState,
    title: String,
    content: String,
    author_id: EntityId,
    magazine_id: EntityId,
}

impl Article {
    /// Creates an unsaved article.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: EntityId,
        magazine_id: EntityId,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            state: EntityState::New,
            title,
            content: content.into(),
            author_id,
            magazine_id,
        })
    }

    /// Rebuilds an article that already has a storage id.
    pub fn with_id(
        id: EntityId,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: EntityId,
        magazine_id: EntityId,
    ) -> Result<Self, ValidationError> {
        validate_id("id", id)?;
        let mut article = Self::new(title, content, author_id, magazine_id)?;
        article.state = EntityState::Persisted(id);
        Ok(article)
    }

    pub fn id(&self) -> Option<EntityId> {
        self.state.id()
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> EntityId {
        self.author_id
    }

    pub fn magazine_id(&self) -> EntityId {
        self.magazine_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        Ok(())
    }

    /// Any string is valid content, including the empty string.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub(crate) fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = char_len(title);
    if !TITLE_LEN.contains(&len) {
        return Err(ValidationError::ArticleTitleLength(len));
    }
    Ok(())
}
