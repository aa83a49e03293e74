//! Author domain model.
//!
//! # Invariants
//! - `name` is never empty.
//! - Name uniqueness is a storage constraint, not checked here.

use super::{EntityId, EntityState, ValidationError};
use serde::Serialize;

/// One row of the `authors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    #[serde(rename = "id")]
    state: EntityState,
    name: String,
}

impl Author {
    /// Creates an unsaved author.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            state: EntityState::New,
            name,
        })
    }

    /// Rebuilds an author that already has a storage id.
    pub fn with_id(id: EntityId, name: impl Into<String>) -> Result<Self, ValidationError> {
        super::validate_id("id", id)?;
        let mut author = Self::new(name)?;
        author.state = EntityState::Persisted(id);
        Ok(author)
    }

    pub fn id(&self) -> Option<EntityId> {
        self.state.id()
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the in-memory name. Does not touch storage.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub(crate) fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::AuthorNameEmpty);
    }
    Ok(())
}
