//! Magazine domain model.
//!
//! # Invariants
//! - `name` is 2..=100 characters, `category` is 2..=50 characters.
//! - The `(name, category)` pair is not unique.

use super::{char_len, EntityId, EntityState, ValidationError};
use serde::Serialize;

const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=100;
const CATEGORY_LEN: std::ops::RangeInclusive<usize> = 2..=50;

/// One row of the `magazines` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Magazine {
    #[serde(rename = "id")]
    state: EntityState,
    name: String,
    category: String,
}

impl Magazine {
    /// Creates an unsaved magazine.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let category = category.into();
        validate_name(&name)?;
        validate_category(&category)?;
        Ok(Self {
            state: EntityState::New,
            name,
            category,
        })
    }

    /// Rebuilds a magazine that already has a storage id.
    pub fn with_id(
        id: EntityId,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        super::validate_id("id", id)?;
        let mut magazine = Self::new(name, category)?;
        magazine.state = EntityState::Persisted(id);
        Ok(magazine)
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

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> Result<(), ValidationError> {
        let category = category.into();
        validate_category(&category)?;
        self.category = category;
        Ok(())
    }

    pub(crate) fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = char_len(name);
    if !NAME_LEN.contains(&len) {
        return Err(ValidationError::MagazineNameLength(len));
    }
    Ok(())
}

pub(crate) fn validate_category(category: &str) -> Result<(), ValidationError> {
    let len = char_len(category);
    if !CATEGORY_LEN.contains(&len) {
        return Err(ValidationError::MagazineCategoryLength(len));
    }
    Ok(())
}
