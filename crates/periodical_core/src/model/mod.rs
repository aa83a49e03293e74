//! Entity models for authors, magazines and articles.
//!
//! # Responsibility
//! - Hold one row's worth of validated field values.
//! - Track whether an instance is new, persisted or detached.
//!
//! # Invariants
//! - Fields are validated in constructors and setters, never at write time.
//! - A failed setter leaves the previous value in place.
//! - Models perform no I/O; persistence lives in `crate::repo`.

use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article;
pub mod author;
pub mod magazine;

/// Storage-assigned row identifier.
pub type EntityId = i64;

/// Persistence lifecycle of one entity instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityState {
    /// Built in memory, never written.
    #[default]
    New,
    /// Backed by the storage row with this id.
    Persisted(EntityId),
    /// Row was deleted through this instance; the id has been cleared.
    Detached,
}

impl EntityState {
    /// Storage id, only while the instance is backed by a row.
    pub fn id(self) -> Option<EntityId> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::New | Self::Detached => None,
        }
    }

    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    pub fn is_detached(self) -> bool {
        matches!(self, Self::Detached)
    }
}

// Serialized as the nullable `id` column value.
impl Serialize for EntityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id().serialize(serializer)
    }
}

/// Field validation failure raised by constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Author names must contain at least one character.
    AuthorNameEmpty,
    /// Magazine names must be 2..=100 characters long.
    MagazineNameLength(usize),
    /// Magazine categories must be 2..=50 characters long.
    MagazineCategoryLength(usize),
    /// Article titles must be 5..=255 characters long.
    ArticleTitleLength(usize),
    /// Row ids passed to `with_id` must be positive.
    InvalidId { field: &'static str, value: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthorNameEmpty => write!(f, "author name must be a non-empty string"),
            Self::MagazineNameLength(len) => write!(
                f,
                "magazine name must be between 2 and 100 characters, got {len}"
            ),
            Self::MagazineCategoryLength(len) => write!(
                f,
                "magazine category must be between 2 and 50 characters, got {len}"
            ),
            Self::ArticleTitleLength(len) => write!(
                f,
                "article title must be between 5 and 255 characters, got {len}"
            ),
            Self::InvalidId { field, value } => {
                write!(f, "{field} must be a positive id, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Validates a storage id supplied by a caller.
pub(crate) fn validate_id(field: &'static str, value: EntityId) -> Result<(), ValidationError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidId { field, value })
    }
}

/// Length in characters, not bytes.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
