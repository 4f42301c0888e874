use std::fmt;

use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Parsed `{category}.{name}` character identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterId {
    /// Folder under `data/characters/`.
    pub category: String,
    /// File stem of the character document.
    pub name: String,
}

impl CharacterId {
    /// Parse an id with exactly two non-empty dot-separated segments.
    pub fn parse(id: &str) -> FlipbookResult<Self> {
        let mut it = id.split('.');
        let (Some(category), Some(name), None) = (it.next(), it.next(), it.next()) else {
            return Err(FlipbookError::malformed_id(id));
        };
        if category.is_empty() || name.is_empty() {
            return Err(FlipbookError::malformed_id(id));
        }
        Ok(Self {
            category: category.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}
