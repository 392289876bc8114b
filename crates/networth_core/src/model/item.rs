//! Item domain model.
//!
//! # Responsibility
//! - Define asset/liability records and their persisted kind strings.
//!
//! # Invariants
//! - `ItemKind` persists as the literal `"Asset"` or `"Liability"`.
//! - `ItemKind::Other` only appears on read, for legacy `type` text; the
//!   services never write it.
//! - Validated items carry a non-negative `value`.

use crate::model::user::UserId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Storage-assigned item identifier (`items.id`).
pub type ItemId = i64;

/// Whether an item adds to or subtracts from net worth.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Something owned; counted positively.
    Asset,
    /// Something owed; counted negatively.
    Liability,
    /// Persisted text that is neither kind; counted in no total.
    Other(String),
}

impl ItemKind {
    /// Returns the persisted/external spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Other(text) => text,
        }
    }

    /// Parses the exact, case-sensitive external spelling.
    ///
    /// Only the two known kinds parse; use [`ItemKind::from_persisted`] for
    /// stored rows.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Asset" => Some(Self::Asset),
            "Liability" => Some(Self::Liability),
            _ => None,
        }
    }

    /// Maps stored `type` text, keeping unknown spellings verbatim.
    pub fn from_persisted(value: String) -> Self {
        Self::parse(&value).unwrap_or(Self::Other(value))
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_persisted)
    }
}

/// One asset or liability owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    /// Immutable storage-assigned id.
    pub id: ItemId,
    /// Owning user id, checked at write time only.
    #[serde(rename = "Uid")]
    pub owner_id: UserId,
    pub name: String,
    /// Serialized as `Type` to match the persisted column name.
    #[serde(rename = "Type")]
    pub kind: ItemKind,
    pub value: i64,
}
