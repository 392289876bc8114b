//! User domain model.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned user identifier (`users.uid`).
pub type UserId = i64;

/// One person tracking their net worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Immutable storage-assigned id.
    pub id: UserId,
    /// Unique display name, 2..=63 code points.
    pub name: String,
}

/// Key used to look a user up, carried by not-found errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    ByName(String),
    ById(UserId),
}

impl Display for UserLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "name `{name}`"),
            Self::ById(id) => write!(f, "id {id}"),
        }
    }
}
