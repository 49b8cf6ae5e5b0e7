//! Actions (versions) and tags of a history.

use serde::{Deserialize, Serialize};

use crate::id::ActionId;
use crate::operation::Operation;

/// One immutable node of the version tree: an ordered batch of operations
/// applied atomically on top of the parent version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub parent: ActionId,
    pub user: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub operations: Vec<Operation>,
}

/// A human-readable name bound to a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub action: ActionId,
}
