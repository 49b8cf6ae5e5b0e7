//! Core error types for vistrail-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the history container and of workflow materialization.

use crate::id::{ActionId, ObjectId};
use crate::object::ObjectKind;
use thiserror::Error;

/// Core errors produced by the vistrail-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An action with this id is already part of the history.
    #[error("duplicate action: ActionId({id})")]
    DuplicateAction { id: ActionId },

    /// Action id 0 is reserved for the synthetic root.
    #[error("action id 0 is reserved for the root version")]
    ReservedActionId,

    /// An action's declared parent is not part of the history.
    #[error("action {action} declares unknown parent {parent}")]
    UnknownParent { action: ActionId, parent: ActionId },

    /// A version id was not found.
    #[error("action not found: ActionId({id})")]
    ActionNotFound { id: ActionId },

    /// A tag name is already bound to a version.
    #[error("duplicate tag name: '{name}'")]
    DuplicateTag { name: String },

    /// An operation targets an object that does not exist in the workflow.
    #[error("{kind} {id} not found")]
    ObjectNotFound { kind: ObjectKind, id: ObjectId },

    /// An Add reuses an id that is already live in the workflow.
    #[error("{kind} {id} already exists")]
    ObjectExists { kind: ObjectKind, id: ObjectId },

    /// An object was removed or replaced while it still had children.
    #[error("{kind} {id} still has {count} child object(s)")]
    DanglingChildren {
        kind: ObjectKind,
        id: ObjectId,
        count: usize,
    },

    /// An operation's parent reference does not match the containment tree.
    #[error("{kind} cannot be contained in {parent_kind:?}")]
    InvalidContainment {
        kind: ObjectKind,
        parent_kind: Option<ObjectKind>,
    },
}
