//! Migration error types.
//!
//! [`MigrationError`] covers every fatal condition of a migration run:
//! malformed version graphs, edits whose container is not visible, and
//! violated internal invariants. A run that returns an error produces no
//! partial output. Recoverable data-quality issues are reported as
//! [`MigrationWarning`](crate::MigrationWarning)s instead.

use thiserror::Error;

use vistrail_core::{ActionId, CoreError, ObjectKind};

/// Failures of [`ScopeTable`](crate::ScopeTable) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A container on the path is absent or deleted on the current branch.
    #[error("no visible object at {path}")]
    Unresolved { path: String },

    /// An undo did not target the most recently pushed binding.
    #[error("undo of {key} under {path} does not match the most recent binding")]
    UndoOutOfOrder { path: String, key: String },
}

/// Fatal migration errors.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The declared predecessor links contain a cycle.
    #[error("version graph contains a cycle through action {action}")]
    Cycle { action: ActionId },

    /// An action declares a predecessor that is not in the history.
    #[error("action {action} declares missing parent {parent}")]
    MissingParent { action: ActionId, parent: ActionId },

    /// Two actions share an id.
    #[error("duplicate action id {action}")]
    DuplicateAction { action: ActionId },

    /// An action uses the id reserved for the root version.
    #[error("action id 0 is reserved for the root version")]
    ReservedActionId,

    /// An Add or Change targets an object whose container is not visible.
    #[error("action {action}: {kind} {key} has no visible container at {parent}")]
    UnresolvedParent {
        action: ActionId,
        kind: ObjectKind,
        key: String,
        parent: String,
    },

    /// A Delete targets an object that is not visible, under
    /// [`DanglingDeletePolicy::Fail`](crate::DanglingDeletePolicy::Fail).
    #[error("action {action}: delete of {kind} {key} which is not visible")]
    DanglingDelete {
        action: ActionId,
        kind: ObjectKind,
        key: String,
    },

    /// A placeholder or zero id reached the output.
    #[error("action {action}: {kind} carries unassigned id {id}")]
    PlaceholderId {
        action: ActionId,
        kind: ObjectKind,
        id: i64,
    },

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
