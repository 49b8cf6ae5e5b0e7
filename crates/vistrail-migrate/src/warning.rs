//! Recoverable data-quality issues found in a legacy history.

use serde::Serialize;
use thiserror::Error;

use vistrail_core::{ActionId, ObjectKind};

/// A problem in the source history that the migration tolerated.
///
/// Warnings are accumulated in encounter order and returned with a
/// successful [`Migration`](crate::Migration).
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum MigrationWarning {
    /// A delete targeted an object that is not visible on its branch; the
    /// record was skipped.
    #[error("action {action}: skipped delete of {kind} {key}, not visible")]
    DanglingDelete {
        action: ActionId,
        kind: ObjectKind,
        key: String,
    },

    /// A function change was treated as an in-place edit although the
    /// visible and incoming parameter counts differ.
    #[error(
        "action {action}: function {function} aliased with {visible} visible \
         but {incoming} incoming parameter(s)"
    )]
    ParameterCountMismatch {
        action: ActionId,
        function: String,
        visible: usize,
        incoming: usize,
    },

    /// A connection port references a module that is not visible.
    #[error("action {action}: port of {connection} references missing module {module}")]
    UnresolvedPortModule {
        action: ActionId,
        connection: String,
        module: String,
    },

    /// A tag points at a version that is not in the history; it was dropped.
    #[error("tag '{name}' points at missing action {action}")]
    DanglingTag { name: String, action: ActionId },

    /// A tag name was bound more than once; the first binding was kept.
    #[error("tag '{name}' is bound again to action {action}; keeping the first binding")]
    DuplicateTag { name: String, action: ActionId },
}
