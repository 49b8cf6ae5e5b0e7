//! Migration configuration.

use serde::{Deserialize, Serialize};

/// When a change to a function counts as an in-place edit of the visible
/// function rather than a replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionAliasing {
    /// Same position and same name. Parameter-count mismatches are reported
    /// as warnings.
    #[default]
    NameAndPosition,
    /// Same position, same name and the same number of parameters.
    Strict,
}

/// What to do with a delete whose target is not visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingDeletePolicy {
    /// Skip the record and report a warning.
    #[default]
    Warn,
    /// Abort the migration.
    Fail,
}

/// Configuration for a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub function_aliasing: FunctionAliasing,
    pub dangling_deletes: DanglingDeletePolicy,
}
