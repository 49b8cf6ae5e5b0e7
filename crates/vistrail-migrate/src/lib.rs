//! Migration of legacy vistrail histories to the generic-operation schema.
//!
//! The legacy schema records one ad-hoc action kind per edit (add-module,
//! change-parameter, move-module, ...) with identifiers that are only unique
//! locally. The target schema expresses every edit as generic Add / Change /
//! Delete operations over globally unique ids.
//!
//! # Architecture
//!
//! - [`legacy`]: the input model.
//! - [`scope`]: [`ScopeTable`], the branch-aware, undo-capable map from legacy
//!   identity to the currently visible new identity.
//! - [`translate`]: one pure translator per legacy action kind, producing
//!   [`Draft`]s of generic operations.
//! - [`driver`]: walks the version tree depth-first, applying drafts against
//!   the scope table on the way down and undoing them on the way up.
//! - [`migrate()`]: the entry point tying everything together.
//!
//! # Usage
//!
//! ```ignore
//! let migration = vistrail_migrate::migrate(&legacy)?;
//! for warning in &migration.warnings {
//!     eprintln!("{warning}");
//! }
//! session.adopt(migration.vistrail, migration.id_scope);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod legacy;
pub mod migrate;
pub mod scope;
pub mod translate;
pub mod warning;

pub use config::{DanglingDeletePolicy, FunctionAliasing, MigrationConfig};
pub use error::{MigrationError, ScopeError};
pub use legacy::{LegacyAction, LegacyOp, LegacyRecord, LegacyTag, LegacyVistrail};
pub use migrate::{migrate, migrate_with_config, prepare, Migration};
pub use scope::{LegacyKey, ObjectPath, Resolved, ScopeKey, ScopeTable};
pub use translate::{translate, Draft, ObjectDraft};
pub use warning::MigrationWarning;
