//! Top-level migration entry points.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use vistrail_core::{
    Action, ActionId, IdKind, IdScope, ObjectData, ObjectId, Operation, Tag, VersionTree,
    Vistrail,
};

use crate::config::MigrationConfig;
use crate::driver::Driver;
use crate::error::MigrationError;
use crate::legacy::{LegacyAction, LegacyVistrail};
use crate::warning::MigrationWarning;

/// Result of a successful migration.
#[derive(Debug, Clone, Serialize)]
pub struct Migration {
    pub vistrail: Vistrail,
    /// Counters after the run; a live session keeps minting from here.
    pub id_scope: IdScope,
    pub warnings: Vec<MigrationWarning>,
}

/// Migrates `legacy` with the default configuration.
pub fn migrate(legacy: &LegacyVistrail) -> Result<Migration, MigrationError> {
    migrate_with_config(legacy, &MigrationConfig::default())
}

/// Migrates `legacy`. Either the whole history is rewritten or an error is
/// returned; no partial output escapes.
pub fn migrate_with_config(
    legacy: &LegacyVistrail,
    config: &MigrationConfig,
) -> Result<Migration, MigrationError> {
    let source = prepare(legacy)?;

    let mut tree = VersionTree::new();
    for action in source.values() {
        tree.add_version(action.time, action.parent);
    }
    if let Some(action) = tree.find_cycle() {
        return Err(MigrationError::Cycle { action });
    }

    let output = Driver::new(&source, config).run(&tree)?;
    let mut warnings = output.warnings;
    let mut id_scope = output.id_scope;

    let mut vistrail = Vistrail::new();
    let mut operations = 0;
    for action in output.actions {
        check_assigned(&action)?;
        operations += action.operations.len();
        vistrail.add_action(action)?;
    }

    for tag in &legacy.tags {
        let warning = if vistrail.action(tag.time).is_none() {
            MigrationWarning::DanglingTag {
                name: tag.name.clone(),
                action: tag.time,
            }
        } else if vistrail.tag(&tag.name).is_some() {
            MigrationWarning::DuplicateTag {
                name: tag.name.clone(),
                action: tag.time,
            }
        } else {
            vistrail.add_tag(Tag {
                name: tag.name.clone(),
                action: tag.time,
            })?;
            continue;
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    let next_action = i64::try_from(vistrail.max_action_id().0)
        .unwrap_or(i64::MAX)
        .saturating_add(1);
    id_scope.update_begin_id(IdKind::Action, next_action);

    info!(
        actions = vistrail.action_count(),
        operations,
        tags = vistrail.tags().count(),
        warnings = warnings.len(),
        "migration complete"
    );

    Ok(Migration {
        vistrail,
        id_scope,
        warnings,
    })
}

/// Orders and validates a legacy history before replay.
///
/// Actions are keyed and sorted by id, and the records of each action are
/// stably sorted by their record id, which restores causal order where
/// legacy storage interleaved them. Fails on the reserved id `0`, on
/// duplicate ids and on parents missing from the history.
pub fn prepare(
    legacy: &LegacyVistrail,
) -> Result<IndexMap<ActionId, LegacyAction>, MigrationError> {
    let mut source = IndexMap::with_capacity(legacy.actions.len());
    for action in &legacy.actions {
        if action.time.is_root() {
            return Err(MigrationError::ReservedActionId);
        }
        let mut action = action.clone();
        action.records.sort_by_key(|record| record.id);
        let time = action.time;
        if source.insert(time, action).is_some() {
            return Err(MigrationError::DuplicateAction { action: time });
        }
    }
    source.sort_keys();

    for action in source.values() {
        if !action.parent.is_root() && !source.contains_key(&action.parent) {
            return Err(MigrationError::MissingParent {
                action: action.time,
                parent: action.parent,
            });
        }
    }
    Ok(source)
}

/// Rejects an action that still carries a non-positive object id.
fn check_assigned(action: &Action) -> Result<(), MigrationError> {
    for operation in &action.operations {
        let mut ids: Vec<ObjectId> = match operation {
            Operation::Add(op) => vec![op.object_id],
            Operation::Change(op) => vec![op.old_obj_id, op.new_obj_id],
            Operation::Delete(op) => vec![op.object_id],
        };
        ids.extend(operation.parent().map(|parent| parent.id));
        ids.extend(operation.data().map(ObjectData::id));

        if let Some(id) = ids.into_iter().find(|id| !id.is_assigned()) {
            return Err(MigrationError::PlaceholderId {
                action: action.id,
                kind: operation.what(),
                id: id.0,
            });
        }
    }
    Ok(())
}
