//! Depth-first replay of a legacy history.
//!
//! The [`Driver`] owns the [`IdScope`] and [`ScopeTable`] of one migration
//! run. It walks the version tree from the root; entering a version
//! translates each legacy record into a [`Draft`] and applies it against the
//! scope table, minting new ids and recording every table mutation in a
//! journal. Leaving a version undoes that journal in reverse, so the table
//! seen by a sibling branch is exactly the one its parent left behind.
//!
//! # Application rules
//!
//! - **Add**: the container must be visible; mint, capture, emit `Add`, then
//!   add nested objects.
//! - **Change**: visible and aliased (same function name and position) means
//!   the object keeps its id and the change recurses into its parameters.
//!   Visible but not aliased means every visible child is deleted first, a
//!   new id is minted and a `Change` is emitted before adding the new
//!   children. Not visible at all falls back to Add.
//! - **Delete**: not visible is a dangling delete (warning or error per
//!   [`DanglingDeletePolicy`]); otherwise children are deleted first, then
//!   the object is tombstoned.
//! - **Move**: a Change of the module's location to its current position
//!   plus the offset.

use std::collections::HashMap;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use vistrail_core::version_tree::TreeEvent;
use vistrail_core::{
    Action, ActionId, AddOp, ChangeOp, CoreError, DeleteOp, IdKind, IdScope, ObjectData, ObjectId,
    ObjectKind, Operation, OperationId, ParentRef, VersionTree,
};

use crate::config::{DanglingDeletePolicy, FunctionAliasing, MigrationConfig};
use crate::error::MigrationError;
use crate::legacy::LegacyAction;
use crate::scope::{render_path, ObjectPath, Resolved, ScopeKey, ScopeTable};
use crate::translate::{location_draft, location_key, translate, Draft, ObjectDraft};
use crate::warning::MigrationWarning;

/// One scope-table push, remembered so it can be undone.
#[derive(Debug, Clone)]
struct Mutation {
    parent: ObjectPath,
    key: ScopeKey,
}

/// Work in progress for the action being entered.
struct Step {
    action: ActionId,
    operations: Vec<Operation>,
    mutations: Vec<Mutation>,
}

/// What a finished walk produced.
#[derive(Debug)]
pub struct DriverOutput {
    /// Rewritten actions in the order they were entered (parents first).
    pub actions: Vec<Action>,
    pub id_scope: IdScope,
    pub warnings: Vec<MigrationWarning>,
}

/// Replays one legacy history. Consumed by [`run`](Self::run), so a driver
/// never serves two histories.
pub struct Driver<'a> {
    source: &'a IndexMap<ActionId, LegacyAction>,
    config: &'a MigrationConfig,
    ids: IdScope,
    table: ScopeTable,
    journal: HashMap<ActionId, Vec<Mutation>>,
    actions: Vec<Action>,
    warnings: Vec<MigrationWarning>,
}

impl<'a> Driver<'a> {
    /// `source` must already be validated and sorted (see
    /// [`prepare`](crate::prepare)).
    pub fn new(source: &'a IndexMap<ActionId, LegacyAction>, config: &'a MigrationConfig) -> Self {
        Driver {
            source,
            config,
            ids: IdScope::new(),
            table: ScopeTable::new(),
            journal: HashMap::new(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Walks `tree` from the root, entering and leaving every version.
    pub fn run(mut self, tree: &VersionTree) -> Result<DriverOutput, MigrationError> {
        tree.walk(|event| match event {
            TreeEvent::Enter(id) => self.enter(id),
            TreeEvent::Leave(id) => self.leave(id),
        })?;
        debug_assert_eq!(self.table.depth(), 0);

        Ok(DriverOutput {
            actions: self.actions,
            id_scope: self.ids,
            warnings: self.warnings,
        })
    }

    /// Applies the effects of version `id`.
    pub fn enter(&mut self, id: ActionId) -> Result<(), MigrationError> {
        if id.is_root() {
            return Ok(());
        }
        let source = self.source;
        let legacy = source.get(&id).ok_or(CoreError::ActionNotFound { id })?;

        debug!(action = %id, records = legacy.records.len(), "entering action");
        let mut step = Step {
            action: id,
            operations: Vec::new(),
            mutations: Vec::new(),
        };
        for record in &legacy.records {
            debug!(action = %id, record = record.id, kind = record.op.kind_name(), "translating");
            let draft = translate(&record.op);
            self.apply(&mut step, &draft)?;
        }

        self.journal.insert(id, step.mutations);
        self.actions.push(Action {
            id,
            parent: legacy.parent,
            user: legacy.user.clone(),
            date: legacy.date.clone(),
            notes: legacy.notes.clone(),
            operations: step.operations,
        });
        Ok(())
    }

    /// Undoes the effects of version `id` in reverse order.
    pub fn leave(&mut self, id: ActionId) -> Result<(), MigrationError> {
        let Some(mutations) = self.journal.remove(&id) else {
            return Ok(());
        };
        debug!(action = %id, mutations = mutations.len(), "leaving action");
        for mutation in mutations.iter().rev() {
            self.table.undo(&mutation.parent, &mutation.key)?;
        }
        Ok(())
    }

    /// The scope table as currently seen by the walk.
    pub fn table(&self) -> &ScopeTable {
        &self.table
    }

    fn apply(&mut self, step: &mut Step, draft: &Draft) -> Result<(), MigrationError> {
        match draft {
            Draft::Add(object) => self.apply_add(step, object),
            Draft::Change(object) => self.apply_change(step, object),
            Draft::Delete { parent, key } => self.apply_delete(step, parent, key),
            Draft::Move { module, dx, dy } => self.apply_move(step, module, *dx, *dy),
        }
    }

    fn apply_add(&mut self, step: &mut Step, draft: &ObjectDraft) -> Result<(), MigrationError> {
        let parent = self.container(step, draft)?;
        let new_id = self.mint(draft.kind());
        let data = self.finish_payload(step, draft, new_id);

        self.capture(step, draft, new_id, data.clone())?;
        let id = self.mint_operation();
        step.operations.push(Operation::Add(AddOp {
            id,
            what: draft.kind(),
            object_id: new_id,
            parent,
            data,
        }));

        for child in &draft.children {
            self.apply_add(step, child)?;
        }
        Ok(())
    }

    fn apply_change(&mut self, step: &mut Step, draft: &ObjectDraft) -> Result<(), MigrationError> {
        let parent = self.container(step, draft)?;
        let path = draft.path();

        let Some(current) = self.table.resolve(&path) else {
            debug!(
                action = %step.action,
                object = %render_path(&path),
                "change of an object that is not visible, adding it instead"
            );
            return self.apply_add(step, draft);
        };

        if self.aliases(step, draft, &current) {
            for child in &draft.children {
                self.apply_change(step, child)?;
            }
            return Ok(());
        }

        self.delete_children(step, &path)?;
        let new_id = self.mint(draft.kind());
        let data = self.finish_payload(step, draft, new_id);

        self.capture(step, draft, new_id, data.clone())?;
        let id = self.mint_operation();
        step.operations.push(Operation::Change(ChangeOp {
            id,
            what: draft.kind(),
            old_obj_id: current.id,
            new_obj_id: new_id,
            parent,
            data,
        }));

        for child in &draft.children {
            self.apply_add(step, child)?;
        }
        Ok(())
    }

    fn apply_delete(
        &mut self,
        step: &mut Step,
        parent: &ObjectPath,
        key: &ScopeKey,
    ) -> Result<(), MigrationError> {
        let mut path = parent.clone();
        path.push(key.clone());

        match self.table.resolve(&path) {
            Some(current) => self.delete_object(step, parent, key, current.id),
            None => match self.config.dangling_deletes {
                DanglingDeletePolicy::Warn => {
                    self.warn(MigrationWarning::DanglingDelete {
                        action: step.action,
                        kind: key.kind,
                        key: render_path(&path),
                    });
                    Ok(())
                }
                DanglingDeletePolicy::Fail => Err(MigrationError::DanglingDelete {
                    action: step.action,
                    kind: key.kind,
                    key: render_path(&path),
                }),
            },
        }
    }

    fn apply_move(
        &mut self,
        step: &mut Step,
        module: &ScopeKey,
        dx: f64,
        dy: f64,
    ) -> Result<(), MigrationError> {
        let mut module_path: ObjectPath = SmallVec::new();
        module_path.push(module.clone());

        let mut location_path = module_path.clone();
        location_path.push(location_key());

        let (x, y) = match self.table.resolve(&location_path) {
            Some(Resolved {
                data: ObjectData::Location(current),
                ..
            }) => (current.x + dx, current.y + dy),
            _ => (dx, dy),
        };

        let draft = location_draft(&module_path, x, y);
        self.apply_change(step, &draft)
    }

    /// Deletes every visible child of the object at `path`, depth first.
    fn delete_children(
        &mut self,
        step: &mut Step,
        path: &ObjectPath,
    ) -> Result<(), MigrationError> {
        for (key, child) in self.table.children_of(path) {
            self.delete_object(step, path, &key, child.id)?;
        }
        Ok(())
    }

    fn delete_object(
        &mut self,
        step: &mut Step,
        parent: &ObjectPath,
        key: &ScopeKey,
        object_id: ObjectId,
    ) -> Result<(), MigrationError> {
        let mut path = parent.clone();
        path.push(key.clone());
        self.delete_children(step, &path)?;

        let parent_ref = match parent.last() {
            Some(link) => {
                let container = self.table.resolve(parent).ok_or_else(|| {
                    MigrationError::UnresolvedParent {
                        action: step.action,
                        kind: key.kind,
                        key: key.key.to_string(),
                        parent: render_path(parent),
                    }
                })?;
                Some(ParentRef::new(link.kind, container.id))
            }
            None => None,
        };

        self.table.tombstone(parent, key.clone())?;
        step.mutations.push(Mutation {
            parent: parent.clone(),
            key: key.clone(),
        });
        let id = self.mint_operation();
        step.operations.push(Operation::Delete(DeleteOp {
            id,
            what: key.kind,
            object_id,
            parent: parent_ref,
        }));
        Ok(())
    }

    /// Whether a change keeps the visible object's identity.
    fn aliases(&mut self, step: &Step, draft: &ObjectDraft, current: &Resolved) -> bool {
        let (ObjectData::Function(visible), ObjectData::Function(incoming)) =
            (&current.data, &draft.data)
        else {
            return false;
        };
        if visible.pos != incoming.pos || visible.name != incoming.name {
            return false;
        }

        let visible_count = self.table.children_of(&draft.path()).len();
        let incoming_count = draft.children.len();
        if visible_count == incoming_count {
            return true;
        }
        match self.config.function_aliasing {
            FunctionAliasing::Strict => false,
            FunctionAliasing::NameAndPosition => {
                self.warn(MigrationWarning::ParameterCountMismatch {
                    action: step.action,
                    function: render_path(&draft.path()),
                    visible: visible_count,
                    incoming: incoming_count,
                });
                true
            }
        }
    }

    /// Resolves the container of `draft` to its new identity.
    fn container(
        &self,
        step: &Step,
        draft: &ObjectDraft,
    ) -> Result<Option<ParentRef>, MigrationError> {
        let Some(link) = draft.parent.last() else {
            return Ok(None);
        };
        let container = self.table.resolve(&draft.parent).ok_or_else(|| {
            MigrationError::UnresolvedParent {
                action: step.action,
                kind: draft.kind(),
                key: draft.key.key.to_string(),
                parent: render_path(&draft.parent),
            }
        })?;
        Ok(Some(ParentRef::new(link.kind, container.id)))
    }

    /// Stamps `new_id` on the draft's payload and rewrites the module
    /// reference of connection ports.
    fn finish_payload(&mut self, step: &Step, draft: &ObjectDraft, new_id: ObjectId) -> ObjectData {
        let mut data = draft.data.clone().with_id(new_id);
        if let (ObjectData::Port(port), Some(target)) = (&mut data, &draft.refers_to) {
            let target_path = [target.clone()];
            port.module_id = self.table.resolve(&target_path).map(|module| module.id);
            if port.module_id.is_none() {
                self.warn(MigrationWarning::UnresolvedPortModule {
                    action: step.action,
                    connection: render_path(&draft.parent),
                    module: target.to_string(),
                });
            }
        }
        data
    }

    fn capture(
        &mut self,
        step: &mut Step,
        draft: &ObjectDraft,
        new_id: ObjectId,
        data: ObjectData,
    ) -> Result<(), MigrationError> {
        self.table
            .capture(&draft.parent, draft.key.clone(), new_id, data)?;
        step.mutations.push(Mutation {
            parent: draft.parent.clone(),
            key: draft.key.clone(),
        });
        Ok(())
    }

    fn mint(&mut self, kind: ObjectKind) -> ObjectId {
        ObjectId(self.ids.mint(kind))
    }

    fn mint_operation(&mut self) -> OperationId {
        OperationId(self.ids.mint(IdKind::Operation))
    }

    fn warn(&mut self, warning: MigrationWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}
