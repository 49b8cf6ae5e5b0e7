//! Workflow materialization.
//!
//! A [`Workflow`] is the object tree obtained by replaying generic
//! operations in order. Replay enforces the structural rules of the new
//! schema: containers exist before their children, ids are live at most once
//! per kind, and nothing is removed or replaced while it still has children.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::id::ObjectId;
use crate::object::{ObjectData, ObjectKind};
use crate::operation::{Operation, ParentRef};

/// A live object together with its container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowObject {
    pub data: ObjectData,
    pub parent: Option<ParentRef>,
}

#[derive(Debug, Clone, Default)]
pub struct Workflow {
    objects: IndexMap<(ObjectKind, ObjectId), WorkflowObject>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies each operation in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        operations: impl IntoIterator<Item = &'a Operation>,
    ) -> Result<(), CoreError> {
        for op in operations {
            self.apply(op)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, op: &Operation) -> Result<(), CoreError> {
        match op {
            Operation::Add(add) => {
                self.check_parent(add.what, add.parent)?;
                if self.objects.contains_key(&(add.what, add.object_id)) {
                    return Err(CoreError::ObjectExists {
                        kind: add.what,
                        id: add.object_id,
                    });
                }
                self.objects.insert(
                    (add.what, add.object_id),
                    WorkflowObject {
                        data: add.data.clone(),
                        parent: add.parent,
                    },
                );
            }
            Operation::Change(change) => {
                self.check_parent(change.what, change.parent)?;
                self.require(change.what, change.old_obj_id)?;
                if change.old_obj_id != change.new_obj_id {
                    self.require_childless(change.what, change.old_obj_id)?;
                    if self.objects.contains_key(&(change.what, change.new_obj_id)) {
                        return Err(CoreError::ObjectExists {
                            kind: change.what,
                            id: change.new_obj_id,
                        });
                    }
                }
                self.objects.shift_remove(&(change.what, change.old_obj_id));
                self.objects.insert(
                    (change.what, change.new_obj_id),
                    WorkflowObject {
                        data: change.data.clone(),
                        parent: change.parent,
                    },
                );
            }
            Operation::Delete(delete) => {
                self.require(delete.what, delete.object_id)?;
                self.require_childless(delete.what, delete.object_id)?;
                self.objects.shift_remove(&(delete.what, delete.object_id));
            }
        }
        Ok(())
    }

    pub fn get(&self, kind: ObjectKind, id: ObjectId) -> Option<&WorkflowObject> {
        self.objects.get(&(kind, id))
    }

    pub fn contains(&self, kind: ObjectKind, id: ObjectId) -> bool {
        self.objects.contains_key(&(kind, id))
    }

    /// All live objects in the order they were created.
    pub fn objects(&self) -> impl Iterator<Item = &WorkflowObject> {
        self.objects.values()
    }

    /// Live objects of one kind.
    pub fn objects_of(&self, kind: ObjectKind) -> impl Iterator<Item = &WorkflowObject> {
        self.objects
            .iter()
            .filter(move |((k, _), _)| *k == kind)
            .map(|(_, object)| object)
    }

    /// Direct children of the object `(kind, id)`.
    pub fn children(&self, kind: ObjectKind, id: ObjectId) -> Vec<&WorkflowObject> {
        let parent = ParentRef::new(kind, id);
        self.objects
            .values()
            .filter(|object| object.parent == Some(parent))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn check_parent(&self, kind: ObjectKind, parent: Option<ParentRef>) -> Result<(), CoreError> {
        let expected = kind.parent_kind();
        if expected != parent.map(|p| p.kind) {
            return Err(CoreError::InvalidContainment {
                kind,
                parent_kind: parent.map(|p| p.kind),
            });
        }
        if let Some(parent) = parent {
            self.require(parent.kind, parent.id)?;
        }
        Ok(())
    }

    fn require(&self, kind: ObjectKind, id: ObjectId) -> Result<(), CoreError> {
        if self.objects.contains_key(&(kind, id)) {
            Ok(())
        } else {
            Err(CoreError::ObjectNotFound { kind, id })
        }
    }

    fn require_childless(&self, kind: ObjectKind, id: ObjectId) -> Result<(), CoreError> {
        let count = self.children(kind, id).len();
        if count > 0 {
            return Err(CoreError::DanglingChildren { kind, id, count });
        }
        Ok(())
    }
}
