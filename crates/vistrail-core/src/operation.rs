//! Generic Add/Change/Delete operations of the new history schema.
//!
//! Every mutation of a workflow is expressed as one of three operations
//! targeting a single typed object. The order of operations within an
//! [`Action`](crate::Action) is significant: children are added after their
//! container and deleted before it.

use serde::{Deserialize, Serialize};

use crate::id::{ObjectId, OperationId};
use crate::object::{ObjectData, ObjectKind};

/// Reference to the container of an object. Root-level objects carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    #[serde(rename = "parent_obj_type")]
    pub kind: ObjectKind,
    #[serde(rename = "parent_obj_id")]
    pub id: ObjectId,
}

impl ParentRef {
    pub fn new(kind: ObjectKind, id: ObjectId) -> Self {
        ParentRef { kind, id }
    }
}

/// Inserts a new object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOp {
    pub id: OperationId,
    pub what: ObjectKind,
    pub object_id: ObjectId,
    #[serde(flatten)]
    pub parent: Option<ParentRef>,
    pub data: ObjectData,
}

/// Replaces the object `old_obj_id` with `data`, which carries `new_obj_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOp {
    pub id: OperationId,
    pub what: ObjectKind,
    pub old_obj_id: ObjectId,
    pub new_obj_id: ObjectId,
    #[serde(flatten)]
    pub parent: Option<ParentRef>,
    pub data: ObjectData,
}

/// Removes an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteOp {
    pub id: OperationId,
    pub what: ObjectKind,
    pub object_id: ObjectId,
    #[serde(flatten)]
    pub parent: Option<ParentRef>,
}

/// A generic history operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Add(AddOp),
    Change(ChangeOp),
    Delete(DeleteOp),
}

impl Operation {
    pub fn id(&self) -> OperationId {
        match self {
            Operation::Add(op) => op.id,
            Operation::Change(op) => op.id,
            Operation::Delete(op) => op.id,
        }
    }

    /// The kind of the object this operation targets.
    pub fn what(&self) -> ObjectKind {
        match self {
            Operation::Add(op) => op.what,
            Operation::Change(op) => op.what,
            Operation::Delete(op) => op.what,
        }
    }

    pub fn parent(&self) -> Option<ParentRef> {
        match self {
            Operation::Add(op) => op.parent,
            Operation::Change(op) => op.parent,
            Operation::Delete(op) => op.parent,
        }
    }

    /// The id the targeted object carries *after* this operation, or `None`
    /// for deletes.
    pub fn resulting_id(&self) -> Option<ObjectId> {
        match self {
            Operation::Add(op) => Some(op.object_id),
            Operation::Change(op) => Some(op.new_obj_id),
            Operation::Delete(_) => None,
        }
    }

    pub fn data(&self) -> Option<&ObjectData> {
        match self {
            Operation::Add(op) => Some(&op.data),
            Operation::Change(op) => Some(&op.data),
            Operation::Delete(_) => None,
        }
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Operation::Add(_))
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Operation::Change(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Operation::Delete(_))
    }
}
