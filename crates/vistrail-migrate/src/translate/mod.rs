//! Legacy action translators.
//!
//! Each legacy action kind has one pure translator turning its record into a
//! [`Draft`]: the intended generic operation, expressed entirely in legacy
//! identities. Drafts carry shallow payloads with placeholder ids and the
//! drafts of every nested object the record implies (a new module brings its
//! functions, parameters, port specs, annotations and location).
//!
//! Translators never look at history state. Deciding whether a change is an
//! in-place edit, which children a delete must remove first, and which new
//! ids to mint is the job of the [`driver`](crate::driver).

mod connection;
mod function;
mod module;

pub(crate) use module::{location_draft, location_key};

use smallvec::SmallVec;

use vistrail_core::{ObjectData, ObjectKind};

use crate::legacy::LegacyOp;
use crate::scope::{ObjectPath, ScopeKey};

/// Legacy key of the single location inside a module.
pub const LOCATION_KEY: i64 = 0;

/// An object to add or change, with its nested objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDraft {
    /// Legacy path of the container; empty for root-level objects.
    pub parent: ObjectPath,
    pub key: ScopeKey,
    /// Shallow payload carrying a placeholder id.
    pub data: ObjectData,
    /// A root-level object the payload references by legacy id (the module
    /// a connection port attaches to).
    pub refers_to: Option<ScopeKey>,
    pub children: Vec<ObjectDraft>,
}

impl ObjectDraft {
    pub fn kind(&self) -> ObjectKind {
        self.key.kind
    }

    /// Legacy path of this object itself.
    pub fn path(&self) -> ObjectPath {
        let mut path = self.parent.clone();
        path.push(self.key.clone());
        path
    }
}

/// The generic intent of one legacy record.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Add(ObjectDraft),
    Change(ObjectDraft),
    Delete { parent: ObjectPath, key: ScopeKey },
    /// Relocate a module's location by a relative offset.
    Move { module: ScopeKey, dx: f64, dy: f64 },
}

/// Translates one legacy record. The match is exhaustive, so every legacy
/// kind is covered at compile time.
pub fn translate(op: &LegacyOp) -> Draft {
    match op {
        LegacyOp::AddModule { module } => module::add_module(module),
        LegacyOp::AddConnection { connection } => connection::add_connection(connection),
        LegacyOp::ChangeParameter {
            module_id,
            function,
        } => function::change_parameter(*module_id, function),
        LegacyOp::AddPort {
            module_id,
            port_spec,
        } => module::add_port(*module_id, port_spec),
        LegacyOp::ChangeAnnotation {
            module_id,
            annotation,
        } => module::change_annotation(*module_id, annotation),
        LegacyOp::DeleteModule { module_id } => module::delete_module(*module_id),
        LegacyOp::DeleteConnection { connection_id } => {
            connection::delete_connection(*connection_id)
        }
        LegacyOp::DeleteFunction {
            module_id,
            function_id,
        } => function::delete_function(*module_id, *function_id),
        LegacyOp::DeleteAnnotation { module_id, key } => {
            module::delete_annotation(*module_id, key)
        }
        LegacyOp::DeletePort {
            module_id,
            port_type,
            port_name,
        } => module::delete_port(*module_id, port_type, port_name),
        LegacyOp::MoveModule { module_id, dx, dy } => module::move_module(*module_id, *dx, *dy),
    }
}

fn module_path(module_id: i64) -> ObjectPath {
    let mut path = SmallVec::new();
    path.push(ScopeKey::id(ObjectKind::Module, module_id));
    path
}

fn extend(path: &ObjectPath, key: &ScopeKey) -> ObjectPath {
    let mut path = path.clone();
    path.push(key.clone());
    path
}
