//! Workflow object kinds and their shallow payloads.
//!
//! Objects form a strict containment tree:
//!
//! ```text
//! Module ──┬── Function ── Parameter
//!          ├── PortSpec
//!          ├── Annotation
//!          └── Location (exactly one)
//! Connection ── Port (source + destination)
//! ```
//!
//! Payloads are *shallow*: a [`ModuleData`] never embeds its functions.
//! Nested objects travel as separate child operations whose parent reference
//! points at the container.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// The kind tag of a workflow object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Module,
    Connection,
    Function,
    Parameter,
    PortSpec,
    Location,
    Annotation,
    Port,
}

impl ObjectKind {
    /// All kinds, root-level kinds first.
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::Module,
        ObjectKind::Connection,
        ObjectKind::Function,
        ObjectKind::Parameter,
        ObjectKind::PortSpec,
        ObjectKind::Location,
        ObjectKind::Annotation,
        ObjectKind::Port,
    ];

    /// The kind of the container this kind lives in, or `None` for
    /// root-level kinds.
    pub fn parent_kind(self) -> Option<ObjectKind> {
        match self {
            ObjectKind::Module | ObjectKind::Connection => None,
            ObjectKind::Function
            | ObjectKind::PortSpec
            | ObjectKind::Location
            | ObjectKind::Annotation => Some(ObjectKind::Module),
            ObjectKind::Parameter => Some(ObjectKind::Function),
            ObjectKind::Port => Some(ObjectKind::Connection),
        }
    }

    /// Returns `true` for kinds stored in the root scope.
    pub fn is_root_level(self) -> bool {
        self.parent_kind().is_none()
    }

    /// Schema name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Module => "module",
            ObjectKind::Connection => "connection",
            ObjectKind::Function => "function",
            ObjectKind::Parameter => "parameter",
            ObjectKind::PortSpec => "portSpec",
            ObjectKind::Location => "location",
            ObjectKind::Annotation => "annotation",
            ObjectKind::Port => "port",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoint role of a connection port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortType {
    Source,
    Destination,
}

impl PortType {
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::Source => "source",
            PortType::Destination => "destination",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleData {
    pub id: ObjectId,
    pub name: String,
    pub cache: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub id: ObjectId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionData {
    pub id: ObjectId,
    /// Position of the function within its module.
    pub pos: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterData {
    pub id: ObjectId,
    /// Argument position within the owning function.
    pub pos: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpecData {
    pub id: ObjectId,
    pub name: String,
    /// `"input"` or `"output"`.
    pub port_type: String,
    pub spec: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationData {
    pub id: ObjectId,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub id: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortData {
    pub id: ObjectId,
    pub port_type: PortType,
    /// The module this port attaches to; `None` when the referenced module
    /// was not visible at the time the connection was recorded.
    pub module_id: Option<ObjectId>,
    pub module_name: String,
    pub name: String,
    pub spec: String,
}

/// A shallow object payload carried by Add and Change operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "what", rename_all = "snake_case")]
pub enum ObjectData {
    Module(ModuleData),
    Connection(ConnectionData),
    Function(FunctionData),
    Parameter(ParameterData),
    PortSpec(PortSpecData),
    Location(LocationData),
    Annotation(AnnotationData),
    Port(PortData),
}

impl ObjectData {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectData::Module(_) => ObjectKind::Module,
            ObjectData::Connection(_) => ObjectKind::Connection,
            ObjectData::Function(_) => ObjectKind::Function,
            ObjectData::Parameter(_) => ObjectKind::Parameter,
            ObjectData::PortSpec(_) => ObjectKind::PortSpec,
            ObjectData::Location(_) => ObjectKind::Location,
            ObjectData::Annotation(_) => ObjectKind::Annotation,
            ObjectData::Port(_) => ObjectKind::Port,
        }
    }

    pub fn id(&self) -> ObjectId {
        match self {
            ObjectData::Module(d) => d.id,
            ObjectData::Connection(d) => d.id,
            ObjectData::Function(d) => d.id,
            ObjectData::Parameter(d) => d.id,
            ObjectData::PortSpec(d) => d.id,
            ObjectData::Location(d) => d.id,
            ObjectData::Annotation(d) => d.id,
            ObjectData::Port(d) => d.id,
        }
    }

    /// Returns a copy of this payload carrying `id`.
    pub fn with_id(mut self, id: ObjectId) -> Self {
        match &mut self {
            ObjectData::Module(d) => d.id = id,
            ObjectData::Connection(d) => d.id = id,
            ObjectData::Function(d) => d.id = id,
            ObjectData::Parameter(d) => d.id = id,
            ObjectData::PortSpec(d) => d.id = id,
            ObjectData::Location(d) => d.id = id,
            ObjectData::Annotation(d) => d.id = id,
            ObjectData::Port(d) => d.id = id,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_hierarchy_has_no_cycles() {
        for kind in ObjectKind::ALL {
            let mut seen = vec![kind];
            let mut current = kind;
            while let Some(parent) = current.parent_kind() {
                assert!(
                    !seen.contains(&parent),
                    "{} is its own ancestor",
                    kind
                );
                seen.push(parent);
                current = parent;
            }
            assert!(current.is_root_level());
        }
    }

    #[test]
    fn only_modules_and_connections_are_root_level() {
        let roots: Vec<_> = ObjectKind::ALL
            .into_iter()
            .filter(|k| k.is_root_level())
            .collect();
        assert_eq!(roots, vec![ObjectKind::Module, ObjectKind::Connection]);
    }

    #[test]
    fn with_id_replaces_only_the_id() {
        let data = ObjectData::Function(FunctionData {
            id: ObjectId(-1),
            pos: 3,
            name: "SetValue".into(),
        });
        let data = data.with_id(ObjectId(17));
        assert_eq!(data.id(), ObjectId(17));
        assert_eq!(data.kind(), ObjectKind::Function);
        match data {
            ObjectData::Function(f) => {
                assert_eq!(f.pos, 3);
                assert_eq!(f.name, "SetValue");
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn payload_json_is_tagged_with_kind() {
        let data = ObjectData::Annotation(AnnotationData {
            id: ObjectId(4),
            key: "__desc__".into(),
            value: "reader".into(),
        });
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["what"], "annotation");
        assert_eq!(json["key"], "__desc__");
    }
}
