//! The legacy history schema.
//!
//! Every legacy action carries a list of records, each of one ad-hoc kind.
//! Identifiers are only unique within their container (a function id is
//! unique within its module) and may be reused across sibling branches of
//! the version tree.

use serde::{Deserialize, Serialize};

use vistrail_core::ActionId;

/// Argument position marking a placeholder parameter that was never set.
pub const UNSET_POSITION: i64 = -1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyVistrail {
    pub actions: Vec<LegacyAction>,
    #[serde(default)]
    pub tags: Vec<LegacyTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyAction {
    /// Timestamp-like id; also the version id.
    pub time: ActionId,
    pub parent: ActionId,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub records: Vec<LegacyRecord>,
}

/// One sub-record of a legacy action. `id` orders records within their
/// action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub id: i64,
    pub op: LegacyOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTag {
    pub name: String,
    pub time: ActionId,
}

/// The closed set of legacy action kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LegacyOp {
    AddModule {
        module: LegacyModule,
    },
    AddConnection {
        connection: LegacyConnection,
    },
    /// Replaces the parameters of one function of a module.
    ChangeParameter {
        module_id: i64,
        function: LegacyFunction,
    },
    AddPort {
        module_id: i64,
        port_spec: LegacyPortSpec,
    },
    ChangeAnnotation {
        module_id: i64,
        annotation: LegacyAnnotation,
    },
    DeleteModule {
        module_id: i64,
    },
    DeleteConnection {
        connection_id: i64,
    },
    DeleteFunction {
        module_id: i64,
        function_id: i64,
    },
    DeleteAnnotation {
        module_id: i64,
        key: String,
    },
    DeletePort {
        module_id: i64,
        port_type: String,
        port_name: String,
    },
    /// Relocates a module by a relative offset.
    MoveModule {
        module_id: i64,
        dx: f64,
        dy: f64,
    },
}

impl LegacyOp {
    /// The legacy kind name, as stored.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LegacyOp::AddModule { .. } => "add-module",
            LegacyOp::AddConnection { .. } => "add-connection",
            LegacyOp::ChangeParameter { .. } => "change-parameter",
            LegacyOp::AddPort { .. } => "add-port",
            LegacyOp::ChangeAnnotation { .. } => "change-annotation",
            LegacyOp::DeleteModule { .. } => "delete-module",
            LegacyOp::DeleteConnection { .. } => "delete-connection",
            LegacyOp::DeleteFunction { .. } => "delete-function",
            LegacyOp::DeleteAnnotation { .. } => "delete-annotation",
            LegacyOp::DeletePort { .. } => "delete-port",
            LegacyOp::MoveModule { .. } => "move-module",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyModule {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_cache")]
    pub cache: i32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub functions: Vec<LegacyFunction>,
    #[serde(default)]
    pub annotations: Vec<LegacyAnnotation>,
    #[serde(default)]
    pub port_specs: Vec<LegacyPortSpec>,
}

fn default_cache() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFunction {
    pub id: i64,
    pub pos: i64,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<LegacyParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyParameter {
    pub id: i64,
    /// Argument position; [`UNSET_POSITION`] marks a placeholder.
    pub pos: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    #[serde(default)]
    pub alias: String,
}

/// Annotations are identified by their key within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAnnotation {
    pub key: String,
    pub value: String,
}

/// Port specs are identified by `(port_type, name)` within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPortSpec {
    pub name: String,
    pub port_type: String,
    pub spec: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyConnection {
    pub id: i64,
    pub source: LegacyPort,
    pub destination: LegacyPort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPort {
    pub module_id: i64,
    #[serde(default)]
    pub module_name: String,
    pub name: String,
    #[serde(default)]
    pub spec: String,
}
