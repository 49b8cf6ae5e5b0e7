pub mod action;
pub mod error;
pub mod id;
pub mod id_scope;
pub mod object;
pub mod operation;
pub mod version_tree;
pub mod vistrail;
pub mod workflow;

// Re-export commonly used types
pub use action::{Action, Tag};
pub use error::CoreError;
pub use id::{ActionId, ObjectId, OperationId};
pub use id_scope::{IdKind, IdScope};
pub use object::{ObjectData, ObjectKind, PortType};
pub use operation::{AddOp, ChangeOp, DeleteOp, Operation, ParentRef};
pub use version_tree::VersionTree;
pub use vistrail::Vistrail;
pub use workflow::Workflow;
