//! Stable ID newtypes for history entities.
//!
//! All IDs are distinct newtype wrappers, providing type safety so that an
//! `ActionId` cannot be accidentally used where an `ObjectId` is expected.
//!
//! Object ids follow the new-schema conventions: `0` means "no such object"
//! and negative values are transient placeholders that never appear in a
//! finished history.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version (action) identifier. Doubles as the vertex key of the version
/// tree; `ActionId(0)` is the synthetic root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u64);

/// Identifier of a workflow object, unique within its [`ObjectKind`](crate::ObjectKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub i64);

/// Identifier of a generic operation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub i64);

impl ActionId {
    /// The synthetic root of every version tree.
    pub const ROOT: ActionId = ActionId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl ObjectId {
    /// "No such object".
    pub const NONE: ObjectId = ObjectId(0);

    /// Stand-in id carried by payloads before a real id is minted.
    pub const PLACEHOLDER: ObjectId = ObjectId(-1);

    /// Returns `true` for ids that may appear in a finished history.
    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_action_is_zero() {
        assert!(ActionId(0).is_root());
        assert!(!ActionId(1).is_root());
    }

    #[test]
    fn only_positive_object_ids_are_assigned() {
        assert!(ObjectId(1).is_assigned());
        assert!(!ObjectId::NONE.is_assigned());
        assert!(!ObjectId(-3).is_assigned());
    }

    #[test]
    fn display_prints_inner_value() {
        assert_eq!(format!("{}", ActionId(7)), "7");
        assert_eq!(format!("{}", ObjectId(-2)), "-2");
        assert_eq!(format!("{}", OperationId(99)), "99");
    }

    #[test]
    fn ids_serialize_transparently_as_numbers() {
        let json = serde_json::to_string(&ObjectId(42)).unwrap();
        assert_eq!(json, "42");
        let back: ActionId = serde_json::from_str("12").unwrap();
        assert_eq!(back, ActionId(12));
    }
}
