//! Integration tests for building and replaying a new-schema history.

use vistrail_core::object::{LocationData, ModuleData};
use vistrail_core::{
    Action, ActionId, AddOp, ChangeOp, CoreError, DeleteOp, ObjectData, ObjectId, ObjectKind,
    Operation, OperationId, ParentRef, Tag, Vistrail,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn action(id: u64, parent: u64, operations: Vec<Operation>) -> Action {
    Action {
        id: ActionId(id),
        parent: ActionId(parent),
        user: "tester".into(),
        date: "2009-06-01 10:00:00".into(),
        notes: None,
        operations,
    }
}

fn add_module(op: i64, id: i64) -> Operation {
    Operation::Add(AddOp {
        id: OperationId(op),
        what: ObjectKind::Module,
        object_id: ObjectId(id),
        parent: None,
        data: ObjectData::Module(ModuleData {
            id: ObjectId(id),
            name: "vtkRenderer".into(),
            cache: 1,
        }),
    })
}

fn location(id: i64, x: f64) -> ObjectData {
    ObjectData::Location(LocationData {
        id: ObjectId(id),
        x,
        y: 0.0,
    })
}

fn in_module(id: i64) -> Option<ParentRef> {
    Some(ParentRef::new(ObjectKind::Module, ObjectId(id)))
}

/// ```text
/// 0 ── 1 ──┬── 2   (moves the location)
///          └── 3   (deletes the module)
/// ```
fn branching_vistrail() -> Vistrail {
    let mut vistrail = Vistrail::new();
    vistrail
        .add_action(action(
            1,
            0,
            vec![
                add_module(1, 1),
                Operation::Add(AddOp {
                    id: OperationId(2),
                    what: ObjectKind::Location,
                    object_id: ObjectId(1),
                    parent: in_module(1),
                    data: location(1, 0.0),
                }),
            ],
        ))
        .unwrap();
    vistrail
        .add_action(action(
            2,
            1,
            vec![Operation::Change(ChangeOp {
                id: OperationId(3),
                what: ObjectKind::Location,
                old_obj_id: ObjectId(1),
                new_obj_id: ObjectId(2),
                parent: in_module(1),
                data: location(2, 30.0),
            })],
        ))
        .unwrap();
    vistrail
        .add_action(action(
            3,
            1,
            vec![
                Operation::Delete(DeleteOp {
                    id: OperationId(4),
                    what: ObjectKind::Location,
                    object_id: ObjectId(1),
                    parent: in_module(1),
                }),
                Operation::Delete(DeleteOp {
                    id: OperationId(5),
                    what: ObjectKind::Module,
                    object_id: ObjectId(1),
                    parent: None,
                }),
            ],
        ))
        .unwrap();
    vistrail
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn branches_materialize_independently() {
    let vistrail = branching_vistrail();

    let moved = vistrail.materialize(ActionId(2)).unwrap();
    assert_eq!(moved.len(), 2);
    let object = moved.get(ObjectKind::Location, ObjectId(2)).unwrap();
    assert_eq!(object.data, location(2, 30.0));
    assert_eq!(object.parent, in_module(1));

    let deleted = vistrail.materialize(ActionId(3)).unwrap();
    assert!(deleted.is_empty());

    let root = vistrail.materialize(ActionId::ROOT).unwrap();
    assert!(root.is_empty());
}

#[test]
fn version_tree_follows_declared_parents() {
    let tree = branching_vistrail().version_tree();
    assert_eq!(tree.children_of(ActionId(1)), vec![ActionId(2), ActionId(3)]);
    assert!(tree.is_ancestor(ActionId(1), ActionId(3)));
    assert!(!tree.is_ancestor(ActionId(2), ActionId(3)));
    assert_eq!(tree.find_cycle(), None);
}

#[test]
fn malformed_actions_are_rejected() {
    let mut vistrail = branching_vistrail();
    assert!(matches!(
        vistrail.add_action(action(9, 8, Vec::new())),
        Err(CoreError::UnknownParent { .. })
    ));
    assert!(matches!(
        vistrail.add_action(action(2, 1, Vec::new())),
        Err(CoreError::DuplicateAction { .. })
    ));

    // Deleting the module while its location is alive fails on replay.
    vistrail
        .add_action(action(
            4,
            1,
            vec![Operation::Delete(DeleteOp {
                id: OperationId(6),
                what: ObjectKind::Module,
                object_id: ObjectId(1),
                parent: None,
            })],
        ))
        .unwrap();
    assert!(matches!(
        vistrail.materialize(ActionId(4)),
        Err(CoreError::DanglingChildren { count: 1, .. })
    ));
}

#[test]
fn history_round_trips_through_json() {
    let mut vistrail = branching_vistrail();
    vistrail
        .add_tag(Tag {
            name: "moved".into(),
            action: ActionId(2),
        })
        .unwrap();

    let json = serde_json::to_string(&vistrail).unwrap();
    let back: Vistrail = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vistrail);
    assert_eq!(back.tag("moved").map(|t| t.action), Some(ActionId(2)));
}
