//! Translators for function-level legacy kinds: change-parameter and
//! delete-function.

use tracing::debug;

use vistrail_core::object::{FunctionData, ParameterData};
use vistrail_core::{ObjectData, ObjectId, ObjectKind};

use super::{extend, module_path, Draft, ObjectDraft};
use crate::legacy::{LegacyFunction, LegacyParameter, UNSET_POSITION};
use crate::scope::{ObjectPath, ScopeKey};

pub(super) fn change_parameter(module_id: i64, function: &LegacyFunction) -> Draft {
    Draft::Change(function_draft(&module_path(module_id), function))
}

pub(super) fn delete_function(module_id: i64, function_id: i64) -> Draft {
    Draft::Delete {
        parent: module_path(module_id),
        key: ScopeKey::id(ObjectKind::Function, function_id),
    }
}

/// Draft of `function` inside the module at `module`, with one child draft
/// per parameter. Placeholder parameters are dropped.
pub(crate) fn function_draft(module: &ObjectPath, function: &LegacyFunction) -> ObjectDraft {
    let key = ScopeKey::id(ObjectKind::Function, function.id);
    let path = extend(module, &key);
    let children = function
        .parameters
        .iter()
        .filter(|parameter| {
            let keep = parameter.pos != UNSET_POSITION;
            if !keep {
                debug!(
                    function = function.id,
                    parameter = parameter.id,
                    "dropping parameter with unset position"
                );
            }
            keep
        })
        .map(|parameter| parameter_draft(&path, parameter))
        .collect();

    ObjectDraft {
        parent: module.clone(),
        key,
        data: ObjectData::Function(FunctionData {
            id: ObjectId::PLACEHOLDER,
            pos: function.pos,
            name: function.name.clone(),
        }),
        refers_to: None,
        children,
    }
}

fn parameter_draft(function: &ObjectPath, parameter: &LegacyParameter) -> ObjectDraft {
    ObjectDraft {
        parent: function.clone(),
        key: ScopeKey::id(ObjectKind::Parameter, parameter.id),
        data: ObjectData::Parameter(ParameterData {
            id: ObjectId::PLACEHOLDER,
            pos: parameter.pos,
            name: parameter.name.clone(),
            type_name: parameter.type_name.clone(),
            value: parameter.value.clone(),
            alias: parameter.alias.clone(),
        }),
        refers_to: None,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(id: i64, pos: i64, value: &str) -> LegacyParameter {
        LegacyParameter {
            id,
            pos,
            name: String::new(),
            type_name: "Float".into(),
            value: value.into(),
            alias: String::new(),
        }
    }

    #[test]
    fn change_parameter_targets_function_inside_module() {
        let function = LegacyFunction {
            id: 2,
            pos: 0,
            name: "SetCenter".into(),
            parameters: vec![parameter(9, 0, "1.0"), parameter(10, 1, "2.0")],
        };
        let Draft::Change(draft) = change_parameter(5, &function) else {
            panic!("expected a change draft");
        };
        assert_eq!(draft.parent, module_path(5));
        assert_eq!(draft.key, ScopeKey::id(ObjectKind::Function, 2));
        assert_eq!(draft.children.len(), 2);
        match &draft.children[1].data {
            ObjectData::Parameter(p) => {
                assert_eq!(p.pos, 1);
                assert_eq!(p.value, "2.0");
                assert_eq!(p.id, ObjectId::PLACEHOLDER);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn unset_position_parameters_are_dropped() {
        let function = LegacyFunction {
            id: 2,
            pos: 0,
            name: "SetCenter".into(),
            parameters: vec![parameter(9, UNSET_POSITION, ""), parameter(10, 0, "3.0")],
        };
        let draft = function_draft(&module_path(5), &function);
        assert_eq!(draft.children.len(), 1);
        assert_eq!(draft.children[0].key, ScopeKey::id(ObjectKind::Parameter, 10));
    }

    #[test]
    fn delete_function_is_scoped_by_module() {
        assert_eq!(
            delete_function(5, 2),
            Draft::Delete {
                parent: module_path(5),
                key: ScopeKey::id(ObjectKind::Function, 2),
            }
        );
    }
}
