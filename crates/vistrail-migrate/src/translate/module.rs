//! Translators for module-level legacy kinds: add-module, delete-module,
//! move-module, add-port, delete-port, change-annotation and
//! delete-annotation.

use smallvec::SmallVec;

use vistrail_core::object::{AnnotationData, LocationData, ModuleData, PortSpecData};
use vistrail_core::{ObjectData, ObjectId, ObjectKind};

use super::function::function_draft;
use super::{module_path, Draft, ObjectDraft, LOCATION_KEY};
use crate::legacy::{LegacyAnnotation, LegacyModule, LegacyPortSpec};
use crate::scope::{ObjectPath, ScopeKey};

pub(super) fn add_module(module: &LegacyModule) -> Draft {
    let key = ScopeKey::id(ObjectKind::Module, module.id);
    let path = module_path(module.id);

    let mut children: Vec<ObjectDraft> = module
        .functions
        .iter()
        .map(|function| function_draft(&path, function))
        .collect();
    children.extend(
        module
            .port_specs
            .iter()
            .map(|spec| port_spec_draft(&path, spec)),
    );
    children.extend(
        module
            .annotations
            .iter()
            .map(|annotation| annotation_draft(&path, annotation)),
    );
    children.push(location_draft(&path, module.x, module.y));

    Draft::Add(ObjectDraft {
        parent: SmallVec::new(),
        key,
        data: ObjectData::Module(ModuleData {
            id: ObjectId::PLACEHOLDER,
            name: module.name.clone(),
            cache: module.cache,
        }),
        refers_to: None,
        children,
    })
}

pub(super) fn delete_module(module_id: i64) -> Draft {
    Draft::Delete {
        parent: SmallVec::new(),
        key: ScopeKey::id(ObjectKind::Module, module_id),
    }
}

pub(super) fn move_module(module_id: i64, dx: f64, dy: f64) -> Draft {
    Draft::Move {
        module: ScopeKey::id(ObjectKind::Module, module_id),
        dx,
        dy,
    }
}

pub(super) fn add_port(module_id: i64, spec: &LegacyPortSpec) -> Draft {
    Draft::Add(port_spec_draft(&module_path(module_id), spec))
}

pub(super) fn delete_port(module_id: i64, port_type: &str, port_name: &str) -> Draft {
    Draft::Delete {
        parent: module_path(module_id),
        key: port_spec_key(port_type, port_name),
    }
}

pub(super) fn change_annotation(module_id: i64, annotation: &LegacyAnnotation) -> Draft {
    Draft::Change(annotation_draft(&module_path(module_id), annotation))
}

pub(super) fn delete_annotation(module_id: i64, key: &str) -> Draft {
    Draft::Delete {
        parent: module_path(module_id),
        key: ScopeKey::name(ObjectKind::Annotation, key),
    }
}

/// Draft of the location of the module at `module`, placed at `(x, y)`.
pub(crate) fn location_draft(module: &ObjectPath, x: f64, y: f64) -> ObjectDraft {
    ObjectDraft {
        parent: module.clone(),
        key: location_key(),
        data: ObjectData::Location(LocationData {
            id: ObjectId::PLACEHOLDER,
            x,
            y,
        }),
        refers_to: None,
        children: Vec::new(),
    }
}

pub(crate) fn location_key() -> ScopeKey {
    ScopeKey::id(ObjectKind::Location, LOCATION_KEY)
}

fn port_spec_key(port_type: &str, name: &str) -> ScopeKey {
    ScopeKey::name(ObjectKind::PortSpec, format!("{}:{}", port_type, name))
}

fn port_spec_draft(module: &ObjectPath, spec: &LegacyPortSpec) -> ObjectDraft {
    let key = port_spec_key(&spec.port_type, &spec.name);
    ObjectDraft {
        parent: module.clone(),
        key,
        data: ObjectData::PortSpec(PortSpecData {
            id: ObjectId::PLACEHOLDER,
            name: spec.name.clone(),
            port_type: spec.port_type.clone(),
            spec: spec.spec.clone(),
        }),
        refers_to: None,
        children: Vec::new(),
    }
}

fn annotation_draft(module: &ObjectPath, annotation: &LegacyAnnotation) -> ObjectDraft {
    ObjectDraft {
        parent: module.clone(),
        key: ScopeKey::name(ObjectKind::Annotation, annotation.key.clone()),
        data: ObjectData::Annotation(AnnotationData {
            id: ObjectId::PLACEHOLDER,
            key: annotation.key.clone(),
            value: annotation.value.clone(),
        }),
        refers_to: None,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::{LegacyFunction, LegacyParameter};

    fn sample_module() -> LegacyModule {
        LegacyModule {
            id: 5,
            name: "vtkSphereSource".into(),
            cache: 1,
            x: 10.0,
            y: 20.0,
            functions: vec![LegacyFunction {
                id: 2,
                pos: 0,
                name: "SetRadius".into(),
                parameters: vec![LegacyParameter {
                    id: 9,
                    pos: 0,
                    name: "<no description>".into(),
                    type_name: "Float".into(),
                    value: "1.0".into(),
                    alias: String::new(),
                }],
            }],
            annotations: vec![LegacyAnnotation {
                key: "__desc__".into(),
                value: "sphere".into(),
            }],
            port_specs: vec![LegacyPortSpec {
                name: "extra".into(),
                port_type: "input".into(),
                spec: "(Float)".into(),
            }],
        }
    }

    #[test]
    fn add_module_nests_every_sub_object() {
        let Draft::Add(draft) = add_module(&sample_module()) else {
            panic!("expected an add draft");
        };
        assert!(draft.parent.is_empty());
        assert_eq!(draft.key, ScopeKey::id(ObjectKind::Module, 5));
        assert_eq!(draft.data.id(), ObjectId::PLACEHOLDER);

        let kinds: Vec<_> = draft.children.iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ObjectKind::Function,
                ObjectKind::PortSpec,
                ObjectKind::Annotation,
                ObjectKind::Location,
            ]
        );
        for child in &draft.children {
            assert_eq!(child.parent.as_slice(), draft.path().as_slice());
        }

        let function = &draft.children[0];
        assert_eq!(function.children.len(), 1);
        assert_eq!(
            function.children[0].path().as_slice(),
            &[
                ScopeKey::id(ObjectKind::Module, 5),
                ScopeKey::id(ObjectKind::Function, 2),
                ScopeKey::id(ObjectKind::Parameter, 9),
            ]
        );
    }

    #[test]
    fn location_carries_module_coordinates() {
        let Draft::Add(draft) = add_module(&sample_module()) else {
            panic!("expected an add draft");
        };
        let location = draft.children.last().unwrap();
        assert_eq!(location.key, location_key());
        match &location.data {
            ObjectData::Location(l) => assert_eq!((l.x, l.y), (10.0, 20.0)),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn port_specs_are_keyed_by_type_and_name() {
        let draft = delete_port(5, "output", "self");
        assert_eq!(
            draft,
            Draft::Delete {
                parent: module_path(5),
                key: ScopeKey::name(ObjectKind::PortSpec, "output:self"),
            }
        );
    }

    #[test]
    fn annotation_change_targets_key_inside_module() {
        let Draft::Change(draft) = change_annotation(
            3,
            &LegacyAnnotation {
                key: "note".into(),
                value: "hi".into(),
            },
        ) else {
            panic!("expected a change draft");
        };
        assert_eq!(draft.parent, module_path(3));
        assert_eq!(draft.key, ScopeKey::name(ObjectKind::Annotation, "note"));
    }
}
