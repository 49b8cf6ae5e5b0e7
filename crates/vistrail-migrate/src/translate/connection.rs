//! Translators for add-connection and delete-connection.

use smallvec::SmallVec;

use vistrail_core::object::{ConnectionData, PortData};
use vistrail_core::{ObjectData, ObjectId, ObjectKind, PortType};

use super::{extend, Draft, ObjectDraft};
use crate::legacy::{LegacyConnection, LegacyPort};
use crate::scope::{ObjectPath, ScopeKey};

pub(super) fn add_connection(connection: &LegacyConnection) -> Draft {
    let key = ScopeKey::id(ObjectKind::Connection, connection.id);
    let path = extend(&SmallVec::new(), &key);

    Draft::Add(ObjectDraft {
        parent: SmallVec::new(),
        key,
        data: ObjectData::Connection(ConnectionData {
            id: ObjectId::PLACEHOLDER,
        }),
        refers_to: None,
        children: vec![
            port_draft(&path, PortType::Source, &connection.source),
            port_draft(&path, PortType::Destination, &connection.destination),
        ],
    })
}

pub(super) fn delete_connection(connection_id: i64) -> Draft {
    Draft::Delete {
        parent: SmallVec::new(),
        key: ScopeKey::id(ObjectKind::Connection, connection_id),
    }
}

fn port_draft(connection: &ObjectPath, port_type: PortType, port: &LegacyPort) -> ObjectDraft {
    ObjectDraft {
        parent: connection.clone(),
        key: ScopeKey::name(ObjectKind::Port, port_type.as_str()),
        data: ObjectData::Port(PortData {
            id: ObjectId::PLACEHOLDER,
            port_type,
            module_id: None,
            module_name: port.module_name.clone(),
            name: port.name.clone(),
            spec: port.spec.clone(),
        }),
        refers_to: Some(ScopeKey::id(ObjectKind::Module, port.module_id)),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(module_id: i64, name: &str) -> LegacyPort {
        LegacyPort {
            module_id,
            module_name: "vtkActor".into(),
            name: name.into(),
            spec: String::new(),
        }
    }

    #[test]
    fn add_connection_emits_source_then_destination_port() {
        let connection = LegacyConnection {
            id: 4,
            source: port(1, "self"),
            destination: port(2, "SetMapper"),
        };
        let Draft::Add(draft) = add_connection(&connection) else {
            panic!("expected an add draft");
        };
        assert_eq!(draft.key, ScopeKey::id(ObjectKind::Connection, 4));
        assert_eq!(draft.children.len(), 2);

        let source = &draft.children[0];
        assert_eq!(source.key, ScopeKey::name(ObjectKind::Port, "source"));
        assert_eq!(source.refers_to, Some(ScopeKey::id(ObjectKind::Module, 1)));
        assert_eq!(source.parent.as_slice(), &[draft.key.clone()]);

        let destination = &draft.children[1];
        assert_eq!(destination.key, ScopeKey::name(ObjectKind::Port, "destination"));
        assert_eq!(destination.refers_to, Some(ScopeKey::id(ObjectKind::Module, 2)));
    }

    #[test]
    fn delete_connection_is_root_level() {
        let Draft::Delete { parent, key } = delete_connection(4) else {
            panic!("expected a delete draft");
        };
        assert!(parent.is_empty());
        assert_eq!(key, ScopeKey::id(ObjectKind::Connection, 4));
    }
}
