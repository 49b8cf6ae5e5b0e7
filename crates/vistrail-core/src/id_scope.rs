//! Monotonic, kind-scoped identifier minting.
//!
//! [`IdScope`] hands out ids per [`IdKind`] starting at 1. Ids are never
//! reused and counters never decrease, so a session that inherits the scope
//! of a migrated history keeps minting ids that collide with nothing already
//! in that history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::object::ObjectKind;

/// Namespace an id is minted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Module,
    Connection,
    Function,
    Parameter,
    PortSpec,
    Location,
    Annotation,
    Port,
    Operation,
    Action,
}

impl From<ObjectKind> for IdKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Module => IdKind::Module,
            ObjectKind::Connection => IdKind::Connection,
            ObjectKind::Function => IdKind::Function,
            ObjectKind::Parameter => IdKind::Parameter,
            ObjectKind::PortSpec => IdKind::PortSpec,
            ObjectKind::Location => IdKind::Location,
            ObjectKind::Annotation => IdKind::Annotation,
            ObjectKind::Port => IdKind::Port,
        }
    }
}

/// Per-kind id counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdScope {
    next: BTreeMap<IdKind, i64>,
}

impl IdScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id for `kind` and advances its counter.
    pub fn mint(&mut self, kind: impl Into<IdKind>) -> i64 {
        let counter = self.next.entry(kind.into()).or_insert(1);
        let id = *counter;
        *counter += 1;
        id
    }

    /// The id the next [`mint`](Self::mint) for `kind` will return.
    pub fn next_id(&self, kind: impl Into<IdKind>) -> i64 {
        self.next.get(&kind.into()).copied().unwrap_or(1)
    }

    /// Raises the counter of `kind` so the next minted id is at least
    /// `begin`. Never lowers a counter.
    pub fn update_begin_id(&mut self, kind: impl Into<IdKind>, begin: i64) {
        let counter = self.next.entry(kind.into()).or_insert(1);
        if begin > *counter {
            *counter = begin;
        }
    }

    /// All counters that have been touched, in kind order.
    pub fn counters(&self) -> impl Iterator<Item = (IdKind, i64)> + '_ {
        self.next.iter().map(|(kind, next)| (*kind, *next))
    }
}
