//! Branch-aware map from legacy identity to new identity.
//!
//! [`ScopeTable`] answers "which new object does legacy `(kind, key)` denote
//! right now, on the branch being walked?". Each key owns a stack of
//! bindings; only the top of the stack is visible. Bindings are pushed while
//! an action is entered and popped, in exact reverse order, when it is left,
//! so sibling branches never observe each other's objects even when they
//! reuse the same legacy ids.
//!
//! Scopes nest: the bindings of a module's functions live in a child scope
//! owned by the module's binding, and are reachable only through an
//! [`ObjectPath`] naming the chain of containers from the root.
//!
//! Storage is two arenas (bindings and scopes) plus a top pointer per key.
//! Because pushes and pops are strictly LIFO across the whole table, both
//! arenas behave as stacks and an enter/leave pair restores the table to a
//! value equal to the one it started from.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use vistrail_core::{ObjectData, ObjectId, ObjectKind};

use crate::error::ScopeError;

/// Legacy identity of an object within its container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegacyKey {
    Id(i64),
    Name(String),
}

impl fmt::Display for LegacyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyKey::Id(id) => write!(f, "{}", id),
            LegacyKey::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// A typed legacy key: one link of an [`ObjectPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub kind: ObjectKind,
    pub key: LegacyKey,
}

impl ScopeKey {
    pub fn new(kind: ObjectKind, key: LegacyKey) -> Self {
        ScopeKey { kind, key }
    }

    pub fn id(kind: ObjectKind, id: i64) -> Self {
        ScopeKey::new(kind, LegacyKey::Id(id))
    }

    pub fn name(kind: ObjectKind, name: impl Into<String>) -> Self {
        ScopeKey::new(kind, LegacyKey::Name(name.into()))
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

/// Chain of containers from the root scope downwards.
pub type ObjectPath = SmallVec<[ScopeKey; 4]>;

/// Renders a path as `module:5/function:2`; the root renders as `/`.
pub fn render_path(path: &[ScopeKey]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// A currently visible object.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub id: ObjectId,
    pub data: ObjectData,
}

type BindingIdx = usize;
type ScopeIdx = usize;

const ROOT_SCOPE: ScopeIdx = 0;

#[derive(Debug, Clone, PartialEq)]
struct Binding {
    scope: ScopeIdx,
    /// `None` marks a tombstone: the key is currently absent.
    new_id: Option<ObjectId>,
    data: Option<ObjectData>,
    children: Option<ScopeIdx>,
    previous: Option<BindingIdx>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Scope {
    top: IndexMap<ScopeKey, BindingIdx>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    pub fn new() -> Self {
        ScopeTable {
            scopes: vec![Scope::default()],
            bindings: Vec::new(),
        }
    }

    /// Number of bindings currently stacked, tombstones included.
    pub fn depth(&self) -> usize {
        self.bindings.len()
    }

    /// Binds `key` inside the scope of `parent` to `new_id` with an empty
    /// child scope. Fails if any container on `parent` is not visible.
    pub fn capture(
        &mut self,
        parent: &[ScopeKey],
        key: ScopeKey,
        new_id: ObjectId,
        data: ObjectData,
    ) -> Result<(), ScopeError> {
        let scope = self.scope_of(parent)?;
        self.scopes.push(Scope::default());
        let children = self.scopes.len() - 1;
        self.push(scope, key, Some(new_id), Some(data), Some(children));
        Ok(())
    }

    /// Marks `key` inside the scope of `parent` as absent.
    pub fn tombstone(&mut self, parent: &[ScopeKey], key: ScopeKey) -> Result<(), ScopeError> {
        let scope = self.scope_of(parent)?;
        self.push(scope, key, None, None, None);
        Ok(())
    }

    /// Pops the binding most recently pushed for `key` by
    /// [`capture`](Self::capture) or [`tombstone`](Self::tombstone).
    ///
    /// The binding must be the most recent one in the whole table: undoes
    /// are only valid in exact reverse order of the pushes.
    pub fn undo(&mut self, parent: &[ScopeKey], key: &ScopeKey) -> Result<(), ScopeError> {
        let scope = self.scope_of(parent)?;
        let out_of_order = || ScopeError::UndoOutOfOrder {
            path: render_path(parent),
            key: key.to_string(),
        };

        let top = *self.scopes[scope].top.get(key).ok_or_else(out_of_order)?;
        if top + 1 != self.bindings.len() {
            return Err(out_of_order());
        }
        if let Some(children) = self.bindings[top].children {
            if children + 1 != self.scopes.len() || !self.scopes[children].top.is_empty() {
                return Err(out_of_order());
            }
        }

        let binding = self.bindings.pop().ok_or_else(out_of_order)?;
        if binding.children.is_some() {
            self.scopes.pop();
        }
        let entries = &mut self.scopes[binding.scope].top;
        match binding.previous {
            Some(previous) => {
                entries.insert(key.clone(), previous);
            }
            None => {
                entries.shift_remove(key);
            }
        }
        Ok(())
    }

    /// The visible object at `path`, or `None` if any link of the path is
    /// absent, tombstoned or was never bound.
    pub fn resolve(&self, path: &[ScopeKey]) -> Option<Resolved> {
        let (last, parent) = path.split_last()?;
        let scope = self.scope_of(parent).ok()?;
        let binding = self.visible(scope, last)?;
        Some(Resolved {
            id: binding.new_id?,
            data: binding.data.clone()?,
        })
    }

    /// The visible direct children of the object at `path` (of the root when
    /// `path` is empty), in the order their keys were first bound.
    pub fn children_of(&self, path: &[ScopeKey]) -> Vec<(ScopeKey, Resolved)> {
        let Ok(scope) = self.scope_of(path) else {
            return Vec::new();
        };
        self.scopes[scope]
            .top
            .keys()
            .filter_map(|key| {
                let binding = self.visible(scope, key)?;
                Some((
                    key.clone(),
                    Resolved {
                        id: binding.new_id?,
                        data: binding.data.clone()?,
                    },
                ))
            })
            .collect()
    }

    fn push(
        &mut self,
        scope: ScopeIdx,
        key: ScopeKey,
        new_id: Option<ObjectId>,
        data: Option<ObjectData>,
        children: Option<ScopeIdx>,
    ) {
        let index = self.bindings.len();
        let previous = self.scopes[scope].top.get(&key).copied();
        self.bindings.push(Binding {
            scope,
            new_id,
            data,
            children,
            previous,
        });
        self.scopes[scope].top.insert(key, index);
    }

    fn visible(&self, scope: ScopeIdx, key: &ScopeKey) -> Option<&Binding> {
        let index = *self.scopes[scope].top.get(key)?;
        let binding = &self.bindings[index];
        binding.new_id.map(|_| binding)
    }

    fn scope_of(&self, path: &[ScopeKey]) -> Result<ScopeIdx, ScopeError> {
        let mut scope = ROOT_SCOPE;
        for (depth, link) in path.iter().enumerate() {
            scope = self
                .visible(scope, link)
                .and_then(|binding| binding.children)
                .ok_or_else(|| ScopeError::Unresolved {
                    path: render_path(&path[..=depth]),
                })?;
        }
        Ok(scope)
    }
}
