//! The [`Vistrail`] history container.
//!
//! A vistrail is an append-only set of [`Action`]s forming a tree rooted at
//! the synthetic version `0`, plus named [`Tag`]s. Every mutation goes
//! through validating builder methods, so a `Vistrail` value always has a
//! well-formed version tree. Deserialization replays the stored actions and
//! tags through the same methods.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::action::{Action, Tag};
use crate::error::CoreError;
use crate::id::ActionId;
use crate::version_tree::VersionTree;
use crate::workflow::Workflow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredVistrail")]
pub struct Vistrail {
    actions: IndexMap<ActionId, Action>,
    tags: IndexMap<String, Tag>,
}

/// Unvalidated on-disk form of a [`Vistrail`].
#[derive(Deserialize)]
struct StoredVistrail {
    actions: IndexMap<ActionId, Action>,
    #[serde(default)]
    tags: IndexMap<String, Tag>,
}

impl TryFrom<StoredVistrail> for Vistrail {
    type Error = CoreError;

    /// Actions must be stored parents first, which is the order
    /// serialization writes them in.
    fn try_from(stored: StoredVistrail) -> Result<Self, Self::Error> {
        let mut vistrail = Vistrail::new();
        for action in stored.actions.into_values() {
            vistrail.add_action(action)?;
        }
        for tag in stored.tags.into_values() {
            vistrail.add_tag(tag)?;
        }
        Ok(vistrail)
    }
}

impl Vistrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action. Its parent must be the root or an action already
    /// in the history, which keeps the version graph acyclic.
    pub fn add_action(&mut self, action: Action) -> Result<(), CoreError> {
        if action.id.is_root() {
            return Err(CoreError::ReservedActionId);
        }
        if self.actions.contains_key(&action.id) {
            return Err(CoreError::DuplicateAction { id: action.id });
        }
        if !action.parent.is_root() && !self.actions.contains_key(&action.parent) {
            return Err(CoreError::UnknownParent {
                action: action.id,
                parent: action.parent,
            });
        }
        self.actions.insert(action.id, action);
        Ok(())
    }

    /// Binds a tag name to an existing version.
    pub fn add_tag(&mut self, tag: Tag) -> Result<(), CoreError> {
        if !self.actions.contains_key(&tag.action) {
            return Err(CoreError::ActionNotFound { id: tag.action });
        }
        if self.tags.contains_key(&tag.name) {
            return Err(CoreError::DuplicateTag { name: tag.name });
        }
        self.tags.insert(tag.name.clone(), tag);
        Ok(())
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(&id)
    }

    /// Actions in insertion order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    /// Highest action id in the history, or the root when empty.
    pub fn max_action_id(&self) -> ActionId {
        self.actions.keys().copied().max().unwrap_or(ActionId::ROOT)
    }

    /// Builds the version tree, adding versions in ascending id order.
    pub fn version_tree(&self) -> VersionTree {
        let mut ids: Vec<_> = self.actions.values().map(|a| (a.id, a.parent)).collect();
        ids.sort();
        let mut tree = VersionTree::new();
        for (id, parent) in ids {
            tree.add_version(id, parent);
        }
        tree
    }

    /// The actions on the path from the root down to `version`, in
    /// application order.
    pub fn action_chain(&self, version: ActionId) -> Result<Vec<&Action>, CoreError> {
        let mut chain = Vec::new();
        let mut current = version;
        while !current.is_root() {
            let action = self
                .actions
                .get(&current)
                .ok_or(CoreError::ActionNotFound { id: current })?;
            chain.push(action);
            current = action.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Replays every operation from the root down to `version`.
    pub fn materialize(&self, version: ActionId) -> Result<Workflow, CoreError> {
        let mut workflow = Workflow::new();
        for action in self.action_chain(version)? {
            workflow.apply_all(&action.operations)?;
        }
        Ok(workflow)
    }
}
