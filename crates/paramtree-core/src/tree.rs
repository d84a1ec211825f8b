//! Arena-backed parameter tree
//!
//! Nodes live in a `Vec` slot arena and are addressed by [`NodeId`]. A list
//! owns its children through their ids; children point back at their list
//! with a plain id, never ownership. Removing a list frees its whole subtree.
//!
//! The tree is process-wide state by convention only: it is constructed once
//! with [`ParamTree::create_root`], passed explicitly to every engine entry
//! point and torn down with [`ParamTree::destroy_root`].

use crate::errors::ParamError;
use crate::model::{
    BoolParam, DataParam, EnumParam, FileDataParam, ListParam, NodeId, NumParam, Param,
    ParamValue, StringParam, ValueError,
};

/// Name of the top-level root list and of the save/restore subtree beneath it
pub const ROOT_NAME: &str = "bochs";

/// Capacity of the save/restore subtree created by `init_save_restore`
pub const SAVE_RESTORE_CAPACITY: usize = 64;

/// Owning container for every parameter node
#[derive(Debug, Default)]
pub struct ParamTree {
    nodes: Vec<Slot>,
    root: Option<NodeId>,
}

/// Arena slot; `generation` advances every time the slot is freed
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    param: Option<Param>,
}

type TreeResult<T> = std::result::Result<T, ParamError>;

impl ParamTree {
    /// Create an empty tree with no root list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root list
    ///
    /// # Errors
    ///
    /// Returns `RootExists` if a root has already been created.
    pub fn create_root(
        &mut self,
        name: &str,
        description: Option<&str>,
        capacity: usize,
    ) -> TreeResult<NodeId> {
        if self.root.is_some() {
            return Err(ParamError::RootExists);
        }
        validate_name(name)?;
        let id = self.alloc(Param {
            name: name.to_string(),
            description: description.map(str::to_string),
            parent: None,
            value: ParamValue::List(ListParam::new(capacity)),
        });
        self.root = Some(id);
        tracing::debug!(root = name, capacity, "created parameter root");
        Ok(id)
    }

    /// Drop every node, including the root
    pub fn destroy_root(&mut self) {
        for slot in &mut self.nodes {
            if slot.param.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.root = None;
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrow a live node
    pub fn get(&self, id: NodeId) -> Option<&Param> {
        self.nodes
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.param.as_ref())
    }

    /// Mutably borrow a live node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Param> {
        self.nodes
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.param.as_mut())
    }

    /// Borrow a live node, reporting a dangling id as an error
    ///
    /// # Errors
    ///
    /// Returns `DanglingNode` if the id refers to a freed slot.
    pub fn node(&self, id: NodeId) -> TreeResult<&Param> {
        self.get(id).ok_or(ParamError::DanglingNode { id: id.index })
    }

    /// Mutable counterpart of [`ParamTree::node`]
    ///
    /// # Errors
    ///
    /// Returns `DanglingNode` if the id refers to a freed slot.
    pub fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Param> {
        self.get_mut(id).ok_or(ParamError::DanglingNode { id: id.index })
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.param.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a child to `parent`
    ///
    /// # Errors
    ///
    /// Fails if the parent is not a live list, is full, or already has a
    /// child with the same name, or if the name is not a valid path component.
    pub fn add(
        &mut self,
        parent: NodeId,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> TreeResult<NodeId> {
        validate_name(name)?;
        let parent_path = self.path_of(parent);
        let list = self
            .node(parent)?
            .as_list()
            .ok_or_else(|| ParamError::NotAList {
                path: parent_path.clone(),
            })?;
        if list.is_full() {
            return Err(ParamError::CapacityExceeded {
                list: parent_path,
                capacity: list.capacity(),
            });
        }
        if self.child_by_name(parent, name).is_some() {
            return Err(ParamError::DuplicateName {
                list: parent_path,
                name: name.to_string(),
            });
        }

        let id = self.alloc(Param {
            name: name.to_string(),
            description: None,
            parent: Some(parent),
            value: value.into(),
        });
        if let Some(ParamValue::List(list)) = self.get_mut(parent).map(Param::value_mut) {
            list.children.push(id);
        }
        Ok(id)
    }

    /// Append an empty child list
    ///
    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_list(&mut self, parent: NodeId, name: &str, capacity: usize) -> TreeResult<NodeId> {
        self.add(parent, name, ListParam::new(capacity))
    }

    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_num(&mut self, parent: NodeId, name: &str, num: NumParam) -> TreeResult<NodeId> {
        self.add(parent, name, num)
    }

    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_bool(&mut self, parent: NodeId, name: &str, initial: bool) -> TreeResult<NodeId> {
        self.add(parent, name, BoolParam::new(initial))
    }

    /// Append an enum whose value is an index into `choices`
    ///
    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_enum<S: Into<String>>(
        &mut self,
        parent: NodeId,
        name: &str,
        choices: impl IntoIterator<Item = S>,
        initial: usize,
    ) -> TreeResult<NodeId> {
        self.add(parent, name, EnumParam::new(choices, initial))
    }

    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_string(
        &mut self,
        parent: NodeId,
        name: &str,
        max_len: usize,
        initial: &str,
    ) -> TreeResult<NodeId> {
        self.add(parent, name, StringParam::text(max_len, initial))
    }

    /// Append a fixed-length byte string, zero-filled
    ///
    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_raw_string(
        &mut self,
        parent: NodeId,
        name: &str,
        len: usize,
        separator: Option<char>,
    ) -> TreeResult<NodeId> {
        self.add(parent, name, StringParam::raw(len, separator))
    }

    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_data(&mut self, parent: NodeId, name: &str, len: usize) -> TreeResult<NodeId> {
        self.add(parent, name, DataParam::new(len))
    }

    /// # Errors
    ///
    /// Same as [`ParamTree::add`].
    pub fn add_file_data(
        &mut self,
        parent: NodeId,
        name: &str,
        file_data: FileDataParam,
    ) -> TreeResult<NodeId> {
        self.add(parent, name, file_data)
    }

    /// Attach a free-text description to a node
    ///
    /// # Errors
    ///
    /// Returns `DanglingNode` if the id is not live.
    pub fn set_description(&mut self, id: NodeId, description: &str) -> TreeResult<()> {
        self.node_mut(id)?.description = Some(description.to_string());
        Ok(())
    }

    /// Detach a node from its list and free it with its whole subtree
    ///
    /// Removing the root is equivalent to [`ParamTree::destroy_root`].
    ///
    /// # Errors
    ///
    /// Returns `DanglingNode` if the id is not live.
    pub fn remove(&mut self, id: NodeId) -> TreeResult<()> {
        let parent = self.node(id)?.parent;
        match parent {
            Some(parent) => {
                if let Some(ParamValue::List(list)) = self.get_mut(parent).map(Param::value_mut) {
                    list.remove_child(id);
                }
                self.free_subtree(id);
            }
            None if self.root == Some(id) => self.destroy_root(),
            None => self.free_subtree(id),
        }
        Ok(())
    }

    /// Free every child of a list, keeping the list itself
    ///
    /// # Errors
    ///
    /// Fails if the id is not a live list.
    pub fn clear_list(&mut self, id: NodeId) -> TreeResult<()> {
        let children = self.list_children(id)?.to_vec();
        for child in children {
            self.free_subtree(child);
        }
        if let Some(ParamValue::List(list)) = self.get_mut(id).map(Param::value_mut) {
            list.children.clear();
        }
        Ok(())
    }

    /// Children of a list in insertion order (empty for non-lists)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(Param::as_list)
            .map(ListParam::children)
            .unwrap_or(&[])
    }

    fn list_children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        self.node(id)?
            .as_list()
            .map(ListParam::children)
            .ok_or_else(|| ParamError::NotAList {
                path: self.path_of(id),
            })
    }

    /// Look up a direct child of a list by name
    pub fn child_by_name(&self, list: NodeId, name: &str) -> Option<NodeId> {
        self.children(list)
            .iter()
            .copied()
            .find(|child| self.get(*child).map(Param::name) == Some(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Param::parent)
    }

    /// Dotted path of a node, excluding the top-most list
    ///
    /// The result resolves back to the same node when passed to
    /// [`ParamTree::get_param`] with the top-most list as base. The top-most
    /// list itself yields its own name.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(param) = self.get(cur) else {
                break;
            };
            match param.parent {
                Some(parent) => {
                    names.push(param.name.as_str());
                    current = Some(parent);
                }
                None => {
                    if names.is_empty() {
                        names.push(param.name.as_str());
                    }
                    current = None;
                }
            }
        }
        names.reverse();
        names.join(".")
    }

    /// Restore every leaf's initial value
    pub fn reset_all(&mut self) {
        for param in self.nodes.iter_mut().filter_map(|slot| slot.param.as_mut()) {
            param.reset();
        }
    }

    /// Create the save/restore subtree under the root, or clear it if present
    ///
    /// # Errors
    ///
    /// Returns `NoRoot` before `create_root`, or `NotAList` if a non-list
    /// child already occupies the name.
    pub fn init_save_restore(&mut self) -> TreeResult<NodeId> {
        let root = self.root.ok_or(ParamError::NoRoot)?;
        match self.child_by_name(root, ROOT_NAME) {
            Some(existing) => {
                self.clear_list(existing)?;
                Ok(existing)
            }
            None => {
                let id = self.add_list(root, ROOT_NAME, SAVE_RESTORE_CAPACITY)?;
                self.set_description(id, "subtree for save/restore")?;
                Ok(id)
            }
        }
    }

    /// The save/restore subtree, if `init_save_restore` has run
    pub fn checkpoint_root(&self) -> Option<NodeId> {
        let root = self.root?;
        let id = self.child_by_name(root, ROOT_NAME)?;
        self.get(id)?.as_list().map(|_| id)
    }

    /// Apply a node-level setter and attach the node path to any failure
    ///
    /// # Errors
    ///
    /// Returns `DanglingNode` for a freed id, or `InvalidValue` wrapping the
    /// setter's own error.
    pub fn update<F>(&mut self, id: NodeId, f: F) -> TreeResult<()>
    where
        F: FnOnce(&mut ParamValue) -> std::result::Result<(), ValueError>,
    {
        let result = f(self.node_mut(id)?.value_mut());
        result.map_err(|source| ParamError::InvalidValue {
            path: self.path_of(id),
            source,
        })
    }

    fn alloc(&mut self, param: Param) -> NodeId {
        let index = match self.nodes.iter().position(|slot| slot.param.is_none()) {
            Some(index) => index,
            None => {
                self.nodes.push(Slot::default());
                self.nodes.len() - 1
            }
        };
        let slot = &mut self.nodes[index];
        slot.param = Some(param);
        NodeId {
            index,
            generation: slot.generation,
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(cur) = pending.pop() {
            let Some(slot) = self.nodes.get_mut(cur.index) else {
                continue;
            };
            if slot.generation != cur.generation {
                continue;
            }
            if let Some(param) = slot.param.take() {
                slot.generation = slot.generation.wrapping_add(1);
                if let ParamValue::List(list) = param.value {
                    pending.extend(list.children);
                }
            }
        }
    }
}

fn validate_name(name: &str) -> TreeResult<()> {
    let invalid = name.is_empty()
        || name == "}"
        || name == "="
        || name.contains('.')
        || name.chars().any(char::is_whitespace);
    if invalid {
        return Err(ParamError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
