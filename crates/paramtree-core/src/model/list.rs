use super::NodeId;

/// Ordered, fixed-capacity sequence of child parameters
///
/// Children are stored by id; their names live on the child nodes, so
/// lookup-by-name goes through [`crate::ParamTree::child_by_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParam {
    pub(crate) children: Vec<NodeId>,
    capacity: usize,
}

impl ListParam {
    pub fn new(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.children.len() >= self.capacity
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Child at `index` in insertion order
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    pub(crate) fn remove_child(&mut self, id: NodeId) {
        self.children.retain(|c| *c != id);
    }
}
