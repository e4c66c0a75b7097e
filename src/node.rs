use std::fmt;
use std::ptr;

use crate::tree::{AvlTree, NodeId};

/// A borrowed view of a node inside an [`AvlTree`].
///
/// Returned by [`AvlTree::search`] and [`AvlTree::root`]; allows walking the
/// tree in every direction without exposing the node storage.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a AvlTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a AvlTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    /// The stored string.
    pub fn value(&self) -> &'a str {
        &self.tree.node(self.id).value
    }

    /// Height of the subtree rooted here. A leaf has height 0.
    pub fn height(&self) -> i32 {
        self.tree.node(self.id).height
    }

    /// Height of the right subtree minus height of the left subtree.
    pub fn balance_factor(&self) -> i32 {
        self.tree.balance_factor_of(self.id)
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.link(self.tree.node(self.id).left)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.link(self.tree.node(self.id).right)
    }

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.link(self.tree.node(self.id).parent)
    }

    pub fn is_leaf(&self) -> bool {
        let node = self.tree.node(self.id);
        node.left.is_none() && node.right.is_none()
    }

    fn link(&self, link: Option<NodeId>) -> Option<NodeRef<'a>> {
        link.map(|id| NodeRef::new(self.tree, id))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

/// Formats the node as `value(height)`.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.value(), self.height())
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", &self.value())
            .field("height", &self.height())
            .field("balance_factor", &self.balance_factor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn test_navigation() {
        let tree: AvlTree = ["b", "a", "c"].into_iter().collect();
        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert!(root.parent().is_none());

        let left = root.left().unwrap();
        assert_eq!(left.value(), "a");
        assert!(left.is_leaf());
        assert_eq!(left.parent(), Some(root));
        assert_eq!(root.right().map(|node| node.value()), Some("c"));
    }

    #[test]
    fn test_display() {
        let tree: AvlTree = ["b", "a"].into_iter().collect();
        assert_eq!(tree.root().unwrap().to_string(), "b(1)");
        assert_eq!(tree.search("a").unwrap().to_string(), "a(0)");
    }

    #[test]
    fn test_balance_factor() {
        let tree: AvlTree = ["b", "a"].into_iter().collect();
        assert_eq!(tree.root().unwrap().balance_factor(), -1);
        assert_eq!(tree.search("a").unwrap().balance_factor(), 0);
    }

    #[test]
    fn test_eq_across_trees() {
        let lhs: AvlTree = ["a"].into_iter().collect();
        let rhs = lhs.clone();
        assert_eq!(lhs.root(), lhs.search("a"));
        assert_ne!(lhs.root(), rhs.root());
    }
}
