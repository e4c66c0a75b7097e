use std::iter::FusedIterator;

use super::{AvlTree, Link, Node, NodeId};
use crate::node::NodeRef;

/// Order in which [`AvlTree::traverse`] visits the nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    PreOrder,
    InOrder,
    PostOrder,
    /// Right subtree, node, left subtree: descending values.
    ReverseInOrder,
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromFirst,
    FromSecond,
}

/// An iterator over the values of a tree in ascending order.
pub struct Iter<'a> {
    tree: &'a AvlTree,
    next: Link,
    remaining: usize,
}

impl AvlTree {
    /// Visits every node depth first, passing its depth below the root.
    pub fn traverse<F>(&self, order: Order, mut visit: F)
    where
        F: FnMut(NodeRef<'_>, usize),
    {
        self.walk(self.root, order, |node_ptr, depth| {
            visit(NodeRef::new(self, node_ptr), depth)
        });
    }

    /// Gets an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            next: self.root.map(|root_ptr| self.leftmost(root_ptr)),
            remaining: self.len(),
        }
    }

    /// Walks the subtree below `start` without recursion, following parent
    /// links on the way up. Depth is relative to `start`.
    pub(super) fn walk<F>(&self, start: Link, order: Order, mut visit: F)
    where
        F: FnMut(NodeId, usize),
    {
        let Some(start_ptr) = start else {
            return;
        };
        let mirrored = order == Order::ReverseInOrder;
        let first = |node: &Node| if mirrored { node.right } else { node.left };
        let second = |node: &Node| if mirrored { node.left } else { node.right };

        let mut node_ptr = start_ptr;
        let mut depth = 0;
        let mut dir = Direction::FromParent;
        loop {
            match dir {
                Direction::FromParent => {
                    if order == Order::PreOrder {
                        visit(node_ptr, depth);
                    }
                    if let Some(child_ptr) = first(&self.nodes[node_ptr]) {
                        node_ptr = child_ptr;
                        depth += 1;
                    } else {
                        dir = Direction::FromFirst;
                    }
                }
                Direction::FromFirst => {
                    if matches!(order, Order::InOrder | Order::ReverseInOrder) {
                        visit(node_ptr, depth);
                    }
                    if let Some(child_ptr) = second(&self.nodes[node_ptr]) {
                        node_ptr = child_ptr;
                        depth += 1;
                        dir = Direction::FromParent;
                    } else {
                        dir = Direction::FromSecond;
                    }
                }
                Direction::FromSecond => {
                    if order == Order::PostOrder {
                        visit(node_ptr, depth);
                    }
                    if node_ptr == start_ptr {
                        break;
                    }
                    match self.nodes[node_ptr].parent {
                        Some(parent_ptr) => {
                            if first(&self.nodes[parent_ptr]) == Some(node_ptr) {
                                dir = Direction::FromFirst;
                            } else {
                                dir = Direction::FromSecond;
                            }
                            node_ptr = parent_ptr;
                            depth -= 1;
                        }
                        None => break,
                    }
                }
            }
        }
    }

    fn leftmost(&self, mut node_ptr: NodeId) -> NodeId {
        while let Some(left_ptr) = self.nodes[node_ptr].left {
            node_ptr = left_ptr;
        }
        node_ptr
    }

    fn successor(&self, node_ptr: NodeId) -> Link {
        if let Some(right_ptr) = self.nodes[node_ptr].right {
            return Some(self.leftmost(right_ptr));
        }
        let mut child_ptr = node_ptr;
        let mut current = self.nodes[node_ptr].parent;
        while let Some(parent_ptr) = current {
            if self.nodes[parent_ptr].left == Some(child_ptr) {
                break;
            }
            child_ptr = parent_ptr;
            current = self.nodes[parent_ptr].parent;
        }
        current
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.next?;
        self.next = self.tree.successor(node_ptr);
        self.remaining -= 1;
        Some(self.tree.nodes[node_ptr].value.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for AvlTree {
    /// Builds a balanced tree from the values, skipping empty strings.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<S: Into<String>> Extend<S> for AvlTree {
    /// Inserts the values with balancing, skipping empty strings.
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value).ok();
        }
    }
}
